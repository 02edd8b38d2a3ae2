//! PCA9685 register map and protocol constants.
//!
//! Every channel owns a block of four consecutive registers starting at
//! `LED0_ON_L + 4 * channel`: ON low byte, ON high byte, OFF low byte,
//! OFF high byte. The 12-bit counters are split across each byte pair.

// ---------------------------------------------------------------------------
// Registers
// ---------------------------------------------------------------------------

/// Mode register 1.
pub const MODE1: u8 = 0x00;

/// Oscillator prescaler register. Only writable while MODE1 SLEEP is set.
pub const PRESCALE: u8 = 0xFE;

/// First register of channel 0's ON/OFF block.
pub const LED0_ON_L: u8 = 0x06;

/// Stride between consecutive channel register blocks.
pub const REGISTERS_PER_CHANNEL: u8 = 4;

// ---------------------------------------------------------------------------
// MODE1 bits
// ---------------------------------------------------------------------------

/// Low-power mode, oscillator off.
pub const MODE1_SLEEP: u8 = 0x10;

/// Mask that clears the RESTART bit (bit 7) when entering sleep.
pub const MODE1_CLEAR_RESTART: u8 = 0x7F;

/// RESTART | AI (auto-increment) | ALLCALL, written once the oscillator has
/// settled.
pub const MODE1_RESTART_AI_ALLCALL: u8 = 0xA1;

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// Internal oscillator frequency in Hz.
pub const OSC_CLOCK_HZ: u32 = 25_000_000;

/// Counter steps per PWM period.
pub const PWM_RESOLUTION: u32 = 4096;

/// Largest value a 12-bit ON/OFF counter can hold.
pub const PWM_MAX_TICK: u16 = 4095;

/// Time the oscillator needs after leaving sleep before RESTART may be set.
pub const OSCILLATOR_SETTLE_US: u32 = 5000;

/// Output frequency programmed during initialisation.
pub const SERVO_FREQUENCY_HZ: u32 = 50;

/// Period of one PWM cycle at [`SERVO_FREQUENCY_HZ`], in microseconds.
pub const SERVO_PERIOD_US: u32 = 20_000;

/// Number of PWM outputs on the chip.
pub const CHANNEL_COUNT: usize = 16;

/// Power-on I2C address of a board with no address jumpers bridged.
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Address targeted by [`ServoBoard::reconfigure_address`](crate::ServoBoard::reconfigure_address).
pub const ALT_ADDRESS: u8 = 0x7F;
