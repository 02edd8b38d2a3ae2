//! High-level servo interface for a PCA9685 board.
//!
//! [`ServoBoard`] wraps the low-level register driver with lazy one-time
//! initialisation and the angle/pulse-to-tick mapping.

use embassy_time::Delay;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::driver::Pca9685;
use crate::error::ServoError;
use crate::registers::ALT_ADDRESS;
use crate::timing::{pulse_for_degree, ticks_for_pulse};

/// A servo command, as passed to [`ServoBoard::apply`] or queued for
/// `servo_command_task` (feature `task`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoCommand {
    /// Move `channel` to `degree` (0–180).
    Angle { channel: u8, degree: u16 },
    /// Drive `channel` with a pulse of `micros` (500–2500).
    Pulse { channel: u8, micros: u16 },
    /// Retarget future writes to `address`. No bus traffic.
    SetAddress(u8),
}

/// Servo controller for a PCA9685 16-channel PWM board.
///
/// The chip is initialised lazily: the first [`set_angle`](Self::set_angle)
/// or [`set_pulse`](Self::set_pulse) call runs the full setup sequence
/// (50 Hz, channel 0 high, channels 1–15 off) before its own write.
///
/// All methods take `&mut self`, so register writes to one chip are
/// never interleaved. To share a board between tasks, hand it to
/// `servo_command_task` (feature `task`) and send it [`ServoCommand`]s.
///
/// # Example
///
/// ```ignore
/// use servo_driver::{ServoBoard, DEFAULT_ADDRESS};
///
/// // `i2c` is any `embedded-hal-async` I2C implementation
/// let mut board = ServoBoard::new(i2c, DEFAULT_ADDRESS);
///
/// // Centre the servo on channel 3 (initialises the chip first)
/// board.set_angle(3, 90).await?;
///
/// // Same position, given as a pulse width
/// board.set_pulse(3, 1500).await?;
/// ```
pub struct ServoBoard<I2C, D = Delay> {
    driver: Pca9685<I2C, D>,
    initialized: bool,
}

impl<I2C> ServoBoard<I2C, Delay>
where
    I2C: I2c,
{
    /// Create a new board interface using the Embassy timer for delays.
    ///
    /// No I2C traffic is generated.
    ///
    /// # Arguments
    /// * `i2c`: I2C peripheral (takes ownership for exclusive access)
    /// * `address`: 7-bit I2C device address (typically 0x40)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self::with_delay(i2c, address, Delay)
    }
}

impl<I2C, D> ServoBoard<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a new board interface with a custom delay provider.
    ///
    /// No I2C traffic is generated.
    pub fn with_delay(i2c: I2C, address: u8, delay: D) -> Self {
        Self {
            driver: Pca9685::new(i2c, delay, address),
            initialized: false,
        }
    }

    // -----------------------------------------------------------------------
    // Servo control
    // -----------------------------------------------------------------------

    /// Move the servo on `channel` to `degree`.
    ///
    /// 0–180 degrees maps linearly onto a 600–2400 µs pulse. Neither
    /// argument is range-checked; a channel above 15 is silently ignored.
    ///
    /// # Errors
    /// * [`ServoError::I2c`] on communication failure, including during the
    ///   first-call initialisation
    ///
    /// # Example
    /// ```ignore
    /// board.set_angle(0, 180).await?;
    /// ```
    pub async fn set_angle(
        &mut self,
        channel: u8,
        degree: u16,
    ) -> Result<(), ServoError<I2C::Error>> {
        self.ensure_initialized().await?;
        let ticks = ticks_for_pulse(pulse_for_degree(degree));
        self.driver.set_pwm(channel, 0, ticks).await
    }

    /// Drive the servo on `channel` with a pulse of `pulse_us` microseconds.
    ///
    /// The expected range is 500–2500 µs but nothing is clamped; a channel
    /// above 15 is silently ignored.
    ///
    /// # Errors
    /// * [`ServoError::I2c`] on communication failure, including during the
    ///   first-call initialisation
    pub async fn set_pulse(
        &mut self,
        channel: u8,
        pulse_us: u16,
    ) -> Result<(), ServoError<I2C::Error>> {
        self.ensure_initialized().await?;
        let ticks = ticks_for_pulse(u32::from(pulse_us));
        self.driver.set_pwm(channel, 0, ticks).await
    }

    /// Execute a [`ServoCommand`].
    pub async fn apply(&mut self, command: ServoCommand) -> Result<(), ServoError<I2C::Error>> {
        match command {
            ServoCommand::Angle { channel, degree } => self.set_angle(channel, degree).await,
            ServoCommand::Pulse { channel, micros } => self.set_pulse(channel, micros).await,
            ServoCommand::SetAddress(address) => {
                self.set_address(address);
                Ok(())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Addressing
    // -----------------------------------------------------------------------

    /// Point all future writes at the fixed alternate address `0x7F`.
    ///
    /// Nothing is sent to the bus and the chip at the new address is **not**
    /// initialised: if this board was already initialised, the next command
    /// goes straight to `0x7F` without a setup sequence.
    pub fn reconfigure_address(&mut self) {
        self.set_address(ALT_ADDRESS);
    }

    /// Point all future writes at `address`.
    ///
    /// Same semantics as [`reconfigure_address`](Self::reconfigure_address)
    /// but with a caller-chosen target.
    pub fn set_address(&mut self, address: u8) {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "PCA9685 address {:#x} -> {:#x}",
            self.driver.address(),
            address
        );
        self.driver.set_address(address);
    }

    /// Current target address. No I2C traffic is generated.
    pub fn address(&self) -> u8 {
        self.driver.address()
    }

    /// Whether the setup sequence has completed. No I2C traffic is generated.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Consume the board and return the I2C peripheral and delay provider.
    pub fn release(self) -> (I2C, D) {
        self.driver.release()
    }

    /// Run the setup sequence unless it already completed.
    ///
    /// The flag is only set once the whole sequence succeeded, so a bus
    /// error leaves the board uninitialised and the next call starts over.
    async fn ensure_initialized(&mut self) -> Result<(), ServoError<I2C::Error>> {
        if !self.initialized {
            self.driver.init().await?;
            self.initialized = true;
        }
        Ok(())
    }
}
