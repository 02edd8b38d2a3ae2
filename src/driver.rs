//! Low-level PCA9685 register driver.
//!
//! Implements the register read/write primitives, the frequency-set
//! procedure (including the mandatory oscillator settling delay) and the
//! power-on initialisation sequence.
//!
//! This module is crate-private; consumers interact with [`ServoBoard`]
//! in `servo_board.rs` instead.
//!
//! [`ServoBoard`]: crate::ServoBoard

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::error::ServoError;
use crate::registers::{
    CHANNEL_COUNT, MODE1, MODE1_CLEAR_RESTART, MODE1_RESTART_AI_ALLCALL, MODE1_SLEEP,
    OSCILLATOR_SETTLE_US, PRESCALE, PWM_MAX_TICK, SERVO_FREQUENCY_HZ,
};
use crate::timing::{encode_pwm, prescale_for};

/// Low-level PCA9685 driver.
///
/// Owns the I2C peripheral and the delay provider. The target address is
/// plain state: changing it generates no bus traffic.
pub(crate) struct Pca9685<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C, D> Pca9685<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a new driver. No I2C traffic is generated.
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn set_address(&mut self, address: u8) {
        self.address = address;
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    // -----------------------------------------------------------------------
    // Core protocol primitives
    // -----------------------------------------------------------------------

    /// Write a single 8-bit register.
    pub async fn write_register(
        &mut self,
        register: u8,
        value: u8,
    ) -> Result<(), ServoError<I2C::Error>> {
        self.i2c.write(self.address, &[register, value]).await?;
        Ok(())
    }

    /// Read a single 8-bit register.
    pub async fn read_register(&mut self, register: u8) -> Result<u8, ServoError<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .await?;
        Ok(buf[0])
    }

    /// Program one channel's ON/OFF counters in a single burst write.
    ///
    /// Channels above 15 are discarded without touching the bus. Tick values
    /// are not range-checked.
    pub async fn set_pwm(
        &mut self,
        channel: u8,
        on: u16,
        off: u16,
    ) -> Result<(), ServoError<I2C::Error>> {
        if usize::from(channel) >= CHANNEL_COUNT {
            #[cfg(feature = "defmt")]
            defmt::warn!("Ignoring PWM write to invalid channel {}", channel);
            return Ok(());
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("PWM ch{}: on={} off={}", channel, on, off);

        let buf = encode_pwm(channel, on, off);
        self.i2c.write(self.address, &buf).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Setup sequences
    // -----------------------------------------------------------------------

    /// Set the PWM output frequency.
    ///
    /// The prescaler only latches while the oscillator is asleep, so the
    /// sequence is: sleep, write PRESCALE, restore MODE1, wait for the
    /// oscillator to settle, then restart with auto-increment enabled.
    pub async fn set_frequency(&mut self, freq_hz: u32) -> Result<(), ServoError<I2C::Error>> {
        let prescale = prescale_for(freq_hz);
        let old_mode = self.read_register(MODE1).await?;
        let sleep_mode = (old_mode & MODE1_CLEAR_RESTART) | MODE1_SLEEP;

        self.write_register(MODE1, sleep_mode).await?;
        self.write_register(PRESCALE, prescale).await?;
        self.write_register(MODE1, old_mode).await?;

        // RESTART must not be set before the oscillator is stable.
        self.delay.delay_us(OSCILLATOR_SETTLE_US).await;

        self.write_register(MODE1, old_mode | MODE1_RESTART_AI_ALLCALL)
            .await
    }

    /// Bring the chip from an unknown state to 50 Hz with channel 0 held
    /// high and every other channel off.
    ///
    /// Stops at the first bus error; callers must rerun the whole sequence.
    pub async fn init(&mut self) -> Result<(), ServoError<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("PCA9685 @ {:#x}: init", self.address);

        self.write_register(MODE1, 0x00).await?;
        self.set_frequency(SERVO_FREQUENCY_HZ).await?;

        self.set_pwm(0, 0, PWM_MAX_TICK).await?;
        for channel in 1..CHANNEL_COUNT as u8 {
            self.set_pwm(channel, 0, 0).await?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("PCA9685 @ {:#x}: ready", self.address);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::mock::{Event, Recorder};
    use crate::registers::DEFAULT_ADDRESS;

    #[test]
    fn set_pwm_writes_one_burst() {
        let rec = Recorder::new();
        let mut pca = Pca9685::new(rec.i2c(), rec.delay(), DEFAULT_ADDRESS);

        block_on(pca.set_pwm(3, 0, 307)).unwrap();

        assert_eq!(
            rec.events().as_slice(),
            &[Event::write(0x40, &[0x12, 0x00, 0x00, 0x33, 0x01])]
        );
    }

    #[test]
    fn set_pwm_invalid_channel_is_silent() {
        let rec = Recorder::new();
        let mut pca = Pca9685::new(rec.i2c(), rec.delay(), DEFAULT_ADDRESS);

        assert!(block_on(pca.set_pwm(16, 0, 307)).is_ok());
        assert!(block_on(pca.set_pwm(u8::MAX, 0, 307)).is_ok());

        assert!(rec.events().is_empty());
    }

    #[test]
    fn set_frequency_sequence_order() {
        let rec = Recorder::new();
        rec.mode1.set(0x81);
        let mut pca = Pca9685::new(rec.i2c(), rec.delay(), DEFAULT_ADDRESS);

        block_on(pca.set_frequency(50)).unwrap();

        let expected = [
            Event::Read(0x40, MODE1),
            // RESTART cleared, SLEEP set, other bits kept.
            Event::write(0x40, &[MODE1, 0x11]),
            Event::write(0x40, &[PRESCALE, 121]),
            Event::write(0x40, &[MODE1, 0x81]),
            Event::Delay(5_000_000),
            Event::write(0x40, &[MODE1, 0xA1]),
        ];
        assert_eq!(rec.events().as_slice(), &expected[..]);
    }

    #[test]
    fn init_writes_full_sequence() {
        let rec = Recorder::new();
        let mut pca = Pca9685::new(rec.i2c(), rec.delay(), DEFAULT_ADDRESS);

        block_on(pca.init()).unwrap();

        let events = rec.events();
        assert_eq!(events[0], Event::write(0x40, &[MODE1, 0x00]));
        assert_eq!(events[1], Event::Read(0x40, MODE1));
        assert_eq!(rec.delays().as_slice(), &[5_000_000]);

        // Reset + 4 frequency writes, then one write per channel.
        let writes = rec.writes();
        assert_eq!(writes.len(), 5 + 16);
        assert_eq!(writes[5].1.as_slice(), &[0x06, 0x00, 0x00, 0xFF, 0x0F]);
        for channel in 1..16u8 {
            let (address, bytes) = &writes[5 + usize::from(channel)];
            assert_eq!(*address, 0x40);
            assert_eq!(bytes.as_slice(), &[0x06 + 4 * channel, 0, 0, 0, 0]);
        }
    }

    #[test]
    fn init_stops_at_first_error() {
        let rec = Recorder::new();
        // 0: MODE1 reset, 1: MODE1 read, 2: sleep write.
        rec.fail_at.set(Some(2));
        let mut pca = Pca9685::new(rec.i2c(), rec.delay(), DEFAULT_ADDRESS);

        assert!(matches!(block_on(pca.init()), Err(ServoError::I2c(_))));

        assert_eq!(rec.events().len(), 2);
        assert!(rec.delays().is_empty());
    }

    #[test]
    fn address_change_redirects_writes() {
        let rec = Recorder::new();
        let mut pca = Pca9685::new(rec.i2c(), rec.delay(), DEFAULT_ADDRESS);

        pca.set_address(0x41);
        assert!(rec.events().is_empty());

        block_on(pca.write_register(MODE1, 0x00)).unwrap();
        assert_eq!(rec.events()[0], Event::write(0x41, &[MODE1, 0x00]));
    }
}
