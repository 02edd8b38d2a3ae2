//! Pure timing arithmetic: prescaler, servo pulse mapping and the per-channel
//! ON/OFF register payload.
//!
//! All functions use truncating integer arithmetic and perform no range
//! checks. Values outside the datasheet ranges produce (silently) wrong
//! hardware timing rather than an error.

use crate::registers::{
    LED0_ON_L, OSC_CLOCK_HZ, PWM_RESOLUTION, REGISTERS_PER_CHANNEL, SERVO_PERIOD_US,
};

/// Pulse width commanded at 0 degrees, in microseconds.
const ANGLE_MIN_PULSE_US: u32 = 600;

/// Pulse span covered by the full 0–180 degree throw.
const ANGLE_PULSE_SPAN_US: u32 = 1800;

const ANGLE_MAX_DEGREE: u32 = 180;

/// Prescaler register value for the requested output frequency.
///
/// Computed as `25 MHz / 4096 / freq - 1` with truncating division at each
/// step, not the rounded datasheet formula. Both agree at 50 Hz (121).
///
/// `freq_hz == 0` yields 0. The result is truncated to the low byte, so
/// frequencies above the chip's range wrap instead of saturating.
pub fn prescale_for(freq_hz: u32) -> u8 {
    let divided = (OSC_CLOCK_HZ / PWM_RESOLUTION)
        .checked_div(freq_hz)
        .unwrap_or(1);
    divided.wrapping_sub(1) as u8
}

/// Pulse width in microseconds for a servo angle.
///
/// Maps 0–180 degrees linearly onto 600–2400 µs, a wider throw than the
/// nominal 1000–2000 µs convention.
pub fn pulse_for_degree(degree: u16) -> u32 {
    u32::from(degree) * ANGLE_PULSE_SPAN_US / ANGLE_MAX_DEGREE + ANGLE_MIN_PULSE_US
}

/// OFF counter value for a pulse width within the 20 ms servo period.
pub fn ticks_for_pulse(pulse_us: u32) -> u16 {
    (pulse_us * PWM_RESOLUTION / SERVO_PERIOD_US) as u16
}

/// Build the 5-byte burst that programs one channel's ON/OFF counters.
///
/// Layout: `[register, on_l, on_h, off_l, off_h]`. The caller is
/// responsible for `channel` being in range.
pub fn encode_pwm(channel: u8, on: u16, off: u16) -> [u8; 5] {
    let [on_l, on_h] = on.to_le_bytes();
    let [off_l, off_h] = off.to_le_bytes();
    [
        LED0_ON_L + REGISTERS_PER_CHANNEL * channel,
        on_l,
        on_h,
        off_l,
        off_h,
    ]
}
