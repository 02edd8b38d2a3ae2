//! Async servo driver for the PCA9685 16-channel PWM controller.
//!
//! This crate provides an Embassy-compatible async I2C driver that turns a
//! PCA9685 board into a 16-channel hobby servo controller running at 50 Hz.
//!
//! # Architecture
//!
//! The crate is split into layers:
//!
//! - **`timing`**: Pure arithmetic: prescaler value, angle/pulse to tick
//!   mapping, and the 5-byte ON/OFF register payload.
//! - **`driver`** (crate-private): Register primitives, the frequency-set
//!   procedure with its oscillator settling delay, and the setup sequence.
//! - **[`ServoBoard`]** (public): Lazily initialised, high-level API for
//!   positioning servos by angle or pulse width.
//! - **`servo_task`** (feature `task`): Command loop that owns a board and
//!   applies [`ServoCommand`]s from an Embassy channel.
//!
//! # Quick start
//!
//! ```ignore
//! use servo_driver::{ServoBoard, DEFAULT_ADDRESS};
//!
//! // Construct with any `embedded-hal-async` I2C implementation
//! let mut board = ServoBoard::new(i2c, DEFAULT_ADDRESS);
//!
//! // First command configures the chip, then moves the servo
//! board.set_angle(0, 90).await?;
//! ```
//!
//! # Features
//!
//! - **`task`** *(default)*: [`servo_command_task`] via `embassy-sync`.
//! - **`defmt`**: Logging via [`defmt`] and [`defmt::Format`]
//!   implementations on public types.

#![no_std]

pub use error::ServoError;
pub use registers::{ALT_ADDRESS, CHANNEL_COUNT, DEFAULT_ADDRESS, SERVO_FREQUENCY_HZ};
pub use servo_board::{ServoBoard, ServoCommand};
#[cfg(feature = "task")]
pub use servo_task::servo_command_task;
pub use timing::{encode_pwm, prescale_for, pulse_for_degree, ticks_for_pulse};

mod driver;
mod error;
#[cfg(test)]
mod mock;
pub mod registers;
mod servo_board;
#[cfg(feature = "task")]
mod servo_task;
pub mod timing;
