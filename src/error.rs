//! Error types for the servo driver.

use core::fmt;

/// Errors that can occur when communicating with the PWM controller.
///
/// An out-of-range channel is deliberately *not* an error: the write is
/// discarded and the call returns `Ok(())`.
#[derive(Debug)]
pub enum ServoError<E> {
    /// Underlying I2C bus error.
    I2c(E),
}

// Allow ergonomic `?` propagation from raw I2C errors.
impl<E> From<E> for ServoError<E> {
    fn from(error: E) -> Self {
        ServoError::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for ServoError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServoError::I2c(e) => write!(f, "I2C error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for ServoError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ServoError::I2c(e) => defmt::write!(f, "I2C error: {}", e),
        }
    }
}
