//! Command loop that serialises servo traffic from several producers.
//!
//! Producers push [`ServoCommand`]s into an Embassy channel; one
//! [`servo_command_task`] owns the [`ServoBoard`] and applies them in
//! order, so multi-byte counter updates never interleave on the bus.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::servo_board::{ServoBoard, ServoCommand};

// ── Command task ─────────────────────────────────────────────────────────

/// Apply queued servo commands. Never returns.
///
/// This is a regular `async fn`, **not** an Embassy `#[task]`. Callers
/// should create a thin, concrete task wrapper that calls this function,
/// since Embassy tasks cannot be generic:
///
/// ```ignore
/// static COMMANDS: Channel<CriticalSectionRawMutex, ServoCommand, 8> = Channel::new();
///
/// #[embassy_executor::task]
/// async fn servo_task(board: ServoBoard<MyConcreteI2cType>) {
///     servo_command_task(board, COMMANDS.receiver()).await;
/// }
///
/// // Anywhere else:
/// COMMANDS.send(ServoCommand::Angle { channel: 0, degree: 90 }).await;
/// ```
///
/// # Errors
///
/// A failing command is logged (with the `defmt` feature) and dropped; the
/// loop continues with the next one. Since the board only marks itself
/// initialised after a complete setup, a failed first command leaves the
/// next one to retry initialisation.
pub async fn servo_command_task<I2C, D, M, const N: usize>(
    mut board: ServoBoard<I2C, D>,
    commands: Receiver<'_, M, ServoCommand, N>,
) where
    I2C: I2c,
    D: DelayNs,
    M: RawMutex,
{
    loop {
        let command = commands.receive().await;
        if let Err(_e) = board.apply(command).await {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "Servo command {} failed: {}",
                command,
                defmt::Debug2Format(&_e)
            );
        }
    }
}
