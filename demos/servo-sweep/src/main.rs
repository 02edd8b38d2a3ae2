//! Servo sweep demo
//!
//! Demonstrates the servo-driver crate on the Raspberry Pi Pico 2. One task
//! owns the PCA9685 board and applies commands from a channel; the main
//! task sweeps the servo on channel 1 by angle, then holds it with a raw
//! pulse width.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes                         |
//! |-----------|------------|-------------------------------|
//! | I2C0 SDA  | GP20       |                               |
//! | I2C0 SCL  | GP21       |                               |
//! | V+        | 5 V supply | Servo power, not the Pico 3V3 |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use servo_driver::{servo_command_task, ServoBoard, ServoCommand, DEFAULT_ADDRESS};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

// Wire the I2C0 interrupt to Embassy's handler.
bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

static COMMANDS: Channel<CriticalSectionRawMutex, ServoCommand, 8> = Channel::new();

const SWEEP_CHANNEL: u8 = 1;

#[embassy_executor::task]
async fn servo_task(board: ServoBoard<I2c<'static, I2C0, Async>>) {
    servo_command_task(board, COMMANDS.receiver()).await;
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // --- I2C bus (GP20 = SDA, GP21 = SCL) ---
    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );

    // --- PCA9685 board (initialised on the first command) ---
    let board = ServoBoard::new(i2c, DEFAULT_ADDRESS);
    unwrap!(spawner.spawn(servo_task(board)));

    info!("Servo sweep started on channel {}", SWEEP_CHANNEL);

    loop {
        for degree in (0..=180u16).step_by(10).chain((0..180u16).step_by(10).rev()) {
            COMMANDS
                .send(ServoCommand::Angle {
                    channel: SWEEP_CHANNEL,
                    degree,
                })
                .await;
            Timer::after(Duration::from_millis(100)).await;
        }

        // Park at centre using the pulse form (1500 µs == 90 degrees).
        COMMANDS
            .send(ServoCommand::Pulse {
                channel: SWEEP_CHANNEL,
                micros: 1500,
            })
            .await;
        info!("Sweep done, holding centre");
        Timer::after(Duration::from_millis(2000)).await;
    }
}
