// k720-rs/k720/examples/dispense.rs

//! Dispense one card, print its UID, and eject it.
//!
//! ```text
//! cargo run --example dispense -- /dev/ttyUSB0
//! ```

use anyhow::{Context, Result};

use k720::channel::SerialChannel;
use k720::device::Session;
use k720::mechanical::MechanicalController;
use k720::types::CardFamily;

fn main() -> Result<()> {
    env_logger::init();

    let port = std::env::args()
        .nth(1)
        .context("usage: dispense <serial-port>")?;

    let channel = SerialChannel::open(&port, 9600).context("open serial port")?;
    let mut session = Session::new(Box::new(channel));
    let mut controller = MechanicalController::default();

    println!("firmware: {}", session.version()?);

    let snapshot = controller.check_position(&mut session)?;
    println!("card box: {:?}", snapshot.card_box);

    controller.send_card(&mut session)?;
    let uid = session.mifare_get_id(CardFamily::S50)?;
    println!("dispensed card {}", uid.to_hex());

    controller.eject_card(&mut session)?;
    println!("card taken");
    Ok(())
}
