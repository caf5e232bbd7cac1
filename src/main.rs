//! Tilt Arcade entry point
//!
//! Brings up the host board once and runs the menu forever. Powering off from
//! the menu just starts a fresh one.

use tilt_arcade::menu::default_catalog;
use tilt_arcade::platform::host;
use tilt_arcade::{HardwareFault, Menu, Settings};

fn run() -> Result<(), HardwareFault> {
    let settings = Settings::load();
    let mut board = host::board(&settings)?;

    loop {
        let mut menu = Menu::new(default_catalog(), settings.clone());
        if settings.power_off_entry {
            menu = menu.with_power_off();
        }
        menu.run(&mut board)?;
        log::info!("Menu closed, starting over");
    }
}

fn main() {
    env_logger::init();
    log::info!("Tilt Arcade starting...");

    match run() {
        Ok(()) | Err(HardwareFault::Shutdown) => log::info!("Tilt Arcade stopped"),
        Err(e) => {
            log::error!("Hardware fault: {}", e);
            std::process::exit(1);
        }
    }
}
