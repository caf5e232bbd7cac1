//! Hardware fault type
//!
//! Gameplay endings (crash, breach, exit) are not errors. Only collaborator
//! failures travel through `Result`, up to the process boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HardwareFault {
    #[error("display fault: {0}")]
    Display(String),
    #[error("motion sensor fault: {0}")]
    Sensor(String),
    #[error("tone generator fault: {0}")]
    Tone(String),
    #[error("button fault: {0}")]
    Button(String),
    /// The host asked to quit; not a fault, ends the process cleanly
    #[error("shutdown requested")]
    Shutdown,
    #[error("host I/O failed")]
    Io(#[from] std::io::Error),
}

pub type HwResult<T> = Result<T, HardwareFault>;
