//! Centralized error type for the crosstalk umbrella crate.
//!
//! Wraps the subsystem errors so `?` propagates across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] crosstalk_core::Error),

    #[error("UI: {0}")]
    Ui(#[from] crosstalk_ui::Error),
}

impl Error {
    /// True if a message was dropped because its queue was full.
    pub fn is_drop(&self) -> bool {
        match self {
            Error::Core(e) => e.is_drop(),
            Error::Ui(e) => e.is_drop(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
