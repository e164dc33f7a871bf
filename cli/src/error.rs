//! Error types of the GPIO control utility

use gpiodev::PinId;
use std::io;
use thiserror::Error;

/// Exit status of command line usage error (`sysexits.h`)
pub const EX_USAGE: u8 = 64;

/// Exit status of input/output error (`sysexits.h`)
pub const EX_IOERR: u8 = 74;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or contradictory invocation
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// Failed to open GPIO controller
    #[error("could not open the GPIO device {device}: {source}")]
    Open {
        device: String,
        #[source]
        source: io::Error,
    },

    /// Failed to enumerate pins
    #[error("could not list pins: {0}")]
    List(#[source] io::Error),

    /// Failed pin operation
    #[error("could not {op} pin {pin}: {source}")]
    Pin {
        op: &'static str,
        pin: PinId,
        #[source]
        source: io::Error,
    },

    /// Failed to print results
    #[error("could not write output: {0}")]
    Output(#[from] io::Error),
}

impl Error {
    pub(crate) fn pin(op: &'static str, pin: PinId) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Pin { op, pin, source }
    }

    /// Process exit status
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => EX_USAGE,
            _ => EX_IOERR,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
