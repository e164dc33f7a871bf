use crate::args::Args;
use clap::{error::ErrorKind, CommandFactory};
use gpiodev::{Handle, PinFlags, PinId, PinValue};
use std::{fmt, path::PathBuf};

/// GPIO controller to open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Device {
    /// Controller by index (ex. 0 for `/dev/gpiochip0`)
    Index(u32),
    /// Controller by device path or name
    Path(PathBuf),
}

impl Default for Device {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => Handle::device_path(*index).display().fmt(f),
            Self::Path(path) => path.display().fmt(f),
        }
    }
}

impl From<&str> for Device {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(index) => Self::Index(index),
            Err(_) => Self::Path(s.into()),
        }
    }
}

/// Operation to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Open the device only
    Check,
    /// List pins
    List,
    /// Invert pin value
    Toggle { pin: PinId },
    /// Replace pin flags
    Configure { pin: PinId, flags: PinFlags },
    /// Print pin value
    Get { pin: PinId },
    /// Drive pin
    Set { pin: PinId, value: PinValue },
}

/// Invocation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub device: Device,
    pub verbose: bool,
    pub mode: Mode,
}

fn usage_error(kind: ErrorKind, message: impl fmt::Display) -> clap::Error {
    Args::command().error(kind, message)
}

impl TryFrom<Args> for Options {
    type Error = clap::Error;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let device = args
            .ctldev
            .as_deref()
            .map(Device::from)
            .unwrap_or_default();

        let mode = if args.list {
            Mode::List
        } else if let Some(pin) = args.toggle {
            Mode::Toggle { pin }
        } else if let Some(config) = args.config {
            // the last occurrence wins when -c is repeated
            let [.., pin, flags] = config.as_slice() else {
                return Err(usage_error(
                    ErrorKind::WrongNumberOfValues,
                    "-c requires PIN and FLAG",
                ));
            };
            let pin = pin.parse().map_err(|_| {
                usage_error(ErrorKind::ValueValidation, format!("invalid pin '{pin}'"))
            })?;
            let flags = flags.parse().map_err(|err| {
                usage_error(
                    ErrorKind::ValueValidation,
                    format!("invalid flag '{flags}': {err}"),
                )
            })?;
            Mode::Configure { pin, flags }
        } else if let Some(pin) = args.pin {
            match args.value {
                Some(value) => Mode::Set { pin, value },
                None => Mode::Get { pin },
            }
        } else {
            Mode::Check
        };

        Ok(Self {
            device,
            verbose: args.verbose,
            mode,
        })
    }
}
