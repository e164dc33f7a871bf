use crate::{utils::*, Error, Result};
use std::{fmt, ops, str};

/// Pin number within a controller
pub type PinId = u32;

bitflags::bitflags! {
    /// Configuration flags of a GPIO pin
    ///
    /// The bit values are the classic `sys/gpio.h` ones, so numeric flag
    /// masks written for other GPIO tools keep their meaning.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PinFlags: u32 {
        /// Pin acts as input
        const INPUT = 0x0001;
        /// Pin acts as output
        const OUTPUT = 0x0002;
        /// Output drives with open drain
        const OPENDRAIN = 0x0004;
        /// Output drives push-pull
        const PUSHPULL = 0x0008;
        /// Output is tri-stated
        const TRISTATE = 0x0010;
        /// Internal pull-up enabled
        const PULLUP = 0x0020;
        /// Internal pull-down enabled
        const PULLDOWN = 0x0040;
        /// Input is inverted
        const INVIN = 0x0080;
        /// Output is inverted
        const INVOUT = 0x0100;
        /// Output pulsates
        const PULSATE = 0x0200;
    }
}

/// Short name and accepted aliases of each flag
const FLAG_NAMES: [(PinFlags, &str, &[&str]); 10] = [
    (PinFlags::INPUT, "IN", &["input"]),
    (PinFlags::OUTPUT, "OUT", &["output"]),
    (PinFlags::OPENDRAIN, "OD", &["opendrain", "open-drain"]),
    (PinFlags::PUSHPULL, "PP", &["pushpull", "push-pull"]),
    (PinFlags::TRISTATE, "TS", &["tristate"]),
    (PinFlags::PULLUP, "PU", &["pullup", "pull-up"]),
    (PinFlags::PULLDOWN, "PD", &["pulldown", "pull-down"]),
    (PinFlags::INVIN, "II", &["invin"]),
    (PinFlags::INVOUT, "IO", &["invout"]),
    (PinFlags::PULSATE, "PULSE", &["pulsate"]),
];

impl PinFlags {
    /// Check flags against controller capabilities and for contradictions
    pub fn validate(self, caps: PinFlags) -> Result<()> {
        if !caps.contains(self) {
            return Err(unsupported("Pin flags not supported by controller"));
        }
        if self.contains(Self::INPUT | Self::OUTPUT) {
            return Err(invalid_input("Pin cannot be both input and output"));
        }
        if self.contains(Self::OPENDRAIN | Self::PUSHPULL) {
            return Err(invalid_input("Pin cannot be both open-drain and push-pull"));
        }
        if self.contains(Self::PULLUP | Self::PULLDOWN) {
            return Err(invalid_input("Pin cannot be pulled both up and down"));
        }
        Ok(())
    }
}

impl fmt::Display for PinFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, name, _) in FLAG_NAMES.iter() {
            if self.contains(*flag) {
                if !first {
                    ','.fmt(f)?;
                }
                name.fmt(f)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl str::FromStr for PinFlags {
    type Err = Error;

    /// Parse numeric mask (decimal or `0x` hex) or comma-separated flag names
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() {
            return Err(invalid_input("Empty pin flags"));
        }

        let bits = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(u32::from_str_radix(hex, 16).map_err(|_| invalid_input("Invalid pin flags"))?)
        } else if s.bytes().all(|c| c.is_ascii_digit()) {
            Some(s.parse().map_err(|_| invalid_input("Invalid pin flags"))?)
        } else {
            None
        };

        if let Some(bits) = bits {
            return Self::from_bits(bits).ok_or_else(|| invalid_input("Unknown pin flags"));
        }

        s.split([',', '|'])
            .map(str::trim)
            .try_fold(Self::empty(), |flags, name| {
                FLAG_NAMES
                    .iter()
                    .find(|(_, short, aliases)| {
                        short.eq_ignore_ascii_case(name)
                            || aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
                    })
                    .map(|(flag, _, _)| flags | *flag)
                    .ok_or_else(|| invalid_input("Not recognized pin flag"))
            })
    }
}

/// Logic value of a GPIO pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[repr(u8)]
pub enum PinValue {
    /// Low level (default)
    #[default]
    #[cfg_attr(feature = "clap", value(aliases = ["0", "off", "false", "lo"]))]
    Low = 0,
    /// High level
    #[cfg_attr(feature = "clap", value(aliases = ["1", "on", "true", "hi"]))]
    High = 1,
}

impl From<bool> for PinValue {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinValue> for bool {
    fn from(value: PinValue) -> Self {
        matches!(value, PinValue::High)
    }
}

impl ops::Not for PinValue {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl fmt::Display for PinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (*self as u8).fmt(f)
    }
}

impl str::FromStr for PinValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim() {
            "0" | "off" | "false" | "lo" | "low" => Self::Low,
            "1" | "on" | "true" | "hi" | "high" => Self::High,
            _ => return Err(invalid_input("Not recognized pin value")),
        })
    }
}

/// The configuration of a specific GPIO pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinConfig {
    /// Pin number
    pub pin: PinId,

    /// Pin name
    pub name: String,

    /// Flags the pin can be configured with
    pub caps: PinFlags,

    /// Current pin flags
    pub flags: PinFlags,

    /// Whether the pin is held by some consumer
    ///
    /// Values of used pins cannot be read or written.
    pub used: bool,
}

impl fmt::Display for PinConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "unnamed")?;
        } else {
            self.name.fmt(f)?;
        }
        write!(f, "<{}>", self.flags)
    }
}
