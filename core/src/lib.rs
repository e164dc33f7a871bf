//! Raw layer of GPIO controller access through the Linux character device
//!
//! This crate talks to `/dev/gpiochipN` through the uAPI v2 ioctls and translates
//! between line flags and the classic GPIO pin flags.

#[cfg(not(target_os = "linux"))]
compile_error!("This crate support Linux only");

mod iop;
mod raw;
mod types;
mod utils;

use std::{fmt, os::unix::io::RawFd};

pub use iop::CHARDEV_CAPS;
pub use std::io::{Error, Result};
pub use types::{PinConfig, PinFlags, PinId, PinValue};
pub use utils::*;

macro_rules! unsafe_call {
    ($res:expr) => {
        unsafe { $res }.map_err(Error::from)
    };
}

/// A single requested pin
///
/// Keeps the line configuration which was in effect when the pin was requested
/// and updates it on reconfiguration.
pub struct PinLine {
    pub chip_name: String,
    pub consumer: String,
    pub pin: PinId,
    flags: u64,
}

impl fmt::Display for PinLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.chip_name, self.consumer, self.pin)
    }
}

impl PinLine {
    pub fn get_value(&self, fd: RawFd) -> Result<PinValue> {
        let mut values = raw::GpioLineValues::single(None);

        unsafe_call!(raw::gpio_line_get_values(fd, &mut values))?;

        Ok(values.as_value())
    }

    /// Drive the pin
    ///
    /// Pins which are not outputs yet get switched to output.
    pub fn set_value(&mut self, fd: RawFd, value: PinValue) -> Result<()> {
        if is_set(self.flags, raw::GPIO_V2_LINE_FLAG_OUTPUT) {
            let mut values = raw::GpioLineValues::single(Some(value));

            unsafe_call!(raw::gpio_line_set_values(fd, &mut values))?;

            Ok(())
        } else {
            self.reconfigure(fd, iop::output_flags(self.flags), Some(value))
        }
    }

    /// Replace the pin flags
    ///
    /// Outputs keep the level the pin had before reconfiguration.
    pub fn set_flags(&mut self, fd: RawFd, flags: PinFlags) -> Result<()> {
        let line_flags = iop::line_flags(flags, self.flags)?;

        let value = if is_set(line_flags, raw::GPIO_V2_LINE_FLAG_OUTPUT) {
            Some(self.get_value(fd)?)
        } else {
            None
        };

        self.reconfigure(fd, line_flags, value)
    }

    fn reconfigure(&mut self, fd: RawFd, flags: u64, value: Option<PinValue>) -> Result<()> {
        log::debug!("reconfigure {} with line flags {:#x}", self, flags);

        let mut config = raw::GpioLineConfig::new(flags, value);

        unsafe_call!(raw::gpio_line_set_config(fd, &mut config))?;

        self.flags = flags;

        Ok(())
    }
}

/// A Linux chardev GPIO controller interface
///
/// It can be used to get information about the controller and its pins
/// and to request pins for reading and driving.
pub struct ChipInfo {
    pub name: String,
    pub label: String,
    pub num_pins: PinId,
}

impl fmt::Display for ChipInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({} pins)", self.name, self.label, self.num_pins)
    }
}

impl ChipInfo {
    pub fn from_fd(fd: RawFd) -> Result<Self> {
        let mut info = raw::GpioChipInfo::default();

        unsafe_call!(raw::gpio_get_chip_info(fd, &mut info))?;

        Ok(Self {
            name: safe_get_str(&info.name)?.into(),
            label: safe_get_str(&info.label)?.into(),
            num_pins: info.lines,
        })
    }

    pub fn check_pin(&self, pin: PinId) -> Result<()> {
        if pin < self.num_pins {
            Ok(())
        } else {
            Err(invalid_input("Pin number out of range"))
        }
    }

    fn line_info(&self, fd: RawFd, pin: PinId) -> Result<raw::GpioLineInfo> {
        self.check_pin(pin)?;

        let mut info = raw::GpioLineInfo {
            offset: pin,
            ..Default::default()
        };

        unsafe_call!(raw::gpio_get_line_info(fd, &mut info))?;

        Ok(info)
    }

    /// Request the configuration of a specific pin
    pub fn pin_config(&self, fd: RawFd, pin: PinId) -> Result<PinConfig> {
        self.line_info(fd, pin)?.as_config()
    }

    /// Request the pin for exclusive use without changing its configuration
    ///
    /// The returned descriptor holds the pin until it is closed.
    pub fn request_pin(&self, fd: RawFd, pin: PinId, consumer: &str) -> Result<(PinLine, RawFd)> {
        let info = self.line_info(fd, pin)?;
        let flags = info.flags & raw::GPIO_V2_LINE_CONFIG_FLAGS;

        let mut request = raw::GpioLineRequest::new(
            pin,
            raw::GpioLineConfig::new(iop::as_is_flags(flags), None),
            consumer,
        )?;

        unsafe_call!(raw::gpio_get_line(fd, &mut request))?;

        log::debug!("requested pin {} of {} as {}", pin, self.name, consumer);

        Ok((
            PinLine {
                chip_name: self.name.clone(),
                consumer: consumer.into(),
                pin,
                flags,
            },
            request.fd,
        ))
    }
}
