//! GPIO controller access through the Linux character device
//!
//! ```no_run
//! use gpiodev::{Handle, PinFlags};
//!
//! let gpio = Handle::open(0)?;
//!
//! gpio.pin_set_flags(5, PinFlags::OUTPUT)?;
//! gpio.pin_toggle(5)?;
//!
//! for config in gpio.pin_list()? {
//!     println!("{}: {}", config.pin, config);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

use std::{
    fmt, fs,
    fs::{File, OpenOptions},
    ops::Deref,
    os::unix::{
        fs::{FileTypeExt, MetadataExt},
        io::{AsRawFd, FromRawFd},
    },
    path::{Path, PathBuf},
};

use gpiodev_core::{invalid_input, major, minor, PinLine};

pub use gpiodev_core::{
    ChipInfo, Error, PinConfig, PinFlags, PinId, PinValue, Result, CHARDEV_CAPS,
};

/// Directory where controller devices live
pub const DEV_DIR: &str = "/dev";

/// Controller device name prefix
pub const DEV_PREFIX: &str = "gpiochip";

/// A requested pin
struct Line {
    line: PinLine,
    // wrap file to call close on drop
    file: File,
}

impl Line {
    fn get_value(&self) -> Result<PinValue> {
        self.line.get_value(self.file.as_raw_fd())
    }

    fn set_value(&mut self, value: PinValue) -> Result<()> {
        self.line.set_value(self.file.as_raw_fd(), value)
    }

    fn set_flags(&mut self, flags: PinFlags) -> Result<()> {
        self.line.set_flags(self.file.as_raw_fd(), flags)
    }
}

/// A GPIO controller handle
///
/// The controller device stays open while the handle lives.
/// Pins are requested only for the duration of a single operation,
/// so the handle never keeps pins busy for other consumers.
pub struct Handle {
    info: ChipInfo,
    path: PathBuf,
    consumer: String,
    // wrap file to call close on drop
    file: File,
}

impl Deref for Handle {
    type Target = ChipInfo;

    fn deref(&self) -> &Self::Target {
        &self.info
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.info.fmt(f)
    }
}

impl Handle {
    /// Path of controller device by index
    pub fn device_path(index: u32) -> PathBuf {
        Path::new(DEV_DIR).join(format!("{}{}", DEV_PREFIX, index))
    }

    /// Open controller by index (ex. 0 for `/dev/gpiochip0`)
    pub fn open(index: u32) -> Result<Handle> {
        Handle::open_device(Handle::device_path(index))
    }

    /// Open controller by device path
    ///
    /// Bare names like `gpiochip1` are looked up in `/dev` when no such file
    /// exists in the current directory.
    pub fn open_device(path: impl AsRef<Path>) -> Result<Handle> {
        let mut path = path.as_ref().to_path_buf();

        if path.components().count() == 1 && !path.exists() {
            path = Path::new(DEV_DIR).join(path);
        }

        log::debug!("opening GPIO controller {}", path.display());

        Handle::check_device(&path)?;

        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        let info = ChipInfo::from_fd(file.as_raw_fd())?;

        log::debug!("opened {}", info);

        Ok(Handle {
            info,
            path,
            consumer: env!("CARGO_PKG_NAME").into(),
            file,
        })
    }

    fn check_device(path: &Path) -> Result<()> {
        let metadata = fs::metadata(path)?;

        /* Is it a character device? */
        if !metadata.file_type().is_char_device() {
            return Err(invalid_input("File is not character device"));
        }

        let rdev = metadata.rdev();

        /* Is the device associated with the GPIO subsystem? */
        if fs::canonicalize(format!(
            "/sys/dev/char/{}:{}/subsystem",
            major(rdev),
            minor(rdev)
        ))? != Path::new("/sys/bus/gpio")
        {
            return Err(invalid_input("Character device is not a GPIO"));
        }

        Ok(())
    }

    /// Device path of the controller
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the consumer label used when pins are requested
    pub fn set_consumer(&mut self, consumer: impl Into<String>) {
        self.consumer = consumer.into();
    }

    /// Number of pins of the controller
    pub fn num_pins(&self) -> PinId {
        self.info.num_pins
    }

    fn request(&self, pin: PinId) -> Result<Line> {
        let (line, fd) = self
            .info
            .request_pin(self.file.as_raw_fd(), pin, &self.consumer)?;

        let file = unsafe { File::from_raw_fd(fd) };

        Ok(Line { line, file })
    }

    /// Get the configuration of a specific pin
    pub fn pin_config(&self, pin: PinId) -> Result<PinConfig> {
        self.info.pin_config(self.file.as_raw_fd(), pin)
    }

    /// Get the configuration of all pins
    pub fn pin_list(&self) -> Result<Vec<PinConfig>> {
        (0..self.num_pins())
            .map(|pin| self.pin_config(pin))
            .collect()
    }

    /// Replace the flags of a pin
    ///
    /// Flags are checked against [CHARDEV_CAPS] and for contradicting combinations.
    /// An output pin keeps its level.
    pub fn pin_set_flags(&self, pin: PinId, flags: PinFlags) -> Result<()> {
        self.request(pin)?.set_flags(flags)
    }

    /// Read the value of a pin
    pub fn pin_get(&self, pin: PinId) -> Result<PinValue> {
        self.request(pin)?.get_value()
    }

    /// Drive a pin to the value
    ///
    /// Input pins are switched to output.
    pub fn pin_set(&self, pin: PinId, value: PinValue) -> Result<()> {
        self.request(pin)?.set_value(value)
    }

    /// Invert the value of a pin
    pub fn pin_toggle(&self, pin: PinId) -> Result<()> {
        let mut line = self.request(pin)?;
        let value = line.get_value()?;

        log::debug!("toggle pin {} from {}", pin, value);

        line.set_value(!value)
    }
}
