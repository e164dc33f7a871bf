use crate::{
    error::{Error, Result},
    opts::{Device, Mode},
};
use gpiodev::{Handle, PinConfig, PinFlags, PinId, PinValue};
use std::io::{self, Write};

/// Pin operations the utility performs on a controller
pub trait Controller {
    fn pin_list(&self) -> io::Result<Vec<PinConfig>>;

    fn pin_get(&self, pin: PinId) -> io::Result<PinValue>;

    fn pin_set(&self, pin: PinId, value: PinValue) -> io::Result<()>;

    fn pin_toggle(&self, pin: PinId) -> io::Result<()>;

    fn pin_set_flags(&self, pin: PinId, flags: PinFlags) -> io::Result<()>;
}

impl Controller for Handle {
    fn pin_list(&self) -> io::Result<Vec<PinConfig>> {
        Handle::pin_list(self)
    }

    fn pin_get(&self, pin: PinId) -> io::Result<PinValue> {
        Handle::pin_get(self, pin)
    }

    fn pin_set(&self, pin: PinId, value: PinValue) -> io::Result<()> {
        Handle::pin_set(self, pin, value)
    }

    fn pin_toggle(&self, pin: PinId) -> io::Result<()> {
        Handle::pin_toggle(self, pin)
    }

    fn pin_set_flags(&self, pin: PinId, flags: PinFlags) -> io::Result<()> {
        Handle::pin_set_flags(self, pin, flags)
    }
}

/// Open GPIO controller
pub fn open(device: &Device) -> Result<Handle> {
    match device {
        Device::Index(index) => Handle::open(*index),
        Device::Path(path) => Handle::open_device(path),
    }
    .map_err(|source| Error::Open {
        device: device.to_string(),
        source,
    })
}

/// Perform the requested operation
pub fn dispatch(
    ctl: &impl Controller,
    mode: Mode,
    verbose: bool,
    out: &mut impl Write,
) -> Result<()> {
    match mode {
        Mode::Check => {
            log::debug!("device is ok");
        }

        Mode::List => {
            for config in ctl.pin_list().map_err(Error::List)? {
                let value = if config.used {
                    "-".to_string()
                } else {
                    match ctl.pin_get(config.pin) {
                        Ok(value) => value.to_string(),
                        Err(error) => {
                            log::debug!("could not read pin {}: {}", config.pin, error);
                            "-".to_string()
                        }
                    }
                };

                write!(out, "pin {:02}:\t{}\t{}", config.pin, value, config)?;
                if verbose {
                    write!(out, ", caps:<{}>", config.caps)?;
                }
                writeln!(out)?;
            }
        }

        Mode::Toggle { pin } => {
            ctl.pin_toggle(pin).map_err(Error::pin("toggle", pin))?;
        }

        Mode::Configure { pin, flags } => {
            log::debug!("set pin {} flags to <{}>", pin, flags);
            ctl.pin_set_flags(pin, flags)
                .map_err(Error::pin("configure", pin))?;
        }

        Mode::Get { pin } => {
            let value = ctl.pin_get(pin).map_err(Error::pin("read", pin))?;
            writeln!(out, "{}", value)?;
        }

        Mode::Set { pin, value } => {
            ctl.pin_set(pin, value).map_err(Error::pin("set", pin))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::{EX_IOERR, EX_USAGE};
    use gpiodev::CHARDEV_CAPS;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        List,
        Get(PinId),
        Set(PinId, PinValue),
        Toggle(PinId),
        SetFlags(PinId, PinFlags),
    }

    /// In-memory controller which records calls
    struct Sim {
        pins: RefCell<Vec<(PinConfig, PinValue)>>,
        calls: RefCell<Vec<Call>>,
        fail: bool,
    }

    impl Sim {
        fn new(num_pins: PinId) -> Self {
            let pins = (0..num_pins)
                .map(|pin| {
                    let config = PinConfig {
                        pin,
                        name: format!("gpio{}", pin),
                        caps: CHARDEV_CAPS,
                        flags: PinFlags::INPUT,
                        used: false,
                    };
                    (config, PinValue::Low)
                })
                .collect();
            Self {
                pins: RefCell::new(pins),
                calls: RefCell::default(),
                fail: false,
            }
        }

        fn failing(num_pins: PinId) -> Self {
            Self {
                fail: true,
                ..Self::new(num_pins)
            }
        }

        fn record(&self, call: Call) -> io::Result<()> {
            self.calls.borrow_mut().push(call);
            if self.fail {
                Err(io::Error::from_raw_os_error(16))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn value(&self, pin: PinId) -> PinValue {
            self.pins.borrow()[pin as usize].1
        }

        fn check_pin(&self, pin: PinId) -> io::Result<()> {
            if (pin as usize) < self.pins.borrow().len() {
                Ok(())
            } else {
                Err(io::Error::new(io::ErrorKind::InvalidInput, "Pin number out of range"))
            }
        }
    }

    impl Controller for Sim {
        fn pin_list(&self) -> io::Result<Vec<PinConfig>> {
            self.record(Call::List)?;
            Ok(self.pins.borrow().iter().map(|(config, _)| config.clone()).collect())
        }

        fn pin_get(&self, pin: PinId) -> io::Result<PinValue> {
            self.record(Call::Get(pin))?;
            self.check_pin(pin)?;
            Ok(self.value(pin))
        }

        fn pin_set(&self, pin: PinId, value: PinValue) -> io::Result<()> {
            self.record(Call::Set(pin, value))?;
            self.check_pin(pin)?;
            let mut pins = self.pins.borrow_mut();
            let (config, current) = &mut pins[pin as usize];
            config.flags = (config.flags - PinFlags::INPUT) | PinFlags::OUTPUT;
            *current = value;
            Ok(())
        }

        fn pin_toggle(&self, pin: PinId) -> io::Result<()> {
            self.record(Call::Toggle(pin))?;
            self.check_pin(pin)?;
            let mut pins = self.pins.borrow_mut();
            let (_, current) = &mut pins[pin as usize];
            *current = !*current;
            Ok(())
        }

        fn pin_set_flags(&self, pin: PinId, flags: PinFlags) -> io::Result<()> {
            self.record(Call::SetFlags(pin, flags))?;
            self.check_pin(pin)?;
            flags.validate(CHARDEV_CAPS)?;
            self.pins.borrow_mut()[pin as usize].0.flags = flags;
            Ok(())
        }
    }

    fn run(ctl: &Sim, mode: Mode, verbose: bool) -> Result<String> {
        let mut out = Vec::new();
        dispatch(ctl, mode, verbose, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn check_only() {
        let sim = Sim::new(8);
        assert_eq!(run(&sim, Mode::Check, false).unwrap(), "");
        assert!(sim.calls().is_empty());
    }

    #[test]
    fn toggle_once() {
        let sim = Sim::new(8);
        assert_eq!(run(&sim, Mode::Toggle { pin: 5 }, false).unwrap(), "");
        assert_eq!(sim.calls(), [Call::Toggle(5)]);
    }

    #[test]
    fn toggle_alternates() {
        let sim = Sim::new(8);
        let initial = sim.value(5);

        run(&sim, Mode::Toggle { pin: 5 }, false).unwrap();
        assert_eq!(sim.value(5), !initial);

        run(&sim, Mode::Toggle { pin: 5 }, false).unwrap();
        assert_eq!(sim.value(5), initial);

        assert_eq!(sim.calls(), [Call::Toggle(5), Call::Toggle(5)]);
    }

    #[test]
    fn configure_once() {
        let sim = Sim::new(8);
        let mode = Mode::Configure {
            pin: 3,
            flags: PinFlags::INPUT,
        };
        assert_eq!(run(&sim, mode, false).unwrap(), "");
        assert_eq!(sim.calls(), [Call::SetFlags(3, PinFlags::INPUT)]);
    }

    #[test]
    fn list_pins() {
        let sim = Sim::new(3);
        sim.pins.borrow_mut()[1].1 = PinValue::High;
        sim.pins.borrow_mut()[2].0.used = true;

        let out = run(&sim, Mode::List, false).unwrap();
        assert_eq!(
            out,
            "pin 00:\t0\tgpio0<IN>\npin 01:\t1\tgpio1<IN>\npin 02:\t-\tgpio2<IN>\n"
        );

        assert!(!sim
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Toggle(_) | Call::SetFlags(..) | Call::Set(..))));
    }

    #[test]
    fn list_pins_verbose() {
        let sim = Sim::new(1);
        let out = run(&sim, Mode::List, true).unwrap();
        assert_eq!(
            out,
            "pin 00:\t0\tgpio0<IN>, caps:<IN,OUT,OD,PP,PU,PD,II,IO>\n"
        );
    }

    #[test]
    fn get_and_set() {
        let sim = Sim::new(8);
        assert_eq!(run(&sim, Mode::Get { pin: 2 }, false).unwrap(), "0\n");

        let mode = Mode::Set {
            pin: 2,
            value: PinValue::High,
        };
        assert_eq!(run(&sim, mode, false).unwrap(), "");
        assert_eq!(run(&sim, Mode::Get { pin: 2 }, false).unwrap(), "1\n");

        assert_eq!(
            sim.calls(),
            [
                Call::Get(2),
                Call::Set(2, PinValue::High),
                Call::Get(2)
            ]
        );
    }

    #[test]
    fn pin_failures() {
        let sim = Sim::failing(8);

        let err = run(&sim, Mode::Toggle { pin: 5 }, false).unwrap_err();
        assert!(matches!(err, Error::Pin { op: "toggle", pin: 5, .. }));
        assert_eq!(err.exit_code(), EX_IOERR);
        assert!(err.to_string().starts_with("could not toggle pin 5: "));

        let err = run(&sim, Mode::List, false).unwrap_err();
        assert!(matches!(err, Error::List(_)));
        assert_eq!(err.exit_code(), EX_IOERR);

        assert_eq!(sim.calls(), [Call::Toggle(5), Call::List]);
    }

    #[test]
    fn invalid_pin_and_flags() {
        let sim = Sim::new(4);

        let err = run(&sim, Mode::Toggle { pin: 9 }, false).unwrap_err();
        assert_eq!(err.exit_code(), EX_IOERR);

        let mode = Mode::Configure {
            pin: 1,
            flags: PinFlags::PULSATE,
        };
        let err = run(&sim, mode, false).unwrap_err();
        assert!(matches!(err, Error::Pin { op: "configure", pin: 1, .. }));
    }

    #[test]
    fn open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let device = Device::Path(dir.path().join("gpiochip0"));

        let err = open(&device).err().unwrap();
        assert!(matches!(err, Error::Open { .. }));
        assert_eq!(err.exit_code(), EX_IOERR);
        assert!(err
            .to_string()
            .starts_with("could not open the GPIO device "));
    }

    #[test]
    fn usage_exit_code() {
        use clap::Parser;

        let err = crate::args::Args::try_parse_from(["gpioctl", "-l", "-t", "5"])
            .err()
            .unwrap();
        assert_eq!(Error::from(err).exit_code(), EX_USAGE);
    }
}
