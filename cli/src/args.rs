#[derive(clap::Parser)]
#[command(
    name = "gpioctl",
    version,
    about = "Inspect and control GPIO pins",
    // repeated options are accepted and the last value wins
    args_override_self = true,
    group(clap::ArgGroup::new("mode").args(["list", "toggle", "config", "pin"])),
)]
pub struct Args {
    /// GPIO controller device path, name (ex. gpiochip1) or index
    #[arg(short = 'f', value_name = "CTLDEV", env = "GPIOCTL_DEVICE")]
    pub ctldev: Option<String>,

    /// Verbose output
    #[arg(short = 'v')]
    pub verbose: bool,

    /// List pins
    #[arg(short = 'l')]
    pub list: bool,

    /// Toggle pin
    #[arg(short = 't', value_name = "PIN")]
    pub toggle: Option<gpiodev::PinId>,

    /// Set pin flags as number (ex. 0x22) or names (ex. OUT,PU)
    #[arg(short = 'c', num_args = 2, value_names = ["PIN", "FLAG"])]
    pub config: Option<Vec<String>>,

    /// Pin to read or to drive
    #[arg(value_name = "PIN")]
    pub pin: Option<gpiodev::PinId>,

    /// Value to drive the pin to
    #[arg(value_name = "VALUE", value_enum, requires = "pin")]
    pub value: Option<gpiodev::PinValue>,

    #[cfg(feature = "complete")]
    /// Generate autocompletion
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    pub complete: Option<clap_complete::Shell>,
}
