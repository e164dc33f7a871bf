use crate::{raw::*, utils::*, PinConfig, PinFlags, PinId, PinValue, Result};

/// Pin flags which the character device interface can express
pub const CHARDEV_CAPS: PinFlags = PinFlags::INPUT
    .union(PinFlags::OUTPUT)
    .union(PinFlags::OPENDRAIN)
    .union(PinFlags::PUSHPULL)
    .union(PinFlags::PULLUP)
    .union(PinFlags::PULLDOWN)
    .union(PinFlags::INVIN)
    .union(PinFlags::INVOUT);

const DIRECTION_FLAGS: u64 = GPIO_V2_LINE_FLAG_INPUT | GPIO_V2_LINE_FLAG_OUTPUT;

/// Convert line flags into pin flags
pub fn pin_flags(line_flags: u64) -> PinFlags {
    let mut flags = PinFlags::empty();

    let output = is_set(line_flags, GPIO_V2_LINE_FLAG_OUTPUT);

    if output {
        flags |= PinFlags::OUTPUT;

        if is_set(line_flags, GPIO_V2_LINE_FLAG_OPEN_DRAIN) {
            flags |= PinFlags::OPENDRAIN;
        } else if !is_set(line_flags, GPIO_V2_LINE_FLAG_OPEN_SOURCE) {
            flags |= PinFlags::PUSHPULL;
        }
    } else if is_set(line_flags, GPIO_V2_LINE_FLAG_INPUT) {
        flags |= PinFlags::INPUT;
    }

    if is_set(line_flags, GPIO_V2_LINE_FLAG_ACTIVE_LOW) {
        flags |= if output {
            PinFlags::INVOUT
        } else {
            PinFlags::INVIN
        };
    }

    if is_set(line_flags, GPIO_V2_LINE_FLAG_BIAS_PULL_UP) {
        flags |= PinFlags::PULLUP;
    }

    if is_set(line_flags, GPIO_V2_LINE_FLAG_BIAS_PULL_DOWN) {
        flags |= PinFlags::PULLDOWN;
    }

    flags
}

/// Convert pin flags into line flags
///
/// When no direction is given the direction from `current` line flags is kept,
/// because the kernel accepts bias and drive settings only together with direction.
pub fn line_flags(flags: PinFlags, current: u64) -> Result<u64> {
    flags.validate(CHARDEV_CAPS)?;

    let direction = if flags.contains(PinFlags::INPUT) {
        GPIO_V2_LINE_FLAG_INPUT
    } else if flags.contains(PinFlags::OUTPUT) {
        GPIO_V2_LINE_FLAG_OUTPUT
    } else {
        current & DIRECTION_FLAGS
    };

    let mut line_flags = direction;

    if flags.intersects(PinFlags::INVIN | PinFlags::INVOUT) {
        line_flags |= GPIO_V2_LINE_FLAG_ACTIVE_LOW;
    }

    if flags.intersects(PinFlags::OPENDRAIN | PinFlags::PUSHPULL)
        && direction != GPIO_V2_LINE_FLAG_OUTPUT
    {
        // see https://github.com/torvalds/linux/blob/v6.1/drivers/gpio/gpiolib-cdev.c#L916-L919
        return Err(invalid_input("Output drive requires output direction"));
    }

    if flags.contains(PinFlags::OPENDRAIN) {
        line_flags |= GPIO_V2_LINE_FLAG_OPEN_DRAIN;
    }

    if flags.intersects(PinFlags::PULLUP | PinFlags::PULLDOWN) && direction == 0 {
        return Err(invalid_input("Input bias requires direction"));
    }

    if flags.contains(PinFlags::PULLUP) {
        line_flags |= GPIO_V2_LINE_FLAG_BIAS_PULL_UP;
    }

    if flags.contains(PinFlags::PULLDOWN) {
        line_flags |= GPIO_V2_LINE_FLAG_BIAS_PULL_DOWN;
    }

    Ok(line_flags)
}

/// Line flags which drive the line as output while keeping polarity, drive and bias
pub fn output_flags(current: u64) -> u64 {
    (current & GPIO_V2_LINE_CONFIG_FLAGS & !GPIO_V2_LINE_FLAG_INPUT) | GPIO_V2_LINE_FLAG_OUTPUT
}

/// Line flags for a request which leaves the line configuration as-is
pub fn as_is_flags(current: u64) -> u64 {
    current & GPIO_V2_LINE_FLAG_ACTIVE_LOW
}

impl GpioLineInfo {
    pub fn as_config(&self) -> Result<PinConfig> {
        Ok(PinConfig {
            pin: self.offset,
            name: safe_get_str(&self.name)?.into(),
            caps: CHARDEV_CAPS,
            flags: pin_flags(self.flags),
            used: is_set(self.flags, GPIO_V2_LINE_FLAG_USED),
        })
    }
}

impl GpioLineConfig {
    pub fn new(flags: u64, value: Option<PinValue>) -> Self {
        let mut config = GpioLineConfig {
            flags,
            ..Default::default()
        };

        // Output values are valid only for output
        if is_set(flags, GPIO_V2_LINE_FLAG_OUTPUT) {
            if let Some(value) = value {
                config.num_attrs = 1;
                let attr = &mut config.attrs[0];
                attr.attr.id = GPIO_V2_LINE_ATTR_ID_OUTPUT_VALUES;
                attr.mask = 1;
                attr.attr.val.values = bool::from(value) as u64;
            }
        }

        config
    }
}

impl GpioLineRequest {
    pub fn new(pin: PinId, config: GpioLineConfig, consumer: &str) -> Result<Self> {
        let mut request = GpioLineRequest {
            config,
            num_lines: 1,
            ..Default::default()
        };

        request.offsets[0] = pin;

        safe_set_str(&mut request.consumer, consumer)?;

        Ok(request)
    }
}

impl GpioLineValues {
    pub fn single(value: Option<PinValue>) -> Self {
        Self {
            bits: value.map(|value| bool::from(value) as u64).unwrap_or(0),
            mask: 1,
        }
    }

    pub fn as_value(&self) -> PinValue {
        is_set(self.bits, 1).into()
    }
}
