//! Linux GPIO character device ABI (uAPI v2)
//!
//! Layouts follow `include/uapi/linux/gpio.h`.

#![allow(dead_code)]

use std::mem::zeroed;

pub const GPIO_MAX_NAME_SIZE: usize = 32;
pub const GPIO_V2_LINES_MAX: usize = 64;
pub const GPIO_V2_LINE_NUM_ATTRS_MAX: usize = 10;

pub const GPIO_V2_LINE_FLAG_USED: u64 = 1 << 0;
pub const GPIO_V2_LINE_FLAG_ACTIVE_LOW: u64 = 1 << 1;
pub const GPIO_V2_LINE_FLAG_INPUT: u64 = 1 << 2;
pub const GPIO_V2_LINE_FLAG_OUTPUT: u64 = 1 << 3;
pub const GPIO_V2_LINE_FLAG_EDGE_RISING: u64 = 1 << 4;
pub const GPIO_V2_LINE_FLAG_EDGE_FALLING: u64 = 1 << 5;
pub const GPIO_V2_LINE_FLAG_OPEN_DRAIN: u64 = 1 << 6;
pub const GPIO_V2_LINE_FLAG_OPEN_SOURCE: u64 = 1 << 7;
pub const GPIO_V2_LINE_FLAG_BIAS_PULL_UP: u64 = 1 << 8;
pub const GPIO_V2_LINE_FLAG_BIAS_PULL_DOWN: u64 = 1 << 9;
pub const GPIO_V2_LINE_FLAG_BIAS_DISABLED: u64 = 1 << 10;

/// Flags which describe line configuration (as opposed to usage or events)
pub const GPIO_V2_LINE_CONFIG_FLAGS: u64 = GPIO_V2_LINE_FLAG_ACTIVE_LOW
    | GPIO_V2_LINE_FLAG_INPUT
    | GPIO_V2_LINE_FLAG_OUTPUT
    | GPIO_V2_LINE_FLAG_OPEN_DRAIN
    | GPIO_V2_LINE_FLAG_OPEN_SOURCE
    | GPIO_V2_LINE_FLAG_BIAS_PULL_UP
    | GPIO_V2_LINE_FLAG_BIAS_PULL_DOWN
    | GPIO_V2_LINE_FLAG_BIAS_DISABLED;

pub const GPIO_V2_LINE_ATTR_ID_FLAGS: u32 = 1;
pub const GPIO_V2_LINE_ATTR_ID_OUTPUT_VALUES: u32 = 2;
pub const GPIO_V2_LINE_ATTR_ID_DEBOUNCE: u32 = 3;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GpioChipInfo {
    pub name: [u8; GPIO_MAX_NAME_SIZE],
    pub label: [u8; GPIO_MAX_NAME_SIZE],
    pub lines: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct GpioLineValues {
    pub bits: u64,
    pub mask: u64,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub union GpioLineAttrValue {
    pub flags: u64,
    pub values: u64,
    pub debounce_period_us: u32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct GpioLineAttribute {
    pub id: u32,
    pub padding: u32,
    pub val: GpioLineAttrValue,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct GpioLineConfigAttribute {
    pub attr: GpioLineAttribute,
    pub mask: u64,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct GpioLineConfig {
    pub flags: u64,
    pub num_attrs: u32,
    pub padding: [u32; 5],
    pub attrs: [GpioLineConfigAttribute; GPIO_V2_LINE_NUM_ATTRS_MAX],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct GpioLineRequest {
    pub offsets: [u32; GPIO_V2_LINES_MAX],
    pub consumer: [u8; GPIO_MAX_NAME_SIZE],
    pub config: GpioLineConfig,
    pub num_lines: u32,
    pub event_buffer_size: u32,
    pub padding: [u32; 5],
    pub fd: i32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct GpioLineInfo {
    pub name: [u8; GPIO_MAX_NAME_SIZE],
    pub consumer: [u8; GPIO_MAX_NAME_SIZE],
    pub offset: u32,
    pub num_attrs: u32,
    pub flags: u64,
    pub attrs: [GpioLineAttribute; GPIO_V2_LINE_NUM_ATTRS_MAX],
    pub padding: [u32; 4],
}

macro_rules! zeroed_default {
    ($($type:ty,)*) => {
        $(
            impl Default for $type {
                fn default() -> Self {
                    // all-zero is a valid value for these plain C structs
                    unsafe { zeroed() }
                }
            }
        )*
    };
}

zeroed_default! {
    GpioChipInfo,
    GpioLineConfig,
    GpioLineRequest,
    GpioLineInfo,
}

const GPIO_IOC_MAGIC: u8 = 0xB4;

nix::ioctl_read!(gpio_get_chip_info, GPIO_IOC_MAGIC, 0x01, GpioChipInfo);
nix::ioctl_readwrite!(gpio_get_line_info, GPIO_IOC_MAGIC, 0x05, GpioLineInfo);
nix::ioctl_readwrite!(gpio_get_line, GPIO_IOC_MAGIC, 0x07, GpioLineRequest);
nix::ioctl_readwrite!(gpio_line_set_config, GPIO_IOC_MAGIC, 0x0D, GpioLineConfig);
nix::ioctl_readwrite!(gpio_line_get_values, GPIO_IOC_MAGIC, 0x0E, GpioLineValues);
nix::ioctl_readwrite!(gpio_line_set_values, GPIO_IOC_MAGIC, 0x0F, GpioLineValues);
