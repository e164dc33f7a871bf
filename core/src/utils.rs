use crate::{Error, Result};
use std::{io, str};

pub use nix::sys::stat::{major, minor};

#[inline(always)]
pub fn is_set<T>(flags: T, flag: T) -> bool
where
    T: core::ops::BitAnd<Output = T> + Eq + Copy,
{
    flags & flag == flag
}

#[inline(always)]
pub fn invalid_input(msg: &'static str) -> Error {
    Error::new(io::ErrorKind::InvalidInput, msg)
}

#[inline(always)]
pub fn invalid_data(msg: &'static str) -> Error {
    Error::new(io::ErrorKind::InvalidData, msg)
}

#[inline(always)]
pub fn unsupported(msg: &'static str) -> Error {
    Error::new(io::ErrorKind::Unsupported, msg)
}

/// Copy string into fixed-size buffer keeping room for the terminating NUL
pub fn safe_set_str<const N: usize>(dst: &mut [u8; N], src: &str) -> Result<()> {
    let src = src.as_bytes();
    if src.len() >= N {
        return Err(invalid_input("String too long"));
    }

    dst[..src.len()].copy_from_slice(src);
    dst[src.len()] = 0;

    Ok(())
}

/// Get string from NUL-terminated buffer
#[inline(always)]
pub fn safe_get_str(src: &[u8]) -> Result<&str> {
    let len = src.iter().position(|c| *c == 0).unwrap_or(src.len());
    str::from_utf8(&src[..len]).map_err(|_| invalid_data("Invalid UTF-8"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nul_terminated_strings() {
        let mut buf = [0xffu8; 8];
        safe_set_str(&mut buf, "gpio").unwrap();
        assert_eq!(safe_get_str(&buf).unwrap(), "gpio");

        assert!(safe_set_str(&mut buf, "12345678").is_err());
        safe_set_str(&mut buf, "1234567").unwrap();
        assert_eq!(safe_get_str(&buf).unwrap(), "1234567");

        assert_eq!(safe_get_str(b"full").unwrap(), "full");
        assert!(safe_get_str(&[0xc3, 0x28, 0]).is_err());
    }

    #[test]
    fn device_numbers() {
        let dev = nix::sys::stat::makedev(254, 3);
        assert_eq!(major(dev), 254);
        assert_eq!(minor(dev), 3);

        // /dev/null is 1:3 on every Linux system
        let null = std::fs::metadata("/dev/null").unwrap();
        assert_eq!(major(std::os::unix::fs::MetadataExt::rdev(&null)), 1);
        assert_eq!(minor(std::os::unix::fs::MetadataExt::rdev(&null)), 3);
    }
}
