use std::ffi::CStr;
use std::io;

use super::PlatformExtensions;

pub struct Platform;

const FALLBACK_HZ: u64 = 100;
const FALLBACK_PAGE_SIZE: u64 = 4096;

fn sysconf(name: libc::c_int) -> Option<u64> {
    // SAFETY: sysconf only reads a configuration value.
    let value = unsafe { libc::sysconf(name) };
    (value > 0).then_some(value as u64)
}

impl PlatformExtensions for Platform {
    fn identity() -> io::Result<(String, String)> {
        // SAFETY: utsname is plain data; uname either fills every field with
        // a NUL-terminated string or fails without touching it.
        let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
        if unsafe { libc::uname(&mut uts) } == -1 {
            return Err(io::Error::last_os_error());
        }
        let release = unsafe { CStr::from_ptr(uts.release.as_ptr()) }
            .to_string_lossy()
            .into_owned();
        let machine = unsafe { CStr::from_ptr(uts.machine.as_ptr()) }
            .to_string_lossy()
            .into_owned();
        Ok((release, machine))
    }

    fn clock_ticks_per_second() -> u64 {
        sysconf(libc::_SC_CLK_TCK).unwrap_or(FALLBACK_HZ)
    }

    fn page_size() -> u64 {
        sysconf(libc::_SC_PAGESIZE).unwrap_or(FALLBACK_PAGE_SIZE)
    }

    fn online_cores() -> u32 {
        sysconf(libc::_SC_NPROCESSORS_ONLN)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(1)
    }
}
