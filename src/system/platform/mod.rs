use std::io;

use serde::Serialize;

use super::bounded;

pub const KERNEL_VER_LEN: usize = 64;
pub const MACHINE_ARCH_LEN: usize = 32;

/// Host facts that the OS reports through a stable identity query.
pub trait PlatformExtensions {
    /// Returns `(kernel release, machine architecture)`.
    fn identity() -> io::Result<(String, String)>;
    fn clock_ticks_per_second() -> u64;
    fn page_size() -> u64;
    fn online_cores() -> u32;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod fallback;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(not(target_os = "linux"))]
use fallback as platform_impl;

/// Kernel release and machine architecture, read once at startup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SystemFacts {
    pub release: String,
    pub machine: String,
}

pub fn parse_version() -> io::Result<SystemFacts> {
    let (release, machine) = platform_impl::Platform::identity()?;
    Ok(SystemFacts {
        release: bounded(release, KERNEL_VER_LEN - 1),
        machine: bounded(machine, MACHINE_ARCH_LEN - 1),
    })
}

pub fn clock_ticks_per_second() -> u64 {
    platform_impl::Platform::clock_ticks_per_second()
}

pub fn page_size() -> u64 {
    platform_impl::Platform::page_size()
}

pub fn online_cores() -> u32 {
    platform_impl::Platform::online_cores()
}
