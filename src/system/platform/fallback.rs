use std::io;

use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn identity() -> io::Result<(String, String)> {
        // No procfs-style host; report what the build target knows.
        Ok((
            std::env::consts::OS.to_string(),
            std::env::consts::ARCH.to_string(),
        ))
    }

    fn clock_ticks_per_second() -> u64 {
        100
    }

    fn page_size() -> u64 {
        4096
    }

    fn online_cores() -> u32 {
        std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(1)
    }
}
