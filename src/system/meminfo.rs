use std::io::BufRead;
use std::path::Path;

use serde::Serialize;

use super::error::{Result, SampleError};
use super::numparse::str_to_num;

/// Instantaneous memory counters in kB, replaced wholesale every cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MemoryStats {
    pub total: u64,
    pub free: u64,
    pub buffers: u64,
    pub cached: u64,
    pub available: u64,
    /// `total - free - buffers - cached`; negative when the kernel's
    /// counters disagree with each other.
    pub used: i64,
    pub used_percent: f64,
}

const MEM_TOTAL: u32 = 1 << 0;
const MEM_FREE: u32 = 1 << 1;
const MEM_AVAILABLE: u32 = 1 << 2;
const BUFFERS: u32 = 1 << 3;
const CACHED: u32 = 1 << 4;
const ALL_FIELDS: u32 = MEM_TOTAL | MEM_FREE | MEM_AVAILABLE | BUFFERS | CACHED;

const FIELDS: [(&str, u32); 5] = [
    ("MemTotal", MEM_TOTAL),
    ("MemFree", MEM_FREE),
    ("MemAvailable", MEM_AVAILABLE),
    ("Buffers", BUFFERS),
    ("Cached", CACHED),
];

impl MemoryStats {
    fn slot(&mut self, bit: u32) -> &mut u64 {
        match bit {
            MEM_TOTAL => &mut self.total,
            MEM_FREE => &mut self.free,
            MEM_AVAILABLE => &mut self.available,
            BUFFERS => &mut self.buffers,
            _ => &mut self.cached,
        }
    }

    /// Recomputes `used` and `used_percent` from the raw counters.
    pub fn derive_usage(&mut self) {
        let consumed = self.free as i128 + self.buffers as i128 + self.cached as i128;
        let used = self.total as i128 - consumed;
        self.used = used.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
        self.used_percent = if self.total == 0 {
            0.0
        } else {
            self.used as f64 / self.total as f64 * 100.0
        };
    }
}

/// Parses `Key: value kB` lines, capturing each target key once.
///
/// Scanning stops as soon as every target key has been seen. A missing key
/// leaves its field at zero; a present key with a non-numeric value is an
/// error. `path` only labels errors.
pub fn parse_meminfo<R: BufRead>(reader: R, path: &Path) -> Result<MemoryStats> {
    let mut stats = MemoryStats::default();
    let mut found = 0u32;

    for line in reader.lines() {
        let line = line.map_err(|e| SampleError::io(path, e))?;
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim_start();

        let Some(&(_, bit)) = FIELDS.iter().find(|(name, _)| *name == key) else {
            continue;
        };
        if found & bit != 0 {
            continue;
        }

        let value = rest.split_whitespace().next().unwrap_or("");
        *stats.slot(bit) = str_to_num::<u64>(value, 10).map_err(|e| SampleError::number(path, e))?;
        found |= bit;

        if found == ALL_FIELDS {
            break;
        }
    }

    stats.derive_usage();
    Ok(stats)
}
