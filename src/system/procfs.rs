use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::cpu::{CpuCounters, parse_cpu_stat};
use super::error::{Result, SampleError};
use super::meminfo::{MemoryStats, parse_meminfo};
use super::numparse::{is_numeric_name, str_to_num};
use super::process::{ProcessList, ProcessRecord, clean_cmdline, clean_comm, parse_stat_line};

pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Handle on a procfs mount. Tests point it at a fixture tree.
#[derive(Clone, Debug)]
pub struct ProcFs {
    root: PathBuf,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

/// Outcome of reading one per-process source.
enum Source<T> {
    Present(T),
    Vanished,
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn read_meminfo(&self) -> Result<MemoryStats> {
        let path = self.root.join("meminfo");
        let file = File::open(&path).map_err(|e| SampleError::io(&path, e))?;
        parse_meminfo(BufReader::new(file), &path)
    }

    pub fn read_cpu_counters(&self) -> Result<CpuCounters> {
        let path = self.root.join("stat");
        let file = File::open(&path).map_err(|e| SampleError::io(&path, e))?;
        parse_cpu_stat(BufReader::new(file), &path)
    }

    /// Appends every live process to `list`.
    ///
    /// A process that disappears between the directory listing and its reads
    /// is skipped. Any other failure aborts the scan, leaving `list` partly
    /// filled.
    pub fn scan_processes(&self, list: &mut ProcessList) -> Result<()> {
        let entries = fs::read_dir(&self.root).map_err(|e| SampleError::io(&self.root, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| SampleError::io(&self.root, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !is_numeric_name(name) {
                continue;
            }

            match self.read_process(name)? {
                Source::Present(record) => list.push(record),
                Source::Vanished => debug!(pid = name, "process exited mid-scan, skipped"),
            }
        }

        trace!(count = list.len(), capacity = list.capacity(), "scan complete");
        Ok(())
    }

    fn read_process(&self, name: &str) -> Result<Source<ProcessRecord>> {
        let dir = self.root.join(name);

        let cmdline_path = dir.join("cmdline");
        let raw = match fs::read(&cmdline_path) {
            Ok(raw) => raw,
            Err(e) => return vanished_or(SampleError::io(&cmdline_path, e)),
        };
        let command = match clean_cmdline(&raw) {
            Some(command) => command,
            None => {
                let comm_path = dir.join("comm");
                match fs::read(&comm_path) {
                    Ok(raw) => clean_comm(&String::from_utf8_lossy(&raw)).unwrap_or_default(),
                    Err(e) => return vanished_or(SampleError::io(&comm_path, e)),
                }
            }
        };

        let pid = str_to_num::<u32>(name, 10).map_err(|e| SampleError::number(&dir, e))?;
        let mut record = ProcessRecord {
            pid,
            command,
            ..Default::default()
        };

        let stat_path = dir.join("stat");
        let raw = match fs::read(&stat_path) {
            Ok(raw) => raw,
            Err(e) => return vanished_or(SampleError::io(&stat_path, e)),
        };
        parse_stat_line(&String::from_utf8_lossy(&raw), &mut record, &stat_path)?;

        Ok(Source::Present(record))
    }
}

fn vanished_or<T>(err: SampleError) -> Result<Source<T>> {
    if err.is_not_found() {
        Ok(Source::Vanished)
    } else {
        Err(err)
    }
}
