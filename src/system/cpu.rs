use std::io::BufRead;
use std::path::Path;

use serde::Serialize;

use super::error::{Result, SampleError};
use super::numparse::str_to_num;

/// Cumulative CPU time buckets from the aggregate `cpu` line, in ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CpuCounters {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuCounters {
    /// Idle time, including time spent waiting on I/O.
    pub fn idle_time(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    pub fn busy_time(&self) -> u64 {
        [
            self.user,
            self.nice,
            self.system,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .into_iter()
        .fold(0u64, u64::saturating_add)
    }

    pub fn total(&self) -> u64 {
        self.idle_time().saturating_add(self.busy_time())
    }
}

/// Parses the aggregate line: `cpu` followed by at least 8 counters.
///
/// Counters past the eighth (guest time on newer kernels) are ignored.
pub fn parse_cpu_line(line: &str, path: &Path) -> Result<CpuCounters> {
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some("cpu") => {}
        Some(other) => {
            return Err(SampleError::parse(
                path,
                format!("expected aggregate `cpu` label, found {other:?}"),
            ));
        }
        None => return Err(SampleError::parse(path, "empty cpu line")),
    }

    let mut values = [0u64; 8];
    for (i, slot) in values.iter_mut().enumerate() {
        let token = tokens.next().ok_or_else(|| {
            SampleError::parse(path, format!("expected 9 fields, got {}", i + 1))
        })?;
        *slot = str_to_num::<u64>(token, 10).map_err(|e| SampleError::number(path, e))?;
    }

    let [user, nice, system, idle, iowait, irq, softirq, steal] = values;
    Ok(CpuCounters {
        user,
        nice,
        system,
        idle,
        iowait,
        irq,
        softirq,
        steal,
    })
}

/// Reads only the first line of the CPU accounting source.
pub fn parse_cpu_stat<R: BufRead>(mut reader: R, path: &Path) -> Result<CpuCounters> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| SampleError::io(path, e))?;
    parse_cpu_line(&line, path)
}
