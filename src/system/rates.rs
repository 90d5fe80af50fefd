use std::collections::HashMap;

use super::cpu::CpuCounters;
use super::process::ProcessList;

/// System-wide CPU utilisation between two samples.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CpuUsage {
    /// Busy share of elapsed ticks, in `[0, 100]`.
    pub percent: f64,
    /// Elapsed ticks across all buckets; the denominator for per-process
    /// rates in the same cycle.
    pub total_delta: u64,
}

/// Busy percentage between `prev` and `curr`.
///
/// A counter that went backwards (reset) contributes a zero delta instead of
/// underflowing. No elapsed ticks means no measurable usage.
pub fn calculate_cpu_usage(prev: &CpuCounters, curr: &CpuCounters) -> CpuUsage {
    let total_delta = curr.total().saturating_sub(prev.total());
    let idle_delta = curr.idle_time().saturating_sub(prev.idle_time());

    if total_delta == 0 {
        return CpuUsage {
            percent: 0.0,
            total_delta,
        };
    }

    let busy = total_delta.saturating_sub(idle_delta);
    CpuUsage {
        percent: (busy as f64 / total_delta as f64 * 100.0).clamp(0.0, 100.0),
        total_delta,
    }
}

/// Fills `cpu_percent` for every record in `curr` from its tick delta
/// against the same pid in `prev`.
///
/// Pids new in `curr` get `0.0`. The result is scaled by `cores`, so a
/// multi-threaded process can exceed 100. Does nothing when `total_delta`
/// is zero.
pub fn calculate_procs_cpu(prev: &ProcessList, curr: &mut ProcessList, total_delta: u64, cores: u32) {
    if total_delta == 0 {
        return;
    }

    let previous: HashMap<u32, u64> = prev.iter().map(|p| (p.pid, p.total_ticks())).collect();
    let scale = 100.0 * f64::from(cores.max(1)) / total_delta as f64;

    for record in curr.as_mut_slice() {
        record.cpu_percent = match previous.get(&record.pid) {
            Some(&before) => record.total_ticks().saturating_sub(before) as f64 * scale,
            None => 0.0,
        };
    }
}
