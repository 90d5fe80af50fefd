use std::cmp::Ordering;

use serde::Serialize;

use super::process::{ProcessList, ProcessRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortMode {
    #[default]
    Cpu,
    Memory,
    Pid,
}

impl SortMode {
    pub fn label(self) -> &'static str {
        match self {
            SortMode::Cpu => "CPU",
            SortMode::Memory => "Memory",
            SortMode::Pid => "PID",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "mem" | "memory" | "rss" => SortMode::Memory,
            "pid" => SortMode::Pid,
            _ => SortMode::Cpu,
        }
    }

    /// Total order for this mode; ties always fall back to ascending pid.
    pub fn compare(self, a: &ProcessRecord, b: &ProcessRecord) -> Ordering {
        let primary = match self {
            SortMode::Cpu => b.cpu_percent.total_cmp(&a.cpu_percent),
            SortMode::Memory => b.rss.cmp(&a.rss),
            SortMode::Pid => Ordering::Equal,
        };
        primary.then_with(|| a.pid.cmp(&b.pid))
    }
}

pub fn sort_procs(list: &mut ProcessList, mode: SortMode) {
    list.as_mut_slice().sort_by(|a, b| mode.compare(a, b));
}
