use std::fmt::Write as _;

use serde::Serialize;

use crate::app::App;
use crate::format::kib_to_gib;
use crate::system::meminfo::MemoryStats;
use crate::system::platform::SystemFacts;
use crate::system::process::ProcessRecord;
use crate::system::sort::SortMode;
use crate::ui::table::{MAX_COMMAND_WIDTH, RowUnits, format_row, header_row};

/// One finished sample, printed instead of running the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub facts: SystemFacts,
    pub memory: MemoryStats,
    pub cpu_percent: f64,
    pub sort: SortMode,
    pub clock_ticks: u64,
    pub page_size: u64,
    pub processes: Vec<ProcessRecord>,
}

impl Report {
    /// Takes the top `limit` processes from what the app currently shows.
    pub fn from_app(app: &App, limit: usize) -> Self {
        Report {
            facts: app.facts.clone(),
            memory: app.memory,
            cpu_percent: app.cpu.percent,
            sort: app.sort_mode,
            clock_ticks: app.clock_ticks,
            page_size: app.page_size,
            processes: app.processes().iter().take(limit).cloned().collect(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Kernel : {}", self.facts.release);
        let _ = writeln!(out, "Machine: {}", self.facts.machine);
        let _ = writeln!(
            out,
            "Memory : {:.2} GB / {:.2} GB ({:.1}%)",
            kib_to_gib(self.memory.used as f64),
            kib_to_gib(self.memory.total as f64),
            self.memory.used_percent
        );
        let _ = writeln!(out, "CPU    : {:.1}%", self.cpu_percent);
        let _ = write!(out, "{}", header_row(MAX_COMMAND_WIDTH).trim_end());

        let units = RowUnits {
            page_size: self.page_size,
            clock_ticks: self.clock_ticks,
        };
        for record in &self.processes {
            let _ = write!(out, "\n{}", format_row(record, MAX_COMMAND_WIDTH, units));
        }
        out
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
