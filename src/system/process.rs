use std::path::Path;

use serde::Serialize;

use super::bounded;
use super::error::{Result, SampleError};
use super::numparse::str_to_num;

pub const MAX_CMD_LEN: usize = 256;
pub const DEFAULT_CAPACITY: usize = 512;

/// One process as seen by a single scan.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub ppid: u32,
    pub pgrp: u32,
    pub state: char,
    pub command: String,
    /// Cumulative user-mode ticks.
    pub utime: u64,
    /// Cumulative kernel-mode ticks.
    pub stime: u64,
    /// Virtual size in bytes.
    pub vsize: u64,
    /// Resident set size in pages.
    pub rss: u64,
    pub cpu_percent: f64,
}

impl ProcessRecord {
    pub fn total_ticks(&self) -> u64 {
        self.utime.saturating_add(self.stime)
    }
}

/// Growable process snapshot that doubles its capacity when full.
#[derive(Clone, Debug)]
pub struct ProcessList {
    procs: Vec<ProcessRecord>,
    capacity: usize,
    growths: usize,
}

impl Default for ProcessList {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ProcessList {
    /// A zero hint selects [`DEFAULT_CAPACITY`].
    pub fn with_capacity(hint: usize) -> Self {
        let capacity = if hint == 0 { DEFAULT_CAPACITY } else { hint };
        Self {
            procs: Vec::with_capacity(capacity),
            capacity,
            growths: 0,
        }
    }

    pub fn push(&mut self, record: ProcessRecord) {
        if self.procs.len() == self.capacity {
            self.procs.reserve_exact(self.capacity);
            self.capacity *= 2;
            self.growths += 1;
        }
        self.procs.push(record);
    }

    /// Drops all records but keeps the allocation for the next scan.
    pub fn clear(&mut self) {
        self.procs.clear();
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of times the list has doubled since it was created.
    pub fn growths(&self) -> usize {
        self.growths
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessRecord> {
        self.procs.iter()
    }

    pub fn as_slice(&self) -> &[ProcessRecord] {
        &self.procs
    }

    pub fn as_mut_slice(&mut self) -> &mut [ProcessRecord] {
        &mut self.procs
    }

    pub fn get(&self, pid: u32) -> Option<&ProcessRecord> {
        self.procs.iter().find(|p| p.pid == pid)
    }
}

impl FromIterator<ProcessRecord> for ProcessList {
    fn from_iter<I: IntoIterator<Item = ProcessRecord>>(iter: I) -> Self {
        let mut list = ProcessList::default();
        for record in iter {
            list.push(record);
        }
        list
    }
}

impl<'a> IntoIterator for &'a ProcessList {
    type Item = &'a ProcessRecord;
    type IntoIter = std::slice::Iter<'a, ProcessRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.procs.iter()
    }
}

/// Turns a NUL-separated argument vector into one display string.
///
/// Returns `None` when nothing printable is left, so the caller can fall
/// back to the short name.
pub fn clean_cmdline(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw).replace('\0', " ");
    let trimmed = text.trim_end_matches(' ');
    if trimmed.is_empty() {
        None
    } else {
        Some(bounded(trimmed.to_string(), MAX_CMD_LEN - 1))
    }
}

/// Short process name: a single line with its trailing newline stripped.
pub fn clean_comm(raw: &str) -> Option<String> {
    let name = raw.lines().next().unwrap_or("");
    if name.is_empty() {
        None
    } else {
        Some(bounded(name.to_string(), MAX_CMD_LEN - 1))
    }
}

// 1-based field positions in the per-process stat line.
const FIELD_STATE: usize = 3;
const FIELD_PPID: usize = 4;
const FIELD_PGRP: usize = 5;
const FIELD_UTIME: usize = 14;
const FIELD_STIME: usize = 15;
const FIELD_VSIZE: usize = 23;
const FIELD_RSS: usize = 24;

/// Fills the stat-derived fields of `record` from one stat line.
///
/// The command name (field 2) may itself contain spaces and parentheses, so
/// the remainder starts after the last `)`. Fields missing from a short line
/// keep their current values.
pub fn parse_stat_line(line: &str, record: &mut ProcessRecord, path: &Path) -> Result<()> {
    let close = line
        .rfind(')')
        .ok_or_else(|| SampleError::parse(path, "no closing parenthesis"))?;
    if !line[..close].contains('(') {
        return Err(SampleError::parse(path, "no opening parenthesis"));
    }

    let fields: Vec<&str> = line[close + 1..].split_whitespace().collect();
    // fields[0] is field 3.
    let field = |pos: usize| fields.get(pos - FIELD_STATE).copied();
    let number = |pos: usize| -> Result<Option<u64>> {
        field(pos)
            .map(|tok| str_to_num::<u64>(tok, 10).map_err(|e| SampleError::number(path, e)))
            .transpose()
    };
    let small = |pos: usize| -> Result<Option<u32>> {
        field(pos)
            .map(|tok| str_to_num::<u32>(tok, 10).map_err(|e| SampleError::number(path, e)))
            .transpose()
    };

    if let Some(state) = field(FIELD_STATE).and_then(|s| s.chars().next()) {
        record.state = state;
    }
    if let Some(v) = small(FIELD_PPID)? {
        record.ppid = v;
    }
    if let Some(v) = small(FIELD_PGRP)? {
        record.pgrp = v;
    }
    if let Some(v) = number(FIELD_UTIME)? {
        record.utime = v;
    }
    if let Some(v) = number(FIELD_STIME)? {
        record.stime = v;
    }
    if let Some(v) = number(FIELD_VSIZE)? {
        record.vsize = v;
    }
    if let Some(v) = number(FIELD_RSS)? {
        record.rss = v;
    }
    Ok(())
}
