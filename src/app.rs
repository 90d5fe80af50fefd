use std::time::{Duration, Instant};

use color_eyre::eyre::{Result, eyre};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use sysinfo::Signal;
use tracing::{info, warn};

use crate::action::Action;
use crate::config::{Config, parse_key};
use crate::event::{Console, Event};
use crate::system::cpu::CpuCounters;
use crate::system::error::SampleError;
use crate::system::kill::{KillResult, kill_process, parse_kill_target};
use crate::system::meminfo::MemoryStats;
use crate::system::platform::{self, SystemFacts};
use crate::system::process::ProcessList;
use crate::system::procfs::ProcFs;
use crate::system::rates::{CpuUsage, calculate_cpu_usage, calculate_procs_cpu};
use crate::system::sort::{SortMode, sort_procs};
use crate::ui;

const STATUS_TTL: Duration = Duration::from_secs(5);
pub const KILL_PROMPT: &str = "PID to kill: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Sampling,
    Rendering,
    AwaitingInput,
    Terminating,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub kill: KeyCode,
    pub sort_cpu: KeyCode,
    pub sort_memory: KeyCode,
    pub sort_pid: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            kill: parse_key(&kb.kill).unwrap_or(KeyCode::Char('k')),
            sort_cpu: parse_key(&kb.sort_cpu).unwrap_or(KeyCode::Char('P')),
            sort_memory: parse_key(&kb.sort_memory).unwrap_or(KeyCode::Char('M')),
            sort_pid: parse_key(&kb.sort_pid).unwrap_or(KeyCode::Char('N')),
        }
    }

    /// Returns (key_label, description) pairs for the status bar.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.sort_cpu), "CPU"),
            (key_label(self.sort_memory), "Mem"),
            (key_label(self.sort_pid), "PID"),
            (key_label(self.kill), "Kill"),
        ]
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        _ => "?".to_string(),
    }
}

/// The two live process snapshots. Roles swap each cycle; nothing is copied.
#[derive(Debug, Default)]
pub struct Snapshots {
    pub previous: ProcessList,
    pub current: ProcessList,
}

impl Snapshots {
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.current);
    }
}

pub struct App {
    pub running: bool,
    pub phase: Phase,
    pub sort_mode: SortMode,
    pub keybinds: ResolvedKeybinds,
    pub refresh_interval: Duration,
    pub facts: SystemFacts,
    pub memory: MemoryStats,
    pub cpu: CpuUsage,
    pub status_message: Option<(String, Instant)>,
    pub clock_ticks: u64,
    pub page_size: u64,
    pub cores: u32,
    source: ProcFs,
    cpu_counters: CpuCounters,
    snapshots: Snapshots,
    fresh: bool,
}

impl App {
    /// Takes the first readings. Any failure here is fatal: without them
    /// there is no first screen to show.
    pub fn new(config: &Config, source: ProcFs) -> std::result::Result<Self, SampleError> {
        let facts = platform::parse_version().map_err(SampleError::Identity)?;
        let memory = source.read_meminfo()?;
        let cpu_counters = source.read_cpu_counters()?;

        let sort_mode = SortMode::from_str_config(&config.general.default_sort);
        let mut snapshots = Snapshots::default();
        source.scan_processes(&mut snapshots.previous)?;
        sort_procs(&mut snapshots.previous, sort_mode);

        info!(
            release = %facts.release,
            machine = %facts.machine,
            processes = snapshots.previous.len(),
            "initial sample taken"
        );

        Ok(App {
            running: true,
            phase: Phase::Init,
            sort_mode,
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            refresh_interval: Duration::from_millis(config.general.refresh_rate_ms.max(1)),
            facts,
            memory,
            cpu: CpuUsage::default(),
            status_message: None,
            clock_ticks: platform::clock_ticks_per_second(),
            page_size: platform::page_size(),
            cores: platform::online_cores(),
            source,
            cpu_counters,
            snapshots,
            fresh: false,
        })
    }

    /// One sampling cycle. Reader failures keep the previous values and are
    /// surfaced in the status line.
    ///
    /// The CPU counters only advance together with a successful scan, so the
    /// system baseline and the process baseline always come from the same
    /// cycle. If either read fails the previous list stays on screen with its
    /// old rates.
    pub fn sample(&mut self) {
        self.phase = Phase::Sampling;
        self.expire_status();

        let counters = match self.source.read_cpu_counters() {
            Ok(counters) => Some(counters),
            Err(err) => {
                self.report("cpu", &err);
                None
            }
        };

        match self.source.read_meminfo() {
            Ok(memory) => self.memory = memory,
            Err(err) => self.report("meminfo", &err),
        }

        self.fresh = match counters {
            Some(counters) => self.scan_with(counters),
            None => false,
        };
        if !self.fresh {
            sort_procs(&mut self.snapshots.previous, self.sort_mode);
        }

        self.phase = Phase::Rendering;
    }

    /// Scans into the current list and rates it against `counters`. Commits
    /// the new CPU baseline only when the scan succeeded.
    fn scan_with(&mut self, counters: CpuCounters) -> bool {
        self.snapshots.current.clear();
        if let Err(err) = self.source.scan_processes(&mut self.snapshots.current) {
            self.report("process scan", &err);
            return false;
        }

        let usage = calculate_cpu_usage(&self.cpu_counters, &counters);
        calculate_procs_cpu(
            &self.snapshots.previous,
            &mut self.snapshots.current,
            usage.total_delta,
            self.cores,
        );
        sort_procs(&mut self.snapshots.current, self.sort_mode);
        self.cpu = usage;
        self.cpu_counters = counters;
        true
    }

    /// Re-sorts what is on screen for the active mode without sampling.
    pub fn resort(&mut self) {
        match self.phase {
            Phase::Rendering if self.fresh => {
                sort_procs(&mut self.snapshots.current, self.sort_mode);
            }
            _ => sort_procs(&mut self.snapshots.previous, self.sort_mode),
        }
    }

    /// The list the screen shows right now.
    pub fn processes(&self) -> &ProcessList {
        match self.phase {
            Phase::Rendering if self.fresh => &self.snapshots.current,
            _ => &self.snapshots.previous,
        }
    }

    /// Ends the render step: the freshly drawn sample becomes the baseline
    /// for the next cycle.
    pub fn finish_render(&mut self) {
        if self.fresh {
            self.snapshots.swap();
            self.fresh = false;
        }
        self.phase = Phase::AwaitingInput;
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        let code = key.code;
        let kb = &self.keybinds;
        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.kill {
            return Action::PromptKill;
        }
        if code == kb.sort_cpu {
            return Action::SortBy(SortMode::Cpu);
        }
        if code == kb.sort_memory {
            return Action::SortBy(SortMode::Memory);
        }
        if code == kb.sort_pid {
            return Action::SortBy(SortMode::Pid);
        }

        match code {
            KeyCode::Char('c') => Action::SortBy(SortMode::Cpu),
            KeyCode::Char('m') => Action::SortBy(SortMode::Memory),
            KeyCode::Char('p') => Action::SortBy(SortMode::Pid),
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.running = false;
                self.phase = Phase::Terminating;
            }
            Action::SortBy(mode) => {
                self.sort_mode = mode;
                self.resort();
            }
            Action::Kill(pid) => {
                let result = kill_process(pid, Signal::Term);
                self.set_kill_status(result);
            }
            // The prompt needs the console; the loop handles it.
            Action::PromptKill | Action::None => {}
        }
    }

    /// Reads a pid from the operator and signals it if it is a valid target.
    pub fn prompt_kill<C: Console>(&mut self, console: &mut C) -> Result<()> {
        let line = console.read_line(KILL_PROMPT)?;
        match parse_kill_target(&line) {
            Some(pid) => self.dispatch(Action::Kill(pid)),
            None => self.set_status(format!("Not a valid PID: {:?}", line.trim())),
        }
        Ok(())
    }

    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    fn set_kill_status(&mut self, result: KillResult) {
        match &result {
            KillResult::Success(pid, signal) => info!(pid, signal, "signal sent"),
            other => warn!(result = ?other, "kill failed"),
        }
        self.set_status(result.message());
    }

    fn report(&mut self, what: &str, err: &SampleError) {
        warn!(source = what, error = %err, "sample failed, keeping previous values");
        self.set_status(format!("{what}: {err}"));
    }

    fn expire_status(&mut self) {
        if let Some((_, at)) = &self.status_message
            && at.elapsed() >= STATUS_TTL
        {
            self.status_message = None;
        }
    }
}

/// Sampling loop. Shows the Init readings, then samples once per interval.
/// Keys are handled in between: a sort or a kill prompt redraws the current
/// sample and the wait resumes for what is left of the interval, so every
/// sample covers a full interval.
pub fn run<B: Backend, C: Console>(
    terminal: &mut Terminal<B>,
    console: &mut C,
    app: &mut App,
) -> Result<()> {
    draw(terminal, app)?;
    app.finish_render();
    let mut next_sample = Instant::now() + app.refresh_interval;

    while app.running {
        let wait = next_sample.saturating_duration_since(Instant::now());
        match console.poll_event(wait)? {
            Event::Tick => {
                app.sample();
                draw(terminal, app)?;
                app.finish_render();
                next_sample = Instant::now() + app.refresh_interval;
            }
            Event::Resize => draw(terminal, app)?,
            Event::Key(key) => match app.map_key(key) {
                Action::PromptKill => {
                    app.prompt_kill(console)?;
                    terminal
                        .clear()
                        .map_err(|e| eyre!("failed to clear terminal: {e}"))?;
                    draw(terminal, app)?;
                }
                Action::None => {}
                action => {
                    app.dispatch(action);
                    if app.running {
                        draw(terminal, app)?;
                    }
                }
            },
        }
    }
    app.phase = Phase::Terminating;
    Ok(())
}

fn draw<B: Backend>(terminal: &mut Terminal<B>, app: &App) -> Result<()> {
    terminal
        .draw(|frame| ui::draw(frame, app))
        .map_err(|e| eyre!("failed to draw frame: {e}"))?;
    Ok(())
}
