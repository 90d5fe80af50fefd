use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System};

use super::numparse::str_to_num;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillResult {
    Success(u32, &'static str),
    Failed(u32, String),
    NotFound(u32),
    Rejected(String),
}

/// Largest value that is still a single positive `pid_t`.
const MAX_PID: i64 = i32::MAX as i64;

/// Parses operator input into a pid that is safe to signal.
///
/// Only strictly positive values in `pid_t` range pass, so a typo can never
/// turn into pid 0 or a negative (process group) target.
pub fn parse_kill_target(input: &str) -> Option<u32> {
    match str_to_num::<i64>(input, 10) {
        Ok(pid) if (1..=MAX_PID).contains(&pid) => Some(pid as u32),
        _ => None,
    }
}

pub fn kill_process(pid: u32, signal: Signal) -> KillResult {
    if pid == 0 || i64::from(pid) > MAX_PID {
        return KillResult::Rejected(format!("Refusing to signal PID {pid}"));
    }

    let target = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[target]),
        true,
        ProcessRefreshKind::nothing(),
    );

    match sys.process(target) {
        Some(process) => {
            let signal_name = match signal {
                Signal::Term => "SIGTERM",
                Signal::Kill => "SIGKILL",
                _ => "signal",
            };
            match process.kill_with(signal) {
                Some(true) => KillResult::Success(pid, signal_name),
                Some(false) => {
                    KillResult::Failed(pid, format!("Failed to send {signal_name} to PID {pid}"))
                }
                None => {
                    // Signal not supported on this platform, fall back to kill()
                    if process.kill() {
                        KillResult::Success(pid, signal_name)
                    } else {
                        KillResult::Failed(
                            pid,
                            format!("Failed to kill PID {pid} (permission denied?)"),
                        )
                    }
                }
            }
        }
        None => KillResult::NotFound(pid),
    }
}

impl KillResult {
    pub fn message(&self) -> String {
        match self {
            KillResult::Success(pid, signal) => format!("Sent {signal} to PID {pid}"),
            KillResult::Failed(_, err) => err.clone(),
            KillResult::NotFound(pid) => format!("Process {pid} not found"),
            KillResult::Rejected(reason) => reason.clone(),
        }
    }
}
