#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

pub const MEMINFO: &str = "MemTotal:        1000 kB\n\
MemFree:          200 kB\n\
MemAvailable:     600 kB\n\
Buffers:           50 kB\n\
Cached:           150 kB\n\
SwapCached:         0 kB\n";

/// One process directory's worth of fixture data.
pub struct FakeProcess<'a> {
    pub pid: u32,
    pub cmdline: &'a [u8],
    pub comm: &'a str,
    pub state: char,
    pub ppid: u32,
    pub utime: u64,
    pub stime: u64,
    pub vsize: u64,
    pub rss: u64,
}

impl Default for FakeProcess<'_> {
    fn default() -> Self {
        FakeProcess {
            pid: 1,
            cmdline: b"",
            comm: "init",
            state: 'S',
            ppid: 0,
            utime: 0,
            stime: 0,
            vsize: 0,
            rss: 0,
        }
    }
}

pub fn stat_line(p: &FakeProcess<'_>) -> String {
    format!(
        "{pid} ({comm}) {state} {ppid} {pid} {pid} 34816 {pid} 4194560 1200 0 0 0 {utime} {stime} 0 0 20 0 1 0 5000 {vsize} {rss} 18446744073709551615 1 1 0 0 0 0 0 0 0 0 0 0 17 3 0 0\n",
        pid = p.pid,
        comm = p.comm,
        state = p.state,
        ppid = p.ppid,
        utime = p.utime,
        stime = p.stime,
        vsize = p.vsize,
        rss = p.rss,
    )
}

/// A throwaway procfs tree.
pub struct FakeProc {
    dir: TempDir,
}

impl FakeProc {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeProc { dir };
        fake.set_cpu(1000, 9000);
        fake.write("meminfo", MEMINFO.as_bytes());
        fake
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, contents: &[u8]) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    pub fn remove(&self, rel: &str) {
        let path = self.dir.path().join(rel);
        if path.is_dir() {
            fs::remove_dir_all(path).unwrap();
        } else {
            fs::remove_file(path).unwrap();
        }
    }

    /// Aggregate line with everything busy in `user`.
    pub fn set_cpu(&self, busy: u64, idle: u64) {
        let stat = format!(
            "cpu  {busy} 0 0 {idle} 0 0 0 0 0 0\ncpu0 {busy} 0 0 {idle} 0 0 0 0 0 0\nintr 0\nctxt 0\n"
        );
        self.write("stat", stat.as_bytes());
    }

    pub fn add_process(&self, p: FakeProcess<'_>) {
        let dir = p.pid.to_string();
        self.write(&format!("{dir}/cmdline"), p.cmdline);
        self.write(&format!("{dir}/comm"), format!("{}\n", p.comm).as_bytes());
        self.write(&format!("{dir}/stat"), stat_line(&p).as_bytes());
    }
}
