mod common;

use common::{FakeProc, FakeProcess};
use proctop::system::error::SampleError;
use proctop::system::process::ProcessList;
use proctop::system::procfs::ProcFs;

fn scan(fake: &FakeProc) -> Result<ProcessList, SampleError> {
    let mut list = ProcessList::default();
    ProcFs::new(fake.path()).scan_processes(&mut list)?;
    Ok(list)
}

fn pids(list: &ProcessList) -> Vec<u32> {
    let mut pids: Vec<u32> = list.iter().map(|p| p.pid).collect();
    pids.sort_unstable();
    pids
}

#[test]
fn only_numeric_entries_are_processes() {
    let fake = FakeProc::new();
    fake.add_process(FakeProcess {
        pid: 1,
        ..Default::default()
    });
    fake.add_process(FakeProcess {
        pid: 42,
        comm: "worker",
        ..Default::default()
    });
    fake.write("self/stat", b"not a process dir\n");
    fake.write("net/dev", b"");
    fake.write("12a/stat", b"garbage\n");
    fake.write("sys", b"");

    let list = scan(&fake).unwrap();
    assert_eq!(pids(&list), vec![1, 42]);
}

#[test]
fn stat_fields_land_in_record() {
    let fake = FakeProc::new();
    fake.add_process(FakeProcess {
        pid: 1234,
        cmdline: b"/usr/bin/stress\0--cpu\04\0",
        comm: "stress",
        state: 'R',
        ppid: 1,
        utime: 300,
        stime: 100,
        vsize: 104_857_600,
        rss: 2560,
    });

    let list = scan(&fake).unwrap();
    let rec = list.get(1234).unwrap();
    assert_eq!(rec.command, "/usr/bin/stress --cpu 4");
    assert_eq!(rec.state, 'R');
    assert_eq!(rec.ppid, 1);
    assert_eq!(rec.pgrp, 1234);
    assert_eq!(rec.utime, 300);
    assert_eq!(rec.stime, 100);
    assert_eq!(rec.vsize, 104_857_600);
    assert_eq!(rec.rss, 2560);
    assert_eq!(rec.cpu_percent, 0.0);
}

#[test]
fn name_with_spaces_and_parens_parses() {
    let fake = FakeProc::new();
    fake.add_process(FakeProcess {
        pid: 77,
        cmdline: b"tmux\0",
        comm: "tmux: (server) x",
        state: 'S',
        ppid: 5,
        utime: 11,
        stime: 22,
        vsize: 4096,
        rss: 3,
    });

    let list = scan(&fake).unwrap();
    let rec = list.get(77).unwrap();
    assert_eq!(rec.ppid, 5);
    assert_eq!(rec.utime, 11);
    assert_eq!(rec.rss, 3);
}

#[test]
fn kernel_thread_falls_back_to_comm() {
    let fake = FakeProc::new();
    fake.add_process(FakeProcess {
        pid: 2,
        cmdline: b"",
        comm: "kthreadd",
        ..Default::default()
    });

    let list = scan(&fake).unwrap();
    assert_eq!(list.get(2).unwrap().command, "kthreadd");
}

#[test]
fn vanished_process_is_skipped() {
    let fake = FakeProc::new();
    fake.add_process(FakeProcess {
        pid: 10,
        cmdline: b"/bin/alive\0",
        ..Default::default()
    });
    // Exited between the directory listing and the stat read.
    fake.add_process(FakeProcess {
        pid: 11,
        cmdline: b"/bin/gone\0",
        ..Default::default()
    });
    fake.remove("11/stat");
    // Exited before anything was read.
    std::fs::create_dir_all(fake.path().join("12")).unwrap();

    let list = scan(&fake).unwrap();
    assert_eq!(pids(&list), vec![10]);
}

#[test]
fn malformed_stat_aborts_scan() {
    let fake = FakeProc::new();
    fake.add_process(FakeProcess {
        pid: 10,
        ..Default::default()
    });
    fake.write("10/stat", b"10 no-parens S 1 1\n");

    let err = scan(&fake).unwrap_err();
    assert!(matches!(err, SampleError::Parse { .. }));
    assert!(!err.is_not_found());
}

#[test]
fn unreadable_cmdline_aborts_scan() {
    let fake = FakeProc::new();
    fake.add_process(FakeProcess {
        pid: 10,
        ..Default::default()
    });
    fake.add_process(FakeProcess {
        pid: 11,
        cmdline: b"/bin/sh\0",
        ..Default::default()
    });
    // Reading a directory fails with EISDIR, which is not a vanished process.
    fake.remove("11/cmdline");
    std::fs::create_dir(fake.path().join("11/cmdline")).unwrap();

    let err = scan(&fake).unwrap_err();
    assert!(matches!(err, SampleError::Io { .. }), "{err:?}");
    assert!(!err.is_not_found());
    assert!(err.to_string().contains("11/cmdline"), "{err}");
}

#[test]
fn missing_proc_root_is_not_found() {
    let fake = FakeProc::new();
    let mut list = ProcessList::default();
    let err = ProcFs::new(fake.path().join("nope"))
        .scan_processes(&mut list)
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn list_grows_by_doubling_during_scan() {
    let fake = FakeProc::new();
    for pid in 1..=10 {
        fake.add_process(FakeProcess {
            pid,
            utime: u64::from(pid),
            ..Default::default()
        });
    }

    let mut list = ProcessList::with_capacity(4);
    ProcFs::new(fake.path()).scan_processes(&mut list).unwrap();

    assert_eq!(list.len(), 10);
    assert_eq!(list.capacity(), 16);
    assert_eq!(list.growths(), 2);
    for pid in 1..=10 {
        assert_eq!(list.get(pid).unwrap().utime, u64::from(pid));
    }
}

#[test]
fn meminfo_and_cpu_readers() {
    let fake = FakeProc::new();
    let procfs = ProcFs::new(fake.path());

    let mem = procfs.read_meminfo().unwrap();
    assert_eq!(mem.total, 1000);
    assert_eq!(mem.used, 600);
    assert!((mem.used_percent - 60.0).abs() < 1e-9);

    let cpu = procfs.read_cpu_counters().unwrap();
    assert_eq!(cpu.user, 1000);
    assert_eq!(cpu.idle, 9000);
    assert_eq!(cpu.total(), 10_000);
}

#[test]
fn short_cpu_line_is_a_parse_error() {
    let fake = FakeProc::new();
    fake.write("stat", b"cpu  1 2 3\n");
    let err = ProcFs::new(fake.path()).read_cpu_counters().unwrap_err();
    assert!(matches!(err, SampleError::Parse { .. }));
}

#[test]
fn missing_meminfo_is_not_found() {
    let fake = FakeProc::new();
    fake.remove("meminfo");
    let err = ProcFs::new(fake.path()).read_meminfo().unwrap_err();
    assert!(err.is_not_found());
}
