//! sysprobe: exercise the syscall layer against the running kernel.
//!
//! Usage: `sysprobe [DIR]` (default `/tmp`). Set `SYSBASE_LOG=debug` to see
//! the library's own log lines.

use sysbase_abi::signal::SIGUSR1;
use sysbase_abi::{PidfdFlags, WaitOptions};
use sysbase_sys::io::{BufReader, BufWriter, FdRef};
use sysbase_sys::syscall::fs::{self, Dir};
use sysbase_sys::syscall::process::{self, WaitOn};
use sysbase_sys::syscall::signal;
use sysbase_sys::{
    Errno, FdGuard, How, Mapping, MemfdFlags, Mode, OpenFlags, Prot, Share, SigSet, Whence,
    klog, klog_info, unwrap_or_exit,
};

fn main() {
    if let Err(err) = klog::init_from_env() {
        eprintln!("sysprobe: logger already installed: {err}");
    }
    let dir = std::env::args().nth(1).unwrap_or_else(|| String::from("/tmp"));
    let mut out = BufWriter::new(FdRef::STDOUT);

    // memfd round trip through the buffered layer
    let mut mem = unwrap_or_exit!(
        FdGuard::memfd(c"sysprobe", MemfdFlags::CLOEXEC),
        "memfd_create"
    );
    {
        let mut w = BufWriter::new(&mut mem);
        unwrap_or_exit!(writeln!(w, "pid {} says hello", process::getpid()), "write memfd");
        unwrap_or_exit!(w.flush(), "flush memfd");
    }
    unwrap_or_exit!(mem.seek(0, Whence::Set), "lseek memfd");
    let mut line = String::new();
    unwrap_or_exit!(BufReader::new(&mut mem).read_line(&mut line), "read memfd");
    unwrap_or_exit!(write!(out, "memfd: {}", line), "stdout");
    // `die` exits without unwinding: reported lines must be out before the
    // next step can fail
    unwrap_or_exit!(out.flush(), "stdout");

    // regular file: create, size, map, verify, remove
    let path = format!("{}/sysprobe-{}.dat", dir, process::getpid());
    let file = unwrap_or_exit!(
        FdGuard::open(
            &path,
            OpenFlags::CREAT | OpenFlags::RDWR | OpenFlags::TRUNC | OpenFlags::CLOEXEC,
            Mode::octal(0o644),
        ),
        "open {}",
        path
    );
    unwrap_or_exit!(file.set_len(4096), "ftruncate {}", path);
    unwrap_or_exit!(file.write_at(b"mapped", 0), "pwrite {}", path);
    let map = unwrap_or_exit!(
        Mapping::map(&file, 4096, 0, Prot::READ, Share::Shared),
        "mmap {}",
        path
    );
    let size = unwrap_or_exit!(file.stat(), "fstat {}", path).st_size;
    let head = String::from_utf8_lossy(&map.as_slice()[..6]).into_owned();
    unwrap_or_exit!(
        writeln!(out, "file: {} bytes, mapping starts with {:?}", size, head),
        "stdout"
    );
    unwrap_or_exit!(out.flush(), "stdout");
    drop(map);
    unwrap_or_exit!(file.close(), "close {}", path);
    unwrap_or_exit!(fs::unlinkat(Dir::Cwd, &path, false), "unlink {}", path);

    // signal mask: reserved runtime signals are never applied
    let request = SigSet::empty().with(SIGUSR1).with(32).with(33);
    let old = unwrap_or_exit!(signal::sigprocmask(How::Block, &request), "sigprocmask");
    let now = unwrap_or_exit!(signal::current_mask(), "sigprocmask");
    unwrap_or_exit!(signal::sigprocmask(How::SetMask, &old), "sigprocmask");
    unwrap_or_exit!(
        writeln!(out, "mask: requested {:?}, applied {:?}", request, now),
        "stdout"
    );
    unwrap_or_exit!(out.flush(), "stdout");

    // child process, waited on through a pidfd
    let none: [&str; 0] = [];
    let pid = unwrap_or_exit!(
        process::spawn(c"/bin/sh", &["sh", "-c", "exit 3"], &none),
        "spawn /bin/sh"
    );
    let status = match FdGuard::pidfd(pid, PidfdFlags::empty()) {
        Ok(pidfd) => process::waitid(WaitOn::PidFd(pidfd.as_raw()), WaitOptions::EXITED),
        Err(Errno::ENOSYS) => process::waitid(WaitOn::Pid(pid), WaitOptions::EXITED),
        Err(e) => Err(e),
    };
    let report = match unwrap_or_exit!(status, "waitid {}", pid) {
        Some(st) => writeln!(out, "child {}: {:?} {}", st.pid, st.state, st.status),
        None => writeln!(out, "child {}: no state change", pid),
    };
    unwrap_or_exit!(report, "stdout");

    unwrap_or_exit!(out.flush(), "stdout");
    klog_info!("sysprobe done");
}
