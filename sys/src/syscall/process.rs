//! Process control: fork, vfork-exec, spawn, execve, waitid, exit, pidfd.
//!
//! `fork` goes through the C runtime so its at-fork handlers and thread
//! bookkeeping stay consistent. Unlike every other wrapper it reports failure
//! with a `-1` sentinel and `errno`, which is read with [`last_errno`]
//! instead of being demuxed from the return value.
//!
//! A vfork child shares the caller's stack, so it cannot come back into Rust:
//! [`vfork_exec`] keeps the child inside one asm block that only execs or
//! exits. [`spawn`] is the safe form, built on `posix_spawn`.

use core::ptr;

use sysbase_abi::wait::SigInfo;
use sysbase_abi::{ChildState, IdType, Pid, PidfdFlags, RawFd, SyscallKind, WaitOptions};

use super::arg::{CStrVec, PathArg};
use super::error::{Errno, SysResult, demux, last_errno};
use super::invoke::call;
use super::raw;
use crate::klog_debug;

/// Which side of a fork the caller is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fork {
    Child,
    Parent(Pid),
}

/// Decode a C-runtime fork return: `-1` means failure with the reason in
/// `errno`, `0` is the child, anything else the child's pid.
#[inline]
fn fork_result(ret: libc::pid_t) -> SysResult<Fork> {
    match ret {
        -1 => Err(last_errno()),
        0 => Ok(Fork::Child),
        pid => Ok(Fork::Parent(pid)),
    }
}

/// Duplicate the calling process.
///
/// # Safety
///
/// If the process has more than one thread, the child may only call
/// async-signal-safe functions (e.g. [`execve`], [`exit`]) until it execs:
/// locks held by other threads in the parent stay held forever in the child.
pub unsafe fn fork() -> SysResult<Fork> {
    fork_result(unsafe { libc::fork() })
}

/// vfork a child that immediately runs `path`. Returns the child's pid once
/// the child has exec'd or exited; if `execve` fails the child exits with
/// status 127.
///
/// The parent is suspended in between. Every string is converted before the
/// fork, and the child never executes Rust code.
///
/// # Safety
///
/// The child shares the caller's memory until it execs. No signal handler
/// installed by this process may run in that window: block handled signals
/// around the call, or use [`spawn`].
///
/// # Errors
/// * `EINVAL` - a string contains an interior NUL
/// * `EAGAIN` - process limit reached
/// * `ENOMEM` - no memory for the child
pub unsafe fn vfork_exec<P, A, E>(path: &P, argv: &[A], envp: &[E]) -> SysResult<Pid>
where
    P: PathArg + ?Sized,
    A: PathArg,
    E: PathArg,
{
    let path = path.to_c_str()?;
    let argv = CStrVec::new(argv)?;
    let envp = CStrVec::new(envp)?;
    let ret = unsafe {
        raw::vfork_exec(
            path.as_ptr() as u64,
            argv.as_ptr() as u64,
            envp.as_ptr() as u64,
        )
    };
    let pid = demux(ret)? as Pid;
    klog_debug!("vforked pid {} for {:?}", pid, path);
    Ok(pid)
}

/// Run `path` with `argv` and `envp` in a new process. Returns the child's pid.
///
/// # Errors
/// * `EINVAL` - a string contains an interior NUL
/// * `ENOENT`, `EACCES`, `ENOEXEC` - the C runtime reports an `execve`
///   failure here; older runtimes instead let the child exit with 127
/// * `EAGAIN` - process limit reached
pub fn spawn<P, A, E>(path: &P, argv: &[A], envp: &[E]) -> SysResult<Pid>
where
    P: PathArg + ?Sized,
    A: PathArg,
    E: PathArg,
{
    let path = path.to_c_str()?;
    let argv = CStrVec::new(argv)?;
    let envp = CStrVec::new(envp)?;
    let mut pid: libc::pid_t = 0;

    // SAFETY: all three vectors are NULL-terminated arrays of C strings that
    // outlive the call; `posix_spawn` does not write through them.
    let err = unsafe {
        libc::posix_spawn(
            &mut pid,
            path.as_ptr(),
            ptr::null(),
            ptr::null(),
            argv.as_ptr().cast(),
            envp.as_ptr().cast(),
        )
    };
    if err != 0 {
        return Err(Errno::from_raw(err));
    }
    klog_debug!("spawned pid {} for {:?}", pid, path);
    Ok(pid)
}

/// Replace the current process image.
///
/// Returns only on failure, so the return type is the error itself.
///
/// # Errors
/// * `ENOENT` - `path` does not exist
/// * `EACCES` - not executable
/// * `ENOEXEC` - unrecognised format
/// * `EINVAL` - a string contains an interior NUL
pub fn execve<P, A, E>(path: &P, argv: &[A], envp: &[E]) -> Errno
where
    P: PathArg + ?Sized,
    A: PathArg,
    E: PathArg,
{
    let prepared = path
        .to_c_str()
        .and_then(|path| Ok((path, CStrVec::new(argv)?, CStrVec::new(envp)?)));
    let (path, argv, envp) = match prepared {
        Ok(v) => v,
        Err(e) => return e,
    };
    let ret = unsafe {
        call(
            SyscallKind::Execve,
            &[
                path.as_ptr() as u64,
                argv.as_ptr() as u64,
                envp.as_ptr() as u64,
            ],
        )
    };
    match ret {
        Err(e) => e,
        Ok(_) => unreachable!("execve returned to the caller"),
    }
}

/// Selects the children [`waitid`] considers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOn {
    All,
    Pid(Pid),
    Pgid(Pid),
    PidFd(RawFd),
}

impl WaitOn {
    fn split(self) -> (IdType, u64) {
        match self {
            WaitOn::All => (IdType::All, 0),
            WaitOn::Pid(pid) => (IdType::Pid, pid as u64),
            WaitOn::Pgid(pgid) => (IdType::Pgid, pgid as u64),
            WaitOn::PidFd(fd) => (IdType::PidFd, fd as u64),
        }
    }
}

/// A child state change reported by [`waitid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitStatus {
    pub pid: Pid,
    pub uid: u32,
    /// Always `SIGCHLD`.
    pub signo: i32,
    /// Exit code for [`ChildState::Exited`], otherwise the signal number.
    pub status: i32,
    pub state: ChildState,
}

/// Wait for a child matching `on` to change state.
///
/// `options` must include at least one of `EXITED`, `STOPPED`, `CONTINUED`.
/// With `NOHANG`, returns `Ok(None)` when no matching child has changed
/// state yet.
///
/// # Errors
/// * `ECHILD` - no matching children
/// * `EINTR` - interrupted (cancellation point, never retried)
/// * `EINVAL` - bad options
pub fn waitid(on: WaitOn, options: WaitOptions) -> SysResult<Option<WaitStatus>> {
    let (idtype, id) = on.split();
    let mut info = SigInfo::zeroed();
    unsafe {
        call(
            SyscallKind::Waitid,
            &[
                idtype as u64,
                id,
                &mut info as *mut SigInfo as u64,
                options.bits() as u64,
                0,
            ],
        )
    }?;
    if info.si_pid == 0 {
        return Ok(None);
    }
    let state = ChildState::from_code(info.si_code).ok_or(Errno::EINVAL)?;
    Ok(Some(WaitStatus {
        pid: info.si_pid,
        uid: info.si_uid,
        signo: info.si_signo,
        status: info.si_status,
        state,
    }))
}

/// Terminate every thread of the process with `code`.
///
/// Issued directly, without logging, so it is safe in a forked child.
pub fn exit(code: i32) -> ! {
    unsafe {
        raw::syscall1(SyscallKind::ExitGroup.nr(), code as u64);
    }
    loop {
        core::hint::spin_loop();
    }
}

/// Pid of the calling process. `getpid` cannot fail.
#[inline]
pub fn getpid() -> Pid {
    unsafe { call(SyscallKind::GetPid, &[]) }.map_or(0, |pid| pid as Pid)
}

/// Open a descriptor referring to process `pid`.
///
/// # Errors
/// * `ESRCH` - no such process
/// * `EINVAL` - `pid` is not a thread-group leader (without `THREAD`)
pub fn pidfd_open(pid: Pid, flags: PidfdFlags) -> SysResult<RawFd> {
    unsafe { call(SyscallKind::PidfdOpen, &[pid as u64, flags.bits() as u64]) }
        .map(|fd| fd as RawFd)
}

/// Send `signo` to the process behind `pidfd`.
pub fn pidfd_send_signal(pidfd: RawFd, signo: u32) -> SysResult<()> {
    unsafe {
        call(
            SyscallKind::PidfdSendSignal,
            &[pidfd as u64, signo as u64, 0, 0],
        )
    }
    .map(|_| ())
}
