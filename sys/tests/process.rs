use sysbase_abi::signal::{SIGCHLD, SIGKILL};
use sysbase_abi::{ChildState, PidfdFlags, WaitOptions};
use sysbase_sys::syscall::process::{self, Fork, WaitOn};
use sysbase_sys::{Errno, FdGuard};

const NO_ENV: [&str; 0] = [];

#[test]
fn fork_child_exit_code_is_reported() {
    match unsafe { process::fork() }.unwrap() {
        Fork::Child => process::exit(7),
        Fork::Parent(pid) => {
            let st = process::waitid(WaitOn::Pid(pid), WaitOptions::EXITED)
                .unwrap()
                .expect("blocking wait reports a child");
            assert_eq!(st.pid, pid);
            assert_eq!(st.state, ChildState::Exited);
            assert_eq!(st.status, 7);
            assert_eq!(st.signo, SIGCHLD as i32);
        }
    }
}

#[test]
fn wait_through_pidfd() {
    let pid = process::spawn(c"/bin/sh", &["sh", "-c", "exit 5"], &NO_ENV).unwrap();
    let pidfd = match FdGuard::pidfd(pid, PidfdFlags::empty()) {
        Ok(fd) => fd,
        Err(Errno::ENOSYS) => {
            process::waitid(WaitOn::Pid(pid), WaitOptions::EXITED).unwrap();
            return;
        }
        Err(e) => panic!("pidfd_open: {e:?}"),
    };
    let st = process::waitid(WaitOn::PidFd(pidfd.as_raw()), WaitOptions::EXITED)
        .unwrap()
        .unwrap();
    assert_eq!(st.pid, pid);
    assert_eq!(st.state, ChildState::Exited);
    assert_eq!(st.status, 5);
}

#[test]
fn spawn_of_missing_program() {
    match process::spawn("/nonexistent/program", &["x"], &NO_ENV) {
        Err(e) => assert_eq!(e, Errno::ENOENT),
        // runtimes that cannot report the exec failure let the child exit 127
        Ok(pid) => {
            let st = process::waitid(WaitOn::Pid(pid), WaitOptions::EXITED)
                .unwrap()
                .unwrap();
            assert_eq!(st.status, 127);
        }
    }
}

#[test]
fn vfork_exec_runs_program_and_parent_resumes() {
    let marker = [0x5au8; 64];
    let pid = unsafe { process::vfork_exec(c"/bin/sh", &["sh", "-c", "exit 4"], &NO_ENV) }
        .unwrap();
    assert!(pid > 0);
    // the parent's frame survived the shared-stack child
    assert_eq!(marker, [0x5au8; 64]);
    let st = process::waitid(WaitOn::Pid(pid), WaitOptions::EXITED)
        .unwrap()
        .unwrap();
    assert_eq!(st.pid, pid);
    assert_eq!(st.state, ChildState::Exited);
    assert_eq!(st.status, 4);
}

#[test]
fn vfork_exec_of_missing_program_exits_127() {
    let pid = unsafe { process::vfork_exec("/nonexistent/program", &["x"], &NO_ENV) }.unwrap();
    let st = process::waitid(WaitOn::Pid(pid), WaitOptions::EXITED)
        .unwrap()
        .unwrap();
    assert_eq!(st.state, ChildState::Exited);
    assert_eq!(st.status, 127);
}

#[test]
fn nohang_then_kill() {
    let pid = process::spawn(c"/bin/sh", &["sh", "-c", "sleep 30"], &NO_ENV).unwrap();
    let pending = process::waitid(WaitOn::Pid(pid), WaitOptions::EXITED | WaitOptions::NOHANG);
    assert_eq!(pending, Ok(None));

    let pidfd = FdGuard::pidfd(pid, PidfdFlags::empty());
    match &pidfd {
        Ok(fd) => process::pidfd_send_signal(fd.as_raw(), SIGKILL).unwrap(),
        Err(_) => {
            // no pidfd support: fall back to the classic kill
            assert_eq!(unsafe { libc::kill(pid, SIGKILL as i32) }, 0);
        }
    }
    let st = process::waitid(WaitOn::Pid(pid), WaitOptions::EXITED)
        .unwrap()
        .unwrap();
    assert_eq!(st.state, ChildState::Killed);
    assert_eq!(st.status, SIGKILL as i32);
}

#[test]
fn execve_failure_returns_to_caller() {
    let err = process::execve(c"/nonexistent/binary", &["binary"], &NO_ENV);
    assert_eq!(err, Errno::ENOENT);
}

#[test]
fn no_children_to_wait_for() {
    assert_eq!(
        process::waitid(WaitOn::Pid(i32::MAX), WaitOptions::EXITED),
        Err(Errno::ECHILD)
    );
}

#[test]
fn pidfd_of_missing_process() {
    match FdGuard::pidfd(i32::MAX, PidfdFlags::empty()) {
        Err(e) => assert!(matches!(e, Errno::ESRCH | Errno::ENOSYS), "{e:?}"),
        Ok(fd) => panic!("pidfd for nonexistent pid: {fd:?}"),
    }
}
