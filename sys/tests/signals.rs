use sysbase_abi::signal::{SIGCANCEL, SIGSETXID, SIGUSR1, SIGUSR2};
use sysbase_sys::syscall::signal::{current_mask, sigprocmask};
use sysbase_sys::{How, SigSet};

#[test]
fn reserved_signals_are_stripped_from_block() {
    let old = sigprocmask(
        How::Block,
        &SigSet::empty().with(SIGUSR1).with(SIGCANCEL).with(SIGSETXID),
    )
    .unwrap();
    let applied = current_mask().unwrap();
    sigprocmask(How::SetMask, &old).unwrap();

    assert!(applied.contains(SIGUSR1));
    assert!(!applied.contains(SIGCANCEL));
    assert!(!applied.contains(SIGSETXID));
}

#[test]
fn set_mask_full_keeps_reserved_clear() {
    let old = sigprocmask(How::SetMask, &SigSet::full()).unwrap();
    let applied = sigprocmask(How::SetMask, &old).unwrap();

    assert!(applied.contains(SIGUSR2));
    assert!(!applied.contains(SIGCANCEL));
    assert!(!applied.contains(SIGSETXID));
    assert_eq!(current_mask().unwrap(), old);
}

#[test]
fn unblock_returns_previous_mask() {
    let old = sigprocmask(How::Block, &SigSet::empty().with(SIGUSR2)).unwrap();
    let before_unblock = sigprocmask(How::Unblock, &SigSet::empty().with(SIGUSR2)).unwrap();
    assert!(before_unblock.contains(SIGUSR2));
    assert!(!current_mask().unwrap().contains(SIGUSR2));
    sigprocmask(How::SetMask, &old).unwrap();
}
