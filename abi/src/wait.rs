//! `waitid(2)` ABI: selector kinds, option bits, child-state codes and the
//! `siginfo_t` prefix the kernel fills for child events.

use bitflags::bitflags;

/// Process identifier.
pub type Pid = i32;

/// `idtype_t` values selecting which children `waitid` considers.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdType {
    All = 0,
    Pid = 1,
    Pgid = 2,
    PidFd = 3,
}

bitflags! {
    /// `waitid(2)` option bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WaitOptions: u32 {
        /// Return immediately if no child has changed state.
        const NOHANG    = 0x0000_0001;
        /// Report stopped children.
        const STOPPED   = 0x0000_0002;
        /// Report terminated children.
        const EXITED    = 0x0000_0004;
        /// Report children resumed by `SIGCONT`.
        const CONTINUED = 0x0000_0008;
        /// Leave the child waitable.
        const NOWAIT    = 0x0100_0000;
        const NOTHREAD  = 0x2000_0000;
        const ALL       = 0x4000_0000;
        const CLONE     = 0x8000_0000;
    }
}

// =============================================================================
// clone(2) flags for vfork-style children
// =============================================================================

/// Child shares the parent's address space.
pub const CLONE_VM: u64 = 0x0000_0100;
/// Parent is suspended until the child execs or exits.
pub const CLONE_VFORK: u64 = 0x0000_4000;

// =============================================================================
// si_code values for SIGCHLD
// =============================================================================

pub const CLD_EXITED: i32 = 1;
pub const CLD_KILLED: i32 = 2;
pub const CLD_DUMPED: i32 = 3;
pub const CLD_TRAPPED: i32 = 4;
pub const CLD_STOPPED: i32 = 5;
pub const CLD_CONTINUED: i32 = 6;

/// Child state transition reported by `waitid`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChildState {
    /// Exited normally; status is the exit code.
    Exited,
    /// Killed by a signal; status is the signal number.
    Killed,
    /// Killed by a signal and dumped core; status is the signal number.
    Dumped,
    /// Traced child trapped.
    Trapped,
    /// Stopped by a signal; status is the signal number.
    Stopped,
    /// Resumed by `SIGCONT`.
    Continued,
}

impl ChildState {
    /// Decode a `CLD_*` code.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            CLD_EXITED => Some(Self::Exited),
            CLD_KILLED => Some(Self::Killed),
            CLD_DUMPED => Some(Self::Dumped),
            CLD_TRAPPED => Some(Self::Trapped),
            CLD_STOPPED => Some(Self::Stopped),
            CLD_CONTINUED => Some(Self::Continued),
            _ => None,
        }
    }
}

/// Kernel `siginfo_t` as filled for `SIGCHLD` by `waitid`.
///
/// Only the child-event fields are named; the rest of the 128-byte union is
/// padding. `waitid` with `NOHANG` leaves `si_pid` zero when nothing changed,
/// so callers must zero the structure before the call.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct SigInfo {
    pub si_signo: i32,
    pub si_errno: i32,
    pub si_code: i32,
    pub __pad0: i32,
    pub si_pid: Pid,
    pub si_uid: u32,
    pub si_status: i32,
    pub __rest: [u8; 100],
}

impl SigInfo {
    pub const fn zeroed() -> Self {
        Self {
            si_signo: 0,
            si_errno: 0,
            si_code: 0,
            __pad0: 0,
            si_pid: 0,
            si_uid: 0,
            si_status: 0,
            __rest: [0; 100],
        }
    }
}

impl Default for SigInfo {
    fn default() -> Self {
        Self::zeroed()
    }
}

const _: () = assert!(core::mem::size_of::<SigInfo>() == 128);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_state_codes() {
        assert_eq!(ChildState::from_code(CLD_EXITED), Some(ChildState::Exited));
        assert_eq!(ChildState::from_code(CLD_KILLED), Some(ChildState::Killed));
        assert_eq!(ChildState::from_code(CLD_CONTINUED), Some(ChildState::Continued));
        assert_eq!(ChildState::from_code(0), None);
    }

    #[test]
    fn siginfo_offsets() {
        let info = SigInfo::zeroed();
        let base = &info as *const SigInfo as usize;
        assert_eq!(&info.si_code as *const i32 as usize - base, 8);
        assert_eq!(&info.si_pid as *const i32 as usize - base, 16);
        assert_eq!(&info.si_status as *const i32 as usize - base, 24);
    }

    #[test]
    fn option_bits() {
        assert_eq!(WaitOptions::EXITED.bits(), 4);
        assert_eq!(WaitOptions::NOHANG.bits(), 1);
        assert_eq!(IdType::PidFd as u32, 3);
    }
}
