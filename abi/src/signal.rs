//! POSIX signal ABI definitions.
//!
//! Signal numbers, the kernel signal-set layout used by `rt_sigprocmask`, and
//! the two real-time signals the threading runtime reserves for itself.

use core::fmt;

/// Number of signals representable in a kernel `sigset_t` on x86_64.
/// Signals are numbered 1..=NSIG.
pub const NSIG: u32 = 64;

// =============================================================================
// Standard signal numbers (Linux x86_64)
// =============================================================================

pub const SIGHUP: u32 = 1;
pub const SIGINT: u32 = 2;
pub const SIGQUIT: u32 = 3;
pub const SIGILL: u32 = 4;
pub const SIGTRAP: u32 = 5;
pub const SIGABRT: u32 = 6;
pub const SIGBUS: u32 = 7;
pub const SIGFPE: u32 = 8;
pub const SIGKILL: u32 = 9;
pub const SIGUSR1: u32 = 10;
pub const SIGSEGV: u32 = 11;
pub const SIGUSR2: u32 = 12;
pub const SIGPIPE: u32 = 13;
pub const SIGALRM: u32 = 14;
pub const SIGTERM: u32 = 15;
pub const SIGSTKFLT: u32 = 16;
pub const SIGCHLD: u32 = 17;
pub const SIGCONT: u32 = 18;
pub const SIGSTOP: u32 = 19;
pub const SIGTSTP: u32 = 20;
pub const SIGTTIN: u32 = 21;
pub const SIGTTOU: u32 = 22;
pub const SIGURG: u32 = 23;
pub const SIGXCPU: u32 = 24;
pub const SIGXFSZ: u32 = 25;
pub const SIGVTALRM: u32 = 26;
pub const SIGPROF: u32 = 27;
pub const SIGWINCH: u32 = 28;
pub const SIGIO: u32 = 29;
pub const SIGPWR: u32 = 30;
pub const SIGSYS: u32 = 31;

// =============================================================================
// Runtime-reserved real-time signals
// =============================================================================

/// Thread cancellation signal used by the C threading runtime.
pub const SIGCANCEL: u32 = 32;
/// Signal used to broadcast set*id changes to every thread.
pub const SIGSETXID: u32 = 33;

/// Signals no application mask update may block or unblock.
pub const RESERVED_SIGNALS: SigSet = SigSet::empty().with(SIGCANCEL).with(SIGSETXID);

// =============================================================================
// rt_sigprocmask how parameter
// =============================================================================

/// How `sigprocmask` combines the new set with the current mask.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum How {
    /// Add the set to the mask.
    Block = 0,
    /// Remove the set from the mask.
    Unblock = 1,
    /// Replace the mask with the set.
    SetMask = 2,
}

// =============================================================================
// Signal set
// =============================================================================

/// Bitmask of signals, laid out exactly as the kernel's 8-byte `sigset_t`.
/// Bit N corresponds to signal N+1 (signal 0 does not exist).
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SigSet(u64);

/// Convert a signal number (1-based) to its bitmask; out-of-range numbers
/// yield an empty mask.
#[inline]
pub const fn sig_bit(signum: u32) -> u64 {
    if signum == 0 || signum > NSIG {
        0
    } else {
        1u64 << (signum - 1)
    }
}

impl SigSet {
    /// Set with no signals.
    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Set with every signal.
    #[inline]
    pub const fn full() -> Self {
        Self(u64::MAX)
    }

    /// Build a set from its raw kernel representation.
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw kernel representation.
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Copy of this set with `signum` added.
    #[inline]
    pub const fn with(self, signum: u32) -> Self {
        Self(self.0 | sig_bit(signum))
    }

    /// Copy of this set with `signum` removed.
    #[inline]
    pub const fn without(self, signum: u32) -> Self {
        Self(self.0 & !sig_bit(signum))
    }

    #[inline]
    pub fn insert(&mut self, signum: u32) {
        self.0 |= sig_bit(signum);
    }

    #[inline]
    pub fn remove(&mut self, signum: u32) {
        self.0 &= !sig_bit(signum);
    }

    #[inline]
    pub const fn contains(self, signum: u32) -> bool {
        let bit = sig_bit(signum);
        bit != 0 && self.0 & bit != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Copy of this set with the runtime-reserved signals cleared.
    #[inline]
    pub const fn without_reserved(self) -> Self {
        Self(self.0 & !RESERVED_SIGNALS.0)
    }

    /// Iterate over the signal numbers in the set, lowest first.
    pub fn iter(self) -> impl Iterator<Item = u32> {
        (1..=NSIG).filter(move |&sig| self.contains(sig))
    }
}

impl FromIterator<u32> for SigSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = Self::empty();
        for sig in iter {
            set.insert(sig);
        }
        set
    }
}

impl fmt::Debug for SigSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
