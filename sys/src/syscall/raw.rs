//! Raw syscall primitives for x86_64 Linux.
//!
//! These are the only places the `syscall` instruction is issued. They return
//! the kernel's raw result untouched; classification into a [`SysResult`]
//! happens in [`super::error::demux`] and policy in [`super::invoke`].
//!
//! # ABI Convention
//!
//! - rax: syscall number
//! - rdi, rsi, rdx, r10, r8, r9: arguments 0-5
//! - rax: return value, `-errno` on failure
//! - rcx, r11: clobbered by the syscall instruction
//!
//! [`SysResult`]: super::error::SysResult

use core::arch::asm;

use sysbase_abi::signal::SIGCHLD;
use sysbase_abi::syscall::{SYS_CLONE, SYS_EXECVE, SYS_EXIT_GROUP};
use sysbase_abi::wait::{CLONE_VFORK, CLONE_VM};

#[inline(always)]
pub unsafe fn syscall0(num: u64) -> u64 {
    #[cfg(test)]
    if let Some(ret) = script::take(num) {
        return ret;
    }
    let ret: u64;
    unsafe {
        asm!(
            "syscall",
            in("rax") num,
            lateout("rax") ret,
            out("rcx") _,
            out("r11") _,
            options(nostack),
        );
    }
    ret
}

#[inline(always)]
pub unsafe fn syscall1(num: u64, arg0: u64) -> u64 {
    #[cfg(test)]
    if let Some(ret) = script::take(num) {
        return ret;
    }
    let ret: u64;
    unsafe {
        asm!(
            "syscall",
            in("rax") num,
            in("rdi") arg0,
            lateout("rax") ret,
            out("rcx") _,
            out("r11") _,
            options(nostack),
        );
    }
    ret
}

#[inline(always)]
pub unsafe fn syscall3(num: u64, arg0: u64, arg1: u64, arg2: u64) -> u64 {
    #[cfg(test)]
    if let Some(ret) = script::take(num) {
        return ret;
    }
    let ret: u64;
    unsafe {
        asm!(
            "syscall",
            in("rax") num,
            in("rdi") arg0,
            in("rsi") arg1,
            in("rdx") arg2,
            lateout("rax") ret,
            out("rcx") _,
            out("r11") _,
            options(nostack),
        );
    }
    ret
}

#[inline(always)]
pub unsafe fn syscall6(
    num: u64,
    arg0: u64,
    arg1: u64,
    arg2: u64,
    arg3: u64,
    arg4: u64,
    arg5: u64,
) -> u64 {
    #[cfg(test)]
    if let Some(ret) = script::take(num) {
        return ret;
    }
    let ret: u64;
    unsafe {
        asm!(
            "syscall",
            in("rax") num,
            in("rdi") arg0,
            in("rsi") arg1,
            in("rdx") arg2,
            in("r10") arg3,
            in("r8") arg4,
            in("r9") arg5,
            lateout("rax") ret,
            out("rcx") _,
            out("r11") _,
            options(nostack),
        );
    }
    ret
}

/// `clone(CLONE_VM | CLONE_VFORK | SIGCHLD)` followed, in the child, by
/// `execve(path, argv, envp)` and `exit_group(127)`.
///
/// The child runs only the instructions of this block, touches no memory and
/// never returns into compiled code. The parent is
/// suspended until the child execs or exits, then gets the child's pid (or
/// `-errno` from `clone`).
///
/// # Safety
///
/// `path`, `argv` and `envp` must be valid `execve` arguments.
#[inline(never)]
pub unsafe fn vfork_exec(path: u64, argv: u64, envp: u64) -> u64 {
    #[cfg(test)]
    if let Some(ret) = script::take(SYS_CLONE) {
        return ret;
    }
    let ret: u64;
    unsafe {
        asm!(
            "syscall",
            "test rax, rax",
            "jnz 2f",
            "mov rdi, r12",
            "mov rsi, r13",
            "mov rdx, r14",
            "mov eax, {execve}",
            "syscall",
            "mov edi, 127",
            "mov eax, {exit_group}",
            "syscall",
            "ud2",
            "2:",
            execve = const SYS_EXECVE,
            exit_group = const SYS_EXIT_GROUP,
            inlateout("rax") SYS_CLONE => ret,
            inlateout("rdi") CLONE_VM | CLONE_VFORK | SIGCHLD as u64 => _,
            // child stack 0: keep running on the shared one
            inlateout("rsi") 0u64 => _,
            inlateout("rdx") 0u64 => _,
            in("r10") 0u64,
            in("r8") 0u64,
            in("r12") path,
            in("r13") argv,
            in("r14") envp,
            out("rcx") _,
            out("r11") _,
        );
    }
    ret
}
