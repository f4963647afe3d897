use sysbase_abi::fs::S_IFREG;
use sysbase_sys::syscall::fs::{self, Dir};
use sysbase_sys::syscall::{memfd, process};
use sysbase_sys::{Errno, FdGuard, MemfdFlags, Mode, OpenFlags, Whence};

fn scratch_path(tag: &str) -> String {
    format!("/tmp/sysbase-{}-{}", tag, process::getpid())
}

#[test]
fn memfd_round_trip() {
    let fd = memfd::memfd_create(c"x", MemfdFlags::CLOEXEC).unwrap();
    let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    let mut written = 0;
    while written < data.len() {
        written += fs::write(fd, &data[written..]).unwrap();
    }
    assert_eq!(fs::lseek(fd, 0, Whence::Set).unwrap(), 0);
    let mut back = vec![0u8; data.len()];
    let mut read = 0;
    while read < back.len() {
        let n = fs::read(fd, &mut back[read..]).unwrap();
        assert!(n > 0);
        read += n;
    }
    assert_eq!(back, data);
    fs::close(fd).unwrap();
}

#[test]
fn open_create_then_reopen_then_missing() {
    let path = scratch_path("open");
    let fd = fs::open(
        &path,
        OpenFlags::CREAT | OpenFlags::RDWR | OpenFlags::CLOEXEC,
        Mode::octal(0o644),
    )
    .unwrap();
    assert!(fd >= 0);
    let st = fs::fstat(fd).unwrap();
    assert_eq!(st.st_mode & sysbase_abi::fs::S_IFMT, S_IFREG);
    fs::close(fd).unwrap();

    let again = fs::open(&path, OpenFlags::RDWR, Mode::empty()).unwrap();
    fs::close(again).unwrap();
    fs::unlinkat(Dir::Cwd, &path, false).unwrap();

    assert_eq!(
        fs::open("/nonexistent/dir/f", OpenFlags::RDWR, Mode::empty()),
        Err(Errno::ENOENT)
    );
}

#[test]
fn openat_relative_to_directory() {
    let tmp = FdGuard::open(c"/tmp", OpenFlags::DIRECTORY | OpenFlags::CLOEXEC, Mode::empty())
        .unwrap();
    let name = format!("sysbase-at-{}", process::getpid());
    let file = tmp
        .openat(&name, OpenFlags::CREAT | OpenFlags::WRONLY, Mode::octal(0o600))
        .unwrap();
    file.write_all(b"at").unwrap();
    assert_eq!(file.stat().unwrap().st_size, 2);
    file.close().unwrap();
    fs::unlinkat(Dir::Fd(tmp.as_raw()), &name, false).unwrap();
    assert_eq!(
        fs::unlinkat(Dir::Fd(tmp.as_raw()), &name, false),
        Err(Errno::ENOENT)
    );
}

#[test]
fn truncate_and_positional_io() {
    let fd = FdGuard::memfd("sized", MemfdFlags::CLOEXEC).unwrap();
    fd.set_len(100).unwrap();
    assert_eq!(fd.stat().unwrap().st_size, 100);
    assert_eq!(fd.seek(0, Whence::End).unwrap(), 100);

    assert_eq!(fd.write_at(b"tail", 96).unwrap(), 4);
    let mut buf = [0u8; 4];
    assert_eq!(fd.read_at(&mut buf, 96).unwrap(), 4);
    assert_eq!(&buf, b"tail");
    // positional I/O leaves the offset alone
    assert_eq!(fd.seek(0, Whence::Cur).unwrap(), 100);

    fd.set_len(10).unwrap();
    assert_eq!(fd.stat().unwrap().st_size, 10);
    assert_eq!(fd.seek(-20, Whence::Cur), Ok(80));
    assert_eq!(fd.seek(-200, Whence::Cur), Err(Errno::EINVAL));
}

#[test]
fn truncate_needs_a_writable_descriptor() {
    let path = scratch_path("ro");
    let w = FdGuard::open(&path, OpenFlags::CREAT | OpenFlags::WRONLY, Mode::octal(0o600)).unwrap();
    let r = FdGuard::open(&path, OpenFlags::RDONLY, Mode::empty()).unwrap();
    assert!(matches!(r.set_len(1), Err(Errno::EINVAL) | Err(Errno::EBADF)));
    drop(w);
    drop(r);
    fs::unlinkat(Dir::Cwd, &path, false).unwrap();
}

#[test]
fn duplicates_share_the_offset() {
    let a = FdGuard::memfd(c"dup", MemfdFlags::CLOEXEC).unwrap();
    let b = a.try_clone().unwrap();
    assert_ne!(a.as_raw(), b.as_raw());
    a.write_all(b"0123").unwrap();
    assert_eq!(b.seek(0, Whence::Cur).unwrap(), 4);

    let mut target = FdGuard::memfd(c"target", MemfdFlags::CLOEXEC).unwrap();
    let slot = target.as_raw();
    a.dup_onto(&mut target).unwrap();
    assert_eq!(target.as_raw(), slot);
    assert_eq!(target.seek(0, Whence::Cur).unwrap(), 4);
    assert_eq!(fs::dup2(-1, slot), Err(Errno::EBADF));
}

#[test]
fn ownership_moves_and_releases() {
    let fd = FdGuard::memfd(c"owner", MemfdFlags::CLOEXEC).unwrap();
    let raw = fd.as_raw();
    let moved = fd;
    assert_eq!(moved.as_raw(), raw);

    let taken = moved.into_raw();
    assert_eq!(taken, raw);
    // still open: into_raw did not close it
    assert!(fs::fstat(taken).is_ok());
    let back = unsafe { FdGuard::from_raw(taken) };
    assert!(back.close().is_ok());
}

#[test]
fn memfd_secret_when_available() {
    match FdGuard::memfd_secret(true) {
        Ok(fd) => {
            fd.set_len(4096).unwrap();
            assert_eq!(fd.stat().unwrap().st_size, 4096);
        }
        Err(e) => assert!(
            matches!(e, Errno::ENOSYS | Errno::EPERM | Errno::ENOMEM),
            "unexpected memfd_secret error {e:?}"
        ),
    }
}

#[test]
fn pipe_ends_and_seek_refusal() {
    let (r, w) = FdGuard::pipe(OpenFlags::CLOEXEC).unwrap();
    w.write_all(b"through").unwrap();
    drop(w);
    let mut buf = [0u8; 16];
    assert_eq!(r.read(&mut buf).unwrap(), 7);
    assert_eq!(r.read(&mut buf).unwrap(), 0);
    assert_eq!(r.seek(0, Whence::Set), Err(Errno::ESPIPE));
}
