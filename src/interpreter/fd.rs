//! Scoped File Descriptors
//!
//! The engine runs long open/dup2/close sequences under error-prone
//! branching; a descriptor that outlives an early return is a leak the
//! shell never recovers. `ScopedFd` closes on drop, with an explicit
//! escape hatch for descriptors handed off to the kernel.

use std::os::unix::io::RawFd;

use nix::unistd;

use crate::interpreter::errors::ExecError;

/// A file descriptor closed when the value is dropped.
#[derive(Debug)]
pub struct ScopedFd(RawFd);

impl ScopedFd {
    pub fn new(fd: RawFd) -> Self {
        ScopedFd(fd)
    }

    pub fn raw(&self) -> RawFd {
        self.0
    }

    /// Give up ownership without closing; the caller takes over the
    /// descriptor's lifetime.
    pub fn release(self) -> RawFd {
        let fd = self.0;
        std::mem::forget(self);
        fd
    }
}

impl Drop for ScopedFd {
    fn drop(&mut self) {
        let _ = unistd::close(self.0);
    }
}

/// Create an anonymous pipe as a scoped (read, write) pair.
pub fn pipe_pair() -> Result<(ScopedFd, ScopedFd), ExecError> {
    let (read_end, write_end) = unistd::pipe().map_err(|errno| ExecError::sys("pipe", errno))?;
    Ok((ScopedFd::new(read_end), ScopedFd::new(write_end)))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;
    use nix::fcntl::{open, OFlag};
    use nix::sys::stat::Mode;

    fn open_dev_null() -> RawFd {
        open("/dev/null", OFlag::O_RDONLY, Mode::empty()).expect("open /dev/null")
    }

    #[test]
    fn test_drop_closes() {
        let raw = open_dev_null();
        drop(ScopedFd::new(raw));
        // A second close must fail: the descriptor is gone.
        assert_eq!(unistd::close(raw), Err(Errno::EBADF));
    }

    #[test]
    fn test_release_keeps_open() {
        let scoped = ScopedFd::new(open_dev_null());
        let raw = scoped.release();
        assert_eq!(unistd::close(raw), Ok(()));
    }

    #[test]
    fn test_pipe_pair_round_trip() {
        let (read_end, write_end) = pipe_pair().expect("pipe");
        unistd::write(write_end.raw(), b"ok").expect("write");
        drop(write_end);

        let mut buf = [0u8; 8];
        let n = unistd::read(read_end.raw(), &mut buf).expect("read");
        assert_eq!(&buf[..n], b"ok");
        // Writer already closed: the next read sees EOF, not a hang.
        assert_eq!(unistd::read(read_end.raw(), &mut buf), Ok(0));
    }
}
