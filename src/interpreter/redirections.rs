//! Redirection Application
//!
//! Rewires the current process's standard streams in place, so this
//! runs inside freshly forked children only. Order is fixed: input
//! first, then output; the order is observable when one file is both
//! source and destination.

use std::io::{Seek, SeekFrom, Write};
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;

use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use nix::sys::stat::Mode;
use nix::unistd::dup2;

use crate::ast::types::{RedirectIn, RedirectOut};
use crate::interpreter::errors::ExecError;
use crate::interpreter::fd::ScopedFd;

/// Apply a node's redirections to the current process. Any failure
/// must be treated as fatal by the caller (the child exits with the
/// error's status).
pub fn apply(input: Option<&RedirectIn>, output: Option<&RedirectOut>) -> Result<(), ExecError> {
    if let Some(input) = input {
        apply_input(input)?;
    }
    if let Some(output) = output {
        apply_output(output)?;
    }
    Ok(())
}

fn apply_input(redirect: &RedirectIn) -> Result<(), ExecError> {
    match redirect {
        RedirectIn::File(path) => {
            let fd = open_path(path, OFlag::O_RDONLY)?;
            dup_onto(fd.raw(), STDIN_FILENO)
            // fd drops here, closing the original as required
        }
        RedirectIn::HereDoc(body) => {
            let spool = spool_here_doc(body)?;
            dup_onto(spool.as_raw_fd(), STDIN_FILENO)
        }
    }
}

fn apply_output(redirect: &RedirectOut) -> Result<(), ExecError> {
    let (fd, also_stderr) = open_output(redirect)?;
    dup_onto(fd.raw(), STDOUT_FILENO)?;
    if also_stderr {
        dup_onto(fd.raw(), STDERR_FILENO)?;
    }
    Ok(())
}

/// Open the target of an output redirection. Returns the descriptor
/// and whether it must also replace stderr.
fn open_output(redirect: &RedirectOut) -> Result<(ScopedFd, bool), ExecError> {
    let create = OFlag::O_WRONLY | OFlag::O_CREAT;
    let (path, flags, also_stderr) = match redirect {
        RedirectOut::File(path) => (path, create | OFlag::O_TRUNC, false),
        RedirectOut::Append(path) => (path, create | OFlag::O_APPEND, false),
        RedirectOut::FileAndStderr(path) => (path, create | OFlag::O_TRUNC, true),
    };
    Ok((open_path_mode(path, flags, Mode::from_bits_truncate(0o666))?, also_stderr))
}

/// Spool a here-document body into an anonymous (already unlinked)
/// temp file and rewind it. A pipe filled before exec would deadlock
/// once the body outgrows the kernel pipe buffer; the spool file has
/// no such limit.
fn spool_here_doc(body: &str) -> Result<std::fs::File, ExecError> {
    let mut file = tempfile::tempfile().map_err(|err| io_error("open", err))?;
    file.write_all(body.as_bytes())
        .map_err(|err| io_error("write", err))?;
    file.seek(SeekFrom::Start(0))
        .map_err(|err| io_error("lseek", err))?;
    Ok(file)
}

fn open_path(path: &str, flags: OFlag) -> Result<ScopedFd, ExecError> {
    open_path_mode(path, flags, Mode::empty())
}

fn open_path_mode(path: &str, flags: OFlag, mode: Mode) -> Result<ScopedFd, ExecError> {
    let fd = open(Path::new(path), flags, mode).map_err(|errno| ExecError::sys("open", errno))?;
    Ok(ScopedFd::new(fd))
}

fn dup_onto(fd: RawFd, target: RawFd) -> Result<(), ExecError> {
    dup2(fd, target).map_err(|errno| ExecError::sys("dup2", errno))?;
    Ok(())
}

fn io_error(call: &'static str, err: std::io::Error) -> ExecError {
    ExecError::sys(call, Errno::from_i32(err.raw_os_error().unwrap_or(nix::libc::EIO)))
}

// ============================================================================
// Tests
// ============================================================================
