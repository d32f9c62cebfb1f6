//! Exit Status Tracking
//!
//! Maps kernel wait statuses into the shell's `[0, 255]` status space
//! and mirrors the most recent status into the environment under the
//! conventional name `?`, where forked children inherit it.

use nix::sys::wait::WaitStatus;

/// Environment entry holding the last observed exit status.
pub const STATUS_VAR: &str = "?";

/// Clamp a raw code (an errno, or a caller-provided value) into the
/// representable status space.
pub fn clamp(code: i32) -> i32 {
    code.clamp(0, 255)
}

/// Compute the shell status for a reaped child: the low 8 bits of a
/// normal exit, or `128 + signo` for a signaled one.
pub fn from_wait(wait_status: WaitStatus) -> i32 {
    match wait_status {
        WaitStatus::Exited(_, code) => clamp(code),
        WaitStatus::Signaled(_, signal, _) => 128 + signal as i32,
        // Stop/continue events are filtered out by the wait flags the
        // engine passes; nothing else carries a status.
        _ => 0,
    }
}

/// Publish `status` as the `?` environment entry in decimal form.
pub fn record(status: i32) {
    std::env::set_var(STATUS_VAR, clamp(status).to_string());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::Signal;
    use nix::unistd::Pid;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp(-1), 0);
        assert_eq!(clamp(0), 0);
        assert_eq!(clamp(142), 142);
        assert_eq!(clamp(300), 255);
    }

    #[test]
    fn test_from_wait_exited() {
        let ws = WaitStatus::Exited(Pid::from_raw(100), 3);
        assert_eq!(from_wait(ws), 3);
    }

    #[test]
    fn test_from_wait_signaled() {
        let ws = WaitStatus::Signaled(Pid::from_raw(100), Signal::SIGTERM, false);
        assert_eq!(from_wait(ws), 128 + 15);
    }

    #[test]
    fn test_record_is_visible_in_env() {
        let _guard = crate::interpreter::test_guard();
        record(42);
        assert_eq!(std::env::var(STATUS_VAR).as_deref(), Ok("42"));
        record(0);
        assert_eq!(std::env::var(STATUS_VAR).as_deref(), Ok("0"));
    }
}
