//! Control-Flow Composition
//!
//! `&&` and `||` short-circuit on the left status, `;` sequences, and
//! `&` forks a detached job the reaper reclaims later. All four leave
//! the parent's own state alone; only builtins and the status variable
//! change it.

use log::debug;
use nix::unistd::{fork, ForkResult};

use crate::ast::types::Cmd;
use crate::interpreter::errors::ExecError;
use crate::interpreter::execution_engine::Interpreter;
use crate::interpreter::status;

impl Interpreter {
    pub(crate) fn execute_and(&mut self, left: &Cmd, right: &Cmd) -> i32 {
        let code = self.interpret(left);
        if code != 0 {
            return code;
        }
        self.interpret(right)
    }

    pub(crate) fn execute_or(&mut self, left: &Cmd, right: &Cmd) -> i32 {
        let code = self.interpret(left);
        if code == 0 {
            return code;
        }
        self.interpret(right)
    }

    pub(crate) fn execute_seq(&mut self, left: &Cmd, right: Option<&Cmd>) -> i32 {
        let code = self.interpret(left);
        match right {
            Some(right) => self.interpret(right),
            None => code,
        }
    }

    /// `job & next`: the job runs in a detached child announced on
    /// stderr; the parent reports 0 for the detachment itself and then
    /// runs `next` (when present) synchronously.
    pub(crate) fn execute_background(&mut self, job: &Cmd, next: Option<&Cmd>) -> i32 {
        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                let code = self.interpret(job);
                std::process::exit(status::clamp(code));
            }
            Ok(ForkResult::Parent { child }) => {
                eprintln!("Backgrounded: {}", child);
                debug!("background job {} started", child);
                match next {
                    Some(next) => self.interpret(next),
                    None => 0,
                }
            }
            Err(errno) => {
                let err = ExecError::sys("fork", errno);
                eprintln!("{}", err);
                err.status()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::types::{RedirectOut, SimpleCmd};
    use crate::interpreter::reaper;
    use std::time::{Duration, Instant};

    fn touch(path: &std::path::Path) -> Cmd {
        Cmd::simple(["touch".to_string(), path.display().to_string()])
    }

    /// Poll the reaper until it hands back at least one child.
    fn reap_eventually() -> Vec<reaper::Reaped> {
        for _ in 0..200 {
            let reaped = reaper::reap_completed();
            if !reaped.is_empty() {
                return reaped;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        Vec::new()
    }

    #[test]
    fn test_and_short_circuits() {
        let _guard = crate::interpreter::test_guard();
        let dir = tempfile::tempdir().expect("tempdir");
        let marker = dir.path().join("ran");

        let mut interpreter = Interpreter::new();
        let code = interpreter.interpret(&Cmd::and(Cmd::simple(["false"]), touch(&marker)));
        assert_eq!(code, 1);
        assert!(!marker.exists());

        let code = interpreter.interpret(&Cmd::and(Cmd::simple(["true"]), touch(&marker)));
        assert_eq!(code, 0);
        assert!(marker.exists());
    }

    #[test]
    fn test_or_short_circuits() {
        let _guard = crate::interpreter::test_guard();
        let dir = tempfile::tempdir().expect("tempdir");
        let marker = dir.path().join("ran");

        let mut interpreter = Interpreter::new();
        let code = interpreter.interpret(&Cmd::or(Cmd::simple(["true"]), touch(&marker)));
        assert_eq!(code, 0);
        assert!(!marker.exists());

        let code = interpreter.interpret(&Cmd::or(Cmd::simple(["false"]), touch(&marker)));
        assert_eq!(code, 0);
        assert!(marker.exists());
    }

    #[test]
    fn test_seq_runs_both_and_reports_the_last() {
        let _guard = crate::interpreter::test_guard();
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("first");
        let second = dir.path().join("second");

        let mut interpreter = Interpreter::new();
        let tree = Cmd::seq(
            Cmd::seq(touch(&first), Some(touch(&second))),
            Some(Cmd::simple(["sh", "-c", "exit 4"])),
        );
        assert_eq!(interpreter.interpret(&tree), 4);
        assert!(first.exists());
        assert!(second.exists());
    }

    #[test]
    fn test_seq_without_right_keeps_left_status() {
        let _guard = crate::interpreter::test_guard();
        let mut interpreter = Interpreter::new();
        let tree = Cmd::seq(Cmd::simple(["sh", "-c", "exit 6"]), None);
        assert_eq!(interpreter.interpret(&tree), 6);
    }

    #[test]
    fn test_background_returns_without_waiting() {
        let _guard = crate::interpreter::test_guard();
        let mut interpreter = Interpreter::new();

        let started = Instant::now();
        let tree = Cmd::background(Cmd::simple(["sleep", "0.4"]), None);
        assert_eq!(interpreter.interpret(&tree), 0);
        assert!(started.elapsed() < Duration::from_millis(300));

        // The job is reclaimed later, with its own status.
        let reaped = reap_eventually();
        assert_eq!(reaped.len(), 1);
        assert_eq!(reaped[0].status, 0);
    }

    #[test]
    fn test_background_then_next_runs_synchronously() {
        let _guard = crate::interpreter::test_guard();
        let dir = tempfile::tempdir().expect("tempdir");
        let marker = dir.path().join("after");

        let mut interpreter = Interpreter::new();
        let tree = Cmd::background(
            Cmd::simple(["sleep", "0.2"]),
            Some(Cmd::seq(touch(&marker), Some(Cmd::simple(["sh", "-c", "exit 2"])))),
        );
        assert_eq!(interpreter.interpret(&tree), 2);
        assert!(marker.exists());

        assert_eq!(reap_eventually().len(), 1);
    }

    #[test]
    fn test_background_failure_status_is_reported_by_reaper() {
        let _guard = crate::interpreter::test_guard();
        let mut interpreter = Interpreter::new();

        let tree = Cmd::background(Cmd::simple(["sh", "-c", "exit 11"]), None);
        assert_eq!(interpreter.interpret(&tree), 0);

        let reaped = reap_eventually();
        assert_eq!(reaped.len(), 1);
        assert_eq!(reaped[0].status, 11);
    }

    #[test]
    fn test_background_job_output_lands_where_redirected() {
        let _guard = crate::interpreter::test_guard();
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("bg.txt");

        let job = Cmd::Simple(
            SimpleCmd::new(["echo", "done"]).output(RedirectOut::File(out.display().to_string())),
        );
        let mut interpreter = Interpreter::new();
        assert_eq!(interpreter.interpret(&Cmd::background(job, None)), 0);

        assert_eq!(reap_eventually().len(), 1);
        assert_eq!(std::fs::read_to_string(&out).expect("read"), "done\n");
    }
}
