//! Built-in Commands
//!
//! Built-ins execute in the shell process itself: forking them would
//! strand their effect (a changed cwd, a mutated directory stack) in a
//! child that immediately exits. They do not consume locals or
//! redirections.

pub mod cd_cmd;
pub mod dirs_cmd;

use crate::interpreter::dir_stack::DirStack;

/// Outcome of builtin dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinOutcome {
    /// `argv[0]` names no builtin; fall through to fork/exec.
    NotBuiltin,
    /// The builtin ran in-process and produced this status.
    Handled(i32),
}

/// Recognize and run a builtin. `argv[0]` decides; arguments are
/// everything after it.
pub fn dispatch(argv: &[String], dir_stack: &mut DirStack) -> BuiltinOutcome {
    let Some(name) = argv.first() else {
        return BuiltinOutcome::NotBuiltin;
    };
    match name.as_str() {
        "cd" => BuiltinOutcome::Handled(cd_cmd::run(&argv[1..])),
        "pushd" => BuiltinOutcome::Handled(dirs_cmd::run_pushd(&argv[1..], dir_stack)),
        "popd" => BuiltinOutcome::Handled(dirs_cmd::run_popd(&argv[1..], dir_stack)),
        _ => BuiltinOutcome::NotBuiltin,
    }
}

// ============================================================================
// Tests
// ============================================================================
