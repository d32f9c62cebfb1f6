//! Directory Stack Builtins: pushd, popd
//!
//! pushd dir - chdir to `dir`, pushing the previous cwd
//! popd      - pop the most recent entry and chdir back to it
//!
//! Both report the new working directory followed by the remaining
//! stack, top to bottom, on a single stdout line.

use std::path::Path;

use nix::unistd::{chdir, getcwd};

use crate::interpreter::dir_stack::DirStack;
use crate::interpreter::status;

pub fn run_pushd(args: &[String], stack: &mut DirStack) -> i32 {
    let [dir] = args else {
        eprintln!("pushd: expected exactly one directory argument");
        return 1;
    };

    let prev = match getcwd() {
        Ok(cwd) => cwd,
        Err(errno) => {
            eprintln!("pushd: getcwd: {}", errno.desc());
            return status::clamp(errno as i32);
        }
    };

    // chdir first: a failed pushd must leave the stack untouched.
    if let Err(errno) = chdir(Path::new(dir)) {
        eprintln!("pushd: {}: {}", dir, errno.desc());
        return status::clamp(errno as i32);
    }

    stack.push(prev);
    report(stack)
}

pub fn run_popd(args: &[String], stack: &mut DirStack) -> i32 {
    if !args.is_empty() {
        eprintln!("popd: too many arguments");
        return 1;
    }

    let Some(target) = stack.pop() else {
        eprintln!("popd: directory stack empty");
        return 1;
    };

    // The popped entry is consumed even when the chdir fails.
    if let Err(errno) = chdir(target.as_path()) {
        eprintln!("popd: {}: {}", target.display(), errno.desc());
        return status::clamp(errno as i32);
    }

    report(stack)
}

/// Print the new cwd plus the stack contents on stdout.
fn report(stack: &DirStack) -> i32 {
    match getcwd() {
        Ok(cwd) => {
            println!("{}", stack.render_line(&cwd));
            0
        }
        Err(errno) => {
            eprintln!("getcwd: {}", errno.desc());
            status::clamp(errno as i32)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
