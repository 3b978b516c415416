//! Executing planned invocations
//!
//! Planning never runs anything; this module is the process side. The
//! `CommandRunner` trait is the seam callers (and tests) substitute.

use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::invocation::{CommandInvocation, CommandPlan};

/// Result of running one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Whether the process exited successfully
    pub success: bool,
    /// Exit code, if the process ran to completion
    pub exit_code: Option<i32>,
    /// Message describing the result
    pub message: String,
    /// Captured standard output
    pub stdout: String,
}

/// Runs a single invocation, tokens passed in order
pub trait CommandRunner {
    fn run(&self, invocation: &CommandInvocation) -> ExecutionOutcome;
}

/// Runs invocations as local processes
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    /// Prefix every command with `sudo -n`
    pub use_sudo: bool,
}

impl SystemRunner {
    pub fn new(use_sudo: bool) -> Self {
        Self { use_sudo }
    }

    fn command_for(&self, invocation: &CommandInvocation) -> Command {
        if self.use_sudo {
            let mut cmd = Command::new("sudo");
            cmd.arg("-n").args(invocation.tokens());
            cmd
        } else {
            let mut cmd = Command::new(invocation.program());
            cmd.args(invocation.arguments());
            cmd
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &CommandInvocation) -> ExecutionOutcome {
        let mut cmd = self.command_for(invocation);
        cmd.stdin(Stdio::null());
        debug!(command = %invocation, sudo = self.use_sudo, "executing");

        match cmd.output() {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                if output.status.success() {
                    ExecutionOutcome {
                        success: true,
                        exit_code: output.status.code(),
                        message: format!("Ran {}", invocation.program()),
                        stdout,
                    }
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    ExecutionOutcome {
                        success: false,
                        exit_code: output.status.code(),
                        message: format!(
                            "{} failed: {}",
                            invocation.program(),
                            if stderr.trim().is_empty() {
                                "Unknown error"
                            } else {
                                stderr.trim()
                            }
                        ),
                        stdout,
                    }
                }
            }
            Err(e) => ExecutionOutcome {
                success: false,
                message: format!("Failed to run {}: {}", invocation.program(), e),
                ..Default::default()
            },
        }
    }
}

/// Run a plan in order, stopping at the first failure.
///
/// Returns the outcome of every invocation that was attempted.
pub fn apply_plan(runner: &dyn CommandRunner, plan: &CommandPlan) -> Vec<ExecutionOutcome> {
    let mut outcomes = Vec::with_capacity(plan.len());
    for invocation in plan {
        let outcome = runner.run(invocation);
        let failed = !outcome.success;
        if failed {
            warn!(command = %invocation, message = %outcome.message, "invocation failed");
        }
        outcomes.push(outcome);
        if failed {
            break;
        }
    }
    outcomes
}
