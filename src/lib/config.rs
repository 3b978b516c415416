//! Configuration from environment variables

use std::env;

use crate::tools::ToolPaths;

/// Runtime settings for the CLI
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Verbose/debug logging (`USERADD_PLAN_DEBUG`)
    pub debug: bool,
    /// Prefix executed commands with `sudo -n` (`USERADD_PLAN_SUDO`)
    pub use_sudo: bool,
    /// Tool paths, with `USERADD_PLAN_USERADD` etc. applied
    pub tools: ToolPaths,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            debug: env_flag("USERADD_PLAN_DEBUG"),
            use_sudo: env_flag("USERADD_PLAN_SUDO"),
            tools: ToolPaths::from_env(),
        }
    }
}

/// `1` or `true` (any case) turns a flag on
pub fn env_flag(key: &str) -> bool {
    env::var(key).is_ok_and(|v| is_truthy(&v))
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
