//! Executable paths for the four account tools

use std::env;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ADD_TOOL: &str = "/usr/sbin/useradd";
pub const DEFAULT_MODIFY_TOOL: &str = "/usr/sbin/usermod";
pub const DEFAULT_DELETE_TOOL: &str = "/usr/sbin/userdel";
pub const DEFAULT_PASSWORD_TOOL: &str = "/usr/bin/chage";

/// Resolved executables; each becomes the first token of its invocations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPaths {
    pub add: String,
    pub modify: String,
    pub delete: String,
    pub password: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            add: DEFAULT_ADD_TOOL.to_string(),
            modify: DEFAULT_MODIFY_TOOL.to_string(),
            delete: DEFAULT_DELETE_TOOL.to_string(),
            password: DEFAULT_PASSWORD_TOOL.to_string(),
        }
    }
}

impl ToolPaths {
    /// Defaults, overridden by `USERADD_PLAN_USERADD`, `USERADD_PLAN_USERMOD`,
    /// `USERADD_PLAN_USERDEL` and `USERADD_PLAN_CHAGE`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            add: env_or("USERADD_PLAN_USERADD", defaults.add),
            modify: env_or("USERADD_PLAN_USERMOD", defaults.modify),
            delete: env_or("USERADD_PLAN_USERDEL", defaults.delete),
            password: env_or("USERADD_PLAN_CHAGE", defaults.password),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}
