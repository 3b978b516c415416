//! Platform capability detection
//!
//! Works out, once per process, which optional account-management features
//! the host toolchain offers:
//! - system accounts: the add tool understands `-r, --system`
//! - password aging: the password tool (`chage`) is installed
//! - operating system family, for the platform quirk table
//!
//! Detection only reads; a missing tool or file means `false`, never an error.

use std::env;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tools::ToolPaths;

/// Environment variable overriding the detected OS family
pub const OS_FAMILY_ENV: &str = "USERADD_PLAN_OS_FAMILY";

const OS_RELEASE_PATH: &str = "/etc/os-release";

/// os-release `ID` values and the family names the quirk table matches on
const OS_RELEASE_IDS: [(&str, &str); 12] = [
    ("rhel", "RedHat"),
    ("centos", "CentOS"),
    ("fedora", "Fedora"),
    ("ol", "OracleLinux"),
    ("scientific", "Scientific"),
    ("rocky", "Rocky"),
    ("almalinux", "AlmaLinux"),
    ("amzn", "Amazon"),
    ("debian", "Debian"),
    ("ubuntu", "Ubuntu"),
    ("sles", "SLES"),
    ("arch", "Archlinux"),
];

/// Optional features of the host toolchain. Immutable once detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCapabilities {
    pub supports_system_flag: bool,
    pub supports_password_aging: bool,
    pub operating_system_family: String,
}

impl PlatformCapabilities {
    pub fn new(
        supports_system_flag: bool,
        supports_password_aging: bool,
        operating_system_family: impl Into<String>,
    ) -> Self {
        Self {
            supports_system_flag,
            supports_password_aging,
            operating_system_family: operating_system_family.into(),
        }
    }
}

/// Inspect the host using the given tool paths
pub fn detect_with(tools: &ToolPaths) -> PlatformCapabilities {
    let supports_system_flag = tool_help(&tools.add)
        .map(|help| help_lists_system_flag(&help))
        .unwrap_or(false);
    let supports_password_aging = is_command_available(&tools.password);
    let operating_system_family = detect_os_family();

    let caps = PlatformCapabilities {
        supports_system_flag,
        supports_password_aging,
        operating_system_family,
    };
    debug!(?caps, "detected platform capabilities");
    caps
}

/// Inspect the host, resolving tool paths from the environment
pub fn detect() -> PlatformCapabilities {
    detect_with(&ToolPaths::from_env())
}

/// Capabilities detected on first use and shared for the rest of the process
pub fn detected() -> &'static PlatformCapabilities {
    static CAPS: OnceLock<PlatformCapabilities> = OnceLock::new();
    CAPS.get_or_init(detect)
}

/// Check if a command is available, either as a path or on `PATH`
pub fn is_command_available(command: &str) -> bool {
    if command.contains('/') {
        return Path::new(command).is_file();
    }
    Command::new("which")
        .arg(command)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Combined `--help` output of a tool; `useradd` prints usage to either stream
fn tool_help(tool: &str) -> Option<String> {
    if !is_command_available(tool) {
        return None;
    }
    let output = Command::new(tool)
        .arg("--help")
        .stdin(Stdio::null())
        .output()
        .ok()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    Some(format!("{}{}", stdout, stderr))
}

/// Whether usage text advertises the `-r, --system` option
pub fn help_lists_system_flag(help: &str) -> bool {
    Regex::new(r"(?m)^\s*-r,\s+--system\b")
        .map(|re| re.is_match(help))
        .unwrap_or(false)
}

fn detect_os_family() -> String {
    if let Ok(family) = env::var(OS_FAMILY_ENV) {
        if !family.trim().is_empty() {
            return family.trim().to_string();
        }
    }
    fs::read_to_string(OS_RELEASE_PATH)
        .ok()
        .and_then(|content| parse_os_release(&content))
        .unwrap_or_else(|| env::consts::OS.to_string())
}

/// Family name from `/etc/os-release` content.
///
/// Known `ID`s map to their conventional family name; anything else falls
/// back to `NAME`, then to the raw `ID`.
pub fn parse_os_release(content: &str) -> Option<String> {
    let mut id = None;
    let mut name = None;
    for line in content.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'');
        match key {
            "ID" => id = Some(value.to_lowercase()),
            "NAME" => name = Some(value.to_string()),
            _ => {}
        }
    }

    if let Some(ref id) = id {
        if let Some((_, family)) = OS_RELEASE_IDS.iter().find(|(known, _)| *known == id.as_str()) {
            return Some((*family).to_string());
        }
    }
    name.or(id).filter(|s| !s.is_empty())
}
