//! Platform-specific deviations
//!
//! Each entry names the OS families it applies to and the token it forces
//! when the declared value would otherwise produce nothing. New exceptions
//! go in `QUIRKS`; the synthesizer never checks a family itself.

use crate::capabilities::PlatformCapabilities;

/// Red Hat and its rebuilds, whose `useradd` creates homes unless told not to
pub const REDHAT_FAMILY: [&str; 8] = [
    "RedHat",
    "CentOS",
    "Fedora",
    "OracleLinux",
    "Scientific",
    "Rocky",
    "AlmaLinux",
    "Amazon",
];

/// What a quirk overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuirkKind {
    /// `manage_home_directory = false` must be spelled out
    HomeManagementFalse,
}

/// One table entry
#[derive(Debug, Clone, Copy)]
pub struct PlatformQuirk {
    pub kind: QuirkKind,
    pub families: &'static [&'static str],
    pub token: &'static str,
}

pub const QUIRKS: &[PlatformQuirk] = &[PlatformQuirk {
    kind: QuirkKind::HomeManagementFalse,
    families: &REDHAT_FAMILY,
    token: "-M",
}];

impl PlatformQuirk {
    /// Family names compare case-insensitively
    pub fn applies_to(&self, family: &str) -> bool {
        self.families.iter().any(|f| f.eq_ignore_ascii_case(family))
    }
}

/// Token forced by a quirk of `kind` on this platform, if any
pub fn quirk_token(kind: QuirkKind, caps: &PlatformCapabilities) -> Option<&'static str> {
    QUIRKS
        .iter()
        .find(|q| q.kind == kind && q.applies_to(&caps.operating_system_family))
        .map(|q| q.token)
}

/// `-M` on Red Hat derivatives, nothing elsewhere
pub fn home_management_false_flag(caps: &PlatformCapabilities) -> Option<&'static str> {
    quirk_token(QuirkKind::HomeManagementFalse, caps)
}

pub fn is_redhat_family(family: &str) -> bool {
    REDHAT_FAMILY.iter().any(|f| f.eq_ignore_ascii_case(family))
}
