//! Attribute flag mapper
//!
//! Turns one declared attribute into the tokens the account tools expect.
//! The mapper does not know which command is being built; ordering between
//! attributes is the synthesizer's job.

use tracing::warn;

use crate::capabilities::PlatformCapabilities;
use crate::error::Result;
use crate::platform_quirks::home_management_false_flag;
use crate::properties::PropertyTable;

/// A single attribute with its declared value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute<'a> {
    AllowDuplicateUid(bool),
    SystemAccount(bool),
    ManageHome(bool),
    Uid(u32),
    /// `YYYY-MM-DD`
    Expiry(&'a str),
    PasswordMinAge(i64),
    PasswordMaxAge(i64),
    /// Anything else, resolved through the property table
    Declared { name: &'a str, value: &'a str },
}

/// Maps attributes to flags for one platform
#[derive(Debug, Clone, Copy)]
pub struct FlagMapper<'a> {
    caps: &'a PlatformCapabilities,
    properties: &'a PropertyTable,
}

impl<'a> FlagMapper<'a> {
    pub fn new(caps: &'a PlatformCapabilities, properties: &'a PropertyTable) -> Self {
        Self { caps, properties }
    }

    /// Tokens for `attribute`; empty when it contributes nothing
    pub fn flags_for(&self, attribute: Attribute<'_>) -> Result<Vec<String>> {
        let tokens = match attribute {
            Attribute::AllowDuplicateUid(allow) => duplicate_uid_flags(allow),
            Attribute::SystemAccount(system) => system_account_flags(system, self.caps),
            Attribute::ManageHome(manage) => home_flags(manage, self.caps),
            Attribute::Uid(uid) => vec!["-u".to_string(), uid.to_string()],
            Attribute::Expiry(date) => vec![expiry_token(date)],
            Attribute::PasswordMinAge(days) => vec!["-m".to_string(), days.to_string()],
            Attribute::PasswordMaxAge(days) => vec!["-M".to_string(), days.to_string()],
            Attribute::Declared { name, value } => {
                let flag = self.properties.require_flag(name)?;
                vec![flag.to_string(), value.to_string()]
            }
        };
        Ok(tokens)
    }
}

/// `-o` when duplicate uids are allowed
pub fn duplicate_uid_flags(allow: bool) -> Vec<String> {
    if allow {
        vec!["-o".to_string()]
    } else {
        Vec::new()
    }
}

/// `-r` for system accounts, only where the add tool supports it
pub fn system_account_flags(system: bool, caps: &PlatformCapabilities) -> Vec<String> {
    if !system {
        return Vec::new();
    }
    if !caps.supports_system_flag {
        warn!(
            os_family = %caps.operating_system_family,
            "system accounts are not supported by this platform's add tool; omitting -r"
        );
        return Vec::new();
    }
    vec!["-r".to_string()]
}

/// `-m` when home is managed, otherwise whatever the platform quirks demand
pub fn home_flags(manage: bool, caps: &PlatformCapabilities) -> Vec<String> {
    if manage {
        return vec!["-m".to_string()];
    }
    home_management_false_flag(caps)
        .map(|token| vec![token.to_string()])
        .unwrap_or_default()
}

/// Flag and date in one argument, as the add tool has always been called
pub fn expiry_token(date: &str) -> String {
    format!("-e {}", date)
}
