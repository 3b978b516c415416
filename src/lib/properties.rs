//! Declared-property table
//!
//! Maps the simple account attributes to the flag the add/modify tools take
//! for them. Attributes with their own rules (duplicate uid, system account,
//! home management, expiry, password ages) and `ensure` are not listed here
//! and never reach the generic path.

use crate::error::{PlanError, Result};

/// Attributes that are not plain `-<flag> <value>` properties
pub const SPECIAL_ATTRIBUTES: [&str; 7] = [
    "ensure",
    "allow_duplicate_uid",
    "is_system_account",
    "manage_home_directory",
    "expiry_date",
    "password_min_age",
    "password_max_age",
];

/// Attribute name to flag identifier
#[derive(Debug, Clone)]
pub struct PropertyTable {
    entries: Vec<(String, String)>,
}

impl Default for PropertyTable {
    /// Flags understood by shadow-utils `useradd`/`usermod`
    fn default() -> Self {
        Self::new()
            .with("uid", "-u")
            .with("gid", "-g")
            .with("comment", "-c")
            .with("home", "-d")
            .with("shell", "-s")
            .with("groups", "-G")
    }
}

impl PropertyTable {
    /// An empty table
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add or replace a mapping. Special attributes are ignored.
    pub fn with(mut self, attribute: &str, flag: &str) -> Self {
        if is_special(attribute) {
            return self;
        }
        match self.entries.iter_mut().find(|(name, _)| name == attribute) {
            Some(entry) => entry.1 = flag.to_string(),
            None => self.entries.push((attribute.to_string(), flag.to_string())),
        }
        self
    }

    pub fn flag(&self, attribute: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, flag)| flag.as_str())
    }

    /// Like `flag`, but unknown attributes are an error
    pub fn require_flag(&self, attribute: &str) -> Result<&str> {
        self.flag(attribute)
            .ok_or_else(|| PlanError::UnknownProperty(attribute.to_string()))
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

pub fn is_special(attribute: &str) -> bool {
    SPECIAL_ATTRIBUTES.contains(&attribute)
}
