//! Declared account state
//!
//! `AccountSpec` is what a caller wants an account to look like. It is built
//! fresh for every request and never mutated by the planner.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// Date format accepted for `expiry_date`
pub const EXPIRY_FORMAT: &str = "%Y-%m-%d";

/// Target lifecycle state. Never rendered as a flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

impl Ensure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ensure::Present => "present",
            Ensure::Absent => "absent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "present" => Some(Ensure::Present),
            "absent" => Some(Ensure::Absent),
            _ => None,
        }
    }
}

/// A simple attribute translated through the property table (shell, groups, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredAttribute {
    pub name: String,
    pub value: String,
}

impl DeclaredAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Desired state of one account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSpec {
    pub name: String,
    pub ensure: Ensure,
    pub uid: Option<u32>,
    pub allow_duplicate_uid: bool,
    pub is_system_account: bool,
    pub manage_home_directory: bool,
    /// Must be >= 0 when present
    pub password_min_age: Option<i64>,
    /// Must be >= 0 when present
    pub password_max_age: Option<i64>,
    /// `YYYY-MM-DD`
    pub expiry_date: Option<String>,
    /// Further attributes, kept in declaration order
    pub properties: Vec<DeclaredAttribute>,
}

impl AccountSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(DeclaredAttribute::new(name, value));
        self
    }

    /// Load a spec from its JSON form
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn has_password_policy(&self) -> bool {
        self.password_min_age.is_some() || self.password_max_age.is_some()
    }

    /// Check the preconditions every synthesis operation relies on
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        check_age("password_min_age", self.password_min_age)?;
        check_age("password_max_age", self.password_max_age)?;
        if let Some(ref date) = self.expiry_date {
            validate_expiry(date)?;
        }
        self.check_unique_properties()
    }

    /// Each attribute may be declared once; `uid` counts the typed field
    fn check_unique_properties(&self) -> Result<()> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.properties.len() + 1);
        if self.uid.is_some() {
            seen.push("uid");
        }
        for property in &self.properties {
            if seen.contains(&property.name.as_str()) {
                return Err(PlanError::ConflictingAttribute(property.name.clone()));
            }
            seen.push(&property.name);
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PlanError::EmptyName);
    }
    if name.starts_with('-') || name.chars().any(|c| c.is_whitespace() || c == ':') {
        return Err(PlanError::InvalidName(name.to_string()));
    }
    Ok(())
}

pub(crate) fn check_age(field: &'static str, value: Option<i64>) -> Result<()> {
    match value {
        Some(v) if v < 0 => Err(PlanError::NegativePasswordAge { field, value: v }),
        _ => Ok(()),
    }
}

pub(crate) fn validate_expiry(date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, EXPIRY_FORMAT)
        .map(|_| ())
        .map_err(|_| PlanError::InvalidExpiry(date.to_string()))
}
