//! Command synthesis
//!
//! Assembles the argument lists for creating, modifying and deleting an
//! account, plus the separate password-aging call. Every operation is a pure
//! function of the declared account, the platform capabilities and the tool
//! paths; calling one twice yields identical invocations.
//!
//! Creation token order:
//!
//! ```text
//! <add> <declared properties...> <-o> <-m|-M> <"-e DATE"> <-r> <name>
//! ```
//!
//! The wrapped tools have always been called in this order, so it is kept
//! exactly.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::account_spec::{check_age, validate_expiry, AccountSpec, Ensure};
use crate::capabilities::PlatformCapabilities;
use crate::error::{PlanError, Result};
use crate::flag_mapper::{Attribute, FlagMapper};
use crate::invocation::{CommandInvocation, CommandPlan};
use crate::properties::PropertyTable;
use crate::tools::ToolPaths;

/// One changed attribute reported by the current-state diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    pub attribute: String,
    pub value: String,
}

impl AttributeChange {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Parse `attribute=value`
    pub fn parse(s: &str) -> Option<Self> {
        let (attribute, value) = s.split_once('=')?;
        let attribute = attribute.trim();
        if attribute.is_empty() {
            return None;
        }
        Some(Self::new(attribute, value))
    }
}

/// A lifecycle transition selected by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// absent -> present
    Create,
    /// present -> present, one invocation per change
    Modify(Vec<AttributeChange>),
    /// present -> absent
    Delete,
    /// absent -> absent, or present with nothing changed
    Unchanged,
}

impl Transition {
    /// Select the transition from the current and desired states
    pub fn between(current: Ensure, desired: Ensure, changes: Vec<AttributeChange>) -> Self {
        match (current, desired) {
            (Ensure::Absent, Ensure::Present) => Transition::Create,
            (Ensure::Present, Ensure::Absent) => Transition::Delete,
            (Ensure::Present, Ensure::Present) if !changes.is_empty() => {
                Transition::Modify(changes)
            }
            _ => Transition::Unchanged,
        }
    }
}

/// What a single-attribute modification targets
enum ModifyTarget {
    AccountTool,
    PasswordTool,
}

/// Builds invocations for one platform
#[derive(Debug, Clone, Copy)]
pub struct CommandSynthesizer<'a> {
    caps: &'a PlatformCapabilities,
    tools: &'a ToolPaths,
    properties: &'a PropertyTable,
}

impl<'a> CommandSynthesizer<'a> {
    pub fn new(
        caps: &'a PlatformCapabilities,
        tools: &'a ToolPaths,
        properties: &'a PropertyTable,
    ) -> Self {
        Self {
            caps,
            tools,
            properties,
        }
    }

    fn mapper(&self) -> FlagMapper<'a> {
        FlagMapper::new(self.caps, self.properties)
    }

    /// Generic `-<flag> <value>` pairs for creation, uid first, then the
    /// declared properties in order. `ensure` is dropped before mapping.
    fn property_flags(&self, spec: &AccountSpec) -> Result<Vec<String>> {
        let mapper = self.mapper();
        let mut tokens = Vec::new();
        if let Some(uid) = spec.uid {
            tokens.extend(mapper.flags_for(Attribute::Uid(uid))?);
        }
        for property in spec.properties.iter().filter(|p| p.name != "ensure") {
            tokens.extend(mapper.flags_for(Attribute::Declared {
                name: &property.name,
                value: &property.value,
            })?);
        }
        Ok(tokens)
    }

    /// The add-tool invocation
    pub fn build_create(&self, spec: &AccountSpec) -> Result<CommandInvocation> {
        spec.validate()?;
        let mapper = self.mapper();

        let mut cmd = CommandInvocation::new(&self.tools.add)
            .args(self.property_flags(spec)?)
            .args(mapper.flags_for(Attribute::AllowDuplicateUid(spec.allow_duplicate_uid))?)
            .args(mapper.flags_for(Attribute::ManageHome(spec.manage_home_directory))?);
        if let Some(ref date) = spec.expiry_date {
            cmd = cmd.args(mapper.flags_for(Attribute::Expiry(date))?);
        }
        let cmd = cmd
            .args(mapper.flags_for(Attribute::SystemAccount(spec.is_system_account))?)
            .arg(&spec.name);

        debug!(account = %spec.name, command = %cmd, "synthesized create");
        Ok(cmd)
    }

    /// One invocation changing a single attribute to `value`.
    ///
    /// Password ages go through the password tool; everything else through
    /// the modify tool. A uid change carries `-o` after `-u N` when the
    /// account allows duplicate uids.
    ///
    /// Returns `None` for a password age on a platform without a
    /// password-aging tool: the change is dropped, like the creation-time
    /// policy, and the rest of a plan is unaffected.
    pub fn build_modify_attribute(
        &self,
        spec: &AccountSpec,
        attribute: &str,
        value: &str,
    ) -> Result<Option<CommandInvocation>> {
        spec.validate()?;
        let mapper = self.mapper();

        let (target, flags) = match attribute {
            "ensure" | "allow_duplicate_uid" | "is_system_account" | "manage_home_directory" => {
                return Err(PlanError::UnsupportedModification(attribute.to_string()));
            }
            "uid" => {
                let uid = parse_value::<u32>(attribute, value)?;
                let mut flags = mapper.flags_for(Attribute::Uid(uid))?;
                flags.extend(mapper.flags_for(Attribute::AllowDuplicateUid(
                    spec.allow_duplicate_uid,
                ))?);
                (ModifyTarget::AccountTool, flags)
            }
            "expiry_date" => {
                validate_expiry(value)?;
                (
                    ModifyTarget::AccountTool,
                    mapper.flags_for(Attribute::Expiry(value))?,
                )
            }
            "password_min_age" => {
                match self.age_flags(spec, "password_min_age", value, Attribute::PasswordMinAge)? {
                    Some(flags) => (ModifyTarget::PasswordTool, flags),
                    None => return Ok(None),
                }
            }
            "password_max_age" => {
                match self.age_flags(spec, "password_max_age", value, Attribute::PasswordMaxAge)? {
                    Some(flags) => (ModifyTarget::PasswordTool, flags),
                    None => return Ok(None),
                }
            }
            name => (
                ModifyTarget::AccountTool,
                mapper.flags_for(Attribute::Declared { name, value })?,
            ),
        };

        let program = match target {
            ModifyTarget::AccountTool => &self.tools.modify,
            ModifyTarget::PasswordTool => &self.tools.password,
        };
        let cmd = CommandInvocation::new(program).args(flags).arg(&spec.name);

        debug!(account = %spec.name, attribute, command = %cmd, "synthesized modify");
        Ok(Some(cmd))
    }

    /// Flags for a password-age change; `None` when the platform cannot age
    /// passwords. The value is checked either way.
    fn age_flags(
        &self,
        spec: &AccountSpec,
        field: &'static str,
        value: &str,
        attribute: fn(i64) -> Attribute<'static>,
    ) -> Result<Option<Vec<String>>> {
        let days = parse_value::<i64>(field, value)?;
        check_age(field, Some(days))?;
        if !self.caps.supports_password_aging {
            warn!(account = %spec.name, field, "password aging unsupported; dropping change");
            return Ok(None);
        }
        self.mapper().flags_for(attribute(days)).map(Some)
    }

    /// The delete-tool invocation; `-r` also removes a managed home
    pub fn build_delete(&self, spec: &AccountSpec) -> Result<CommandInvocation> {
        spec.validate()?;
        let mut cmd = CommandInvocation::new(&self.tools.delete);
        if spec.manage_home_directory {
            cmd = cmd.arg("-r");
        }
        let cmd = cmd.arg(&spec.name);

        debug!(account = %spec.name, command = %cmd, "synthesized delete");
        Ok(cmd)
    }

    /// The password-aging invocation, or `None` when no age is declared or
    /// the platform has no password-aging tool
    pub fn build_password_policy(&self, spec: &AccountSpec) -> Result<Option<CommandInvocation>> {
        spec.validate()?;
        if !spec.has_password_policy() {
            return Ok(None);
        }
        if !self.caps.supports_password_aging {
            warn!(account = %spec.name, "password aging unsupported; skipping policy");
            return Ok(None);
        }

        let mapper = self.mapper();
        let mut cmd = CommandInvocation::new(&self.tools.password);
        if let Some(min) = spec.password_min_age {
            cmd = cmd.args(mapper.flags_for(Attribute::PasswordMinAge(min))?);
        }
        if let Some(max) = spec.password_max_age {
            cmd = cmd.args(mapper.flags_for(Attribute::PasswordMaxAge(max))?);
        }
        let cmd = cmd.arg(&spec.name);

        debug!(account = %spec.name, command = %cmd, "synthesized password policy");
        Ok(Some(cmd))
    }

    /// Account creation followed by the optional password policy
    pub fn plan_create(&self, spec: &AccountSpec) -> Result<CommandPlan> {
        let mut plan = CommandPlan::new();
        plan.push(self.build_create(spec)?);
        plan.extend(self.build_password_policy(spec)?);
        Ok(plan)
    }

    /// One invocation per change, in the order given. Changes the platform
    /// cannot apply are left out.
    pub fn plan_modify(&self, spec: &AccountSpec, changes: &[AttributeChange]) -> Result<CommandPlan> {
        let mut plan = CommandPlan::new();
        for change in changes {
            plan.extend(self.build_modify_attribute(spec, &change.attribute, &change.value)?);
        }
        Ok(plan)
    }

    pub fn plan_delete(&self, spec: &AccountSpec) -> Result<CommandPlan> {
        Ok(CommandPlan::from(vec![self.build_delete(spec)?]))
    }

    /// Render a selected transition
    pub fn plan_transition(&self, spec: &AccountSpec, transition: &Transition) -> Result<CommandPlan> {
        match transition {
            Transition::Create => self.plan_create(spec),
            Transition::Modify(changes) => self.plan_modify(spec, changes),
            Transition::Delete => self.plan_delete(spec),
            Transition::Unchanged => Ok(CommandPlan::new()),
        }
    }
}

fn parse_value<T: std::str::FromStr>(attribute: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| PlanError::InvalidValue {
        attribute: attribute.to_string(),
        value: value.to_string(),
    })
}
