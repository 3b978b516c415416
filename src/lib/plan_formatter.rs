//! Plan formatting
//!
//! Renders a `CommandPlan` for display:
//! - text: one shell-quoted command per line
//! - json: the plan with the account, transition and capabilities it was built for

use serde_json::{json, Value};

use crate::account_spec::AccountSpec;
use crate::capabilities::PlatformCapabilities;
use crate::invocation::CommandPlan;

/// Valid output formats for `--output-format`
pub const VALID_OUTPUT_FORMATS: [&str; 2] = ["text", "json"];

/// One command per line; an empty plan says so
pub fn format_plan_as_text(plan: &CommandPlan) -> String {
    if plan.is_empty() {
        return "Nothing to do".to_string();
    }
    plan.iter()
        .map(|inv| inv.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn plan_to_json(
    spec: &AccountSpec,
    transition: &str,
    caps: &PlatformCapabilities,
    plan: &CommandPlan,
) -> Value {
    json!({
        "account": spec.name,
        "ensure": spec.ensure.as_str(),
        "transition": transition,
        "capabilities": caps,
        "commands": plan,
    })
}

pub fn format_plan_as_json(
    spec: &AccountSpec,
    transition: &str,
    caps: &PlatformCapabilities,
    plan: &CommandPlan,
) -> String {
    serde_json::to_string_pretty(&plan_to_json(spec, transition, caps, plan))
        .unwrap_or_else(|_| "{}".to_string())
}

/// Format in the requested format; unknown formats fall back to text
pub fn format_plan(
    format: &str,
    spec: &AccountSpec,
    transition: &str,
    caps: &PlatformCapabilities,
    plan: &CommandPlan,
) -> String {
    match format {
        "json" => format_plan_as_json(spec, transition, caps, plan),
        _ => format_plan_as_text(plan),
    }
}

/// Capabilities as `key value` lines
pub fn format_capabilities(caps: &PlatformCapabilities) -> String {
    [
        format!("supports_system_flag {}", caps.supports_system_flag),
        format!("supports_password_aging {}", caps.supports_password_aging),
        format!("operating_system_family {}", caps.operating_system_family),
    ]
    .join("\n")
}
