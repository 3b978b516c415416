//! useradd-planner library
//!
//! Translates a declared account (uid, home management, system flag,
//! password aging, ...) into the useradd/usermod/userdel/chage invocations
//! that realize it on the running platform.

pub mod account_spec;
pub mod args_parser;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod flag_mapper;
pub mod invocation;
pub mod plan_formatter;
pub mod platform_quirks;
pub mod properties;
pub mod runner;
pub mod synthesizer;
pub mod tools;

// Re-export commonly used items
pub use account_spec::{AccountSpec, DeclaredAttribute, Ensure};
pub use args_parser::{parse_args, usage, validate_options, ParsedArgs};
pub use capabilities::{detect, detect_with, detected, is_command_available, PlatformCapabilities};
pub use config::Config;
pub use error::PlanError;
pub use flag_mapper::{Attribute, FlagMapper};
pub use invocation::{CommandInvocation, CommandPlan};
pub use plan_formatter::{
    format_capabilities, format_plan, format_plan_as_json, format_plan_as_text,
    VALID_OUTPUT_FORMATS,
};
pub use platform_quirks::home_management_false_flag;
pub use properties::PropertyTable;
pub use runner::{apply_plan, CommandRunner, ExecutionOutcome, SystemRunner};
pub use synthesizer::{AttributeChange, CommandSynthesizer, Transition};
pub use tools::ToolPaths;
