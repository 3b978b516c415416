//! Argument parser for useradd-plan
//!
//! Usage: useradd-plan [options] <name>
//!
//! Options:
//! --ensure <present|absent>     Desired state (default: present)
//! --current <present|absent>    Current state (default: opposite of --ensure)
//! --uid <n>                     User id
//! --allowdupe, -o               Allow a duplicate uid
//! --system, -r                  Create a system account
//! --managehome, -m              Manage the home directory
//! --password-min-age <days>     Minimum password age
//! --password-max-age <days>     Maximum password age
//! --expiry <YYYY-MM-DD>         Account expiry date
//! --shell, --comment, --home, --gid, --groups <value>
//! --property <attr>=<value>     Any other declared property
//! --modify <attr>=<value>       Render a modification (repeatable)
//! --spec-file <path>            Read the account from JSON
//! --output-format <text|json>   Output format (default: text)
//! --apply                       Execute the plan
//! --show-capabilities           Print detected capabilities and exit

use std::fs;

use crate::account_spec::{AccountSpec, DeclaredAttribute, Ensure};
use crate::plan_formatter::VALID_OUTPUT_FORMATS;
use crate::synthesizer::AttributeChange;

/// Properties with a dedicated option
const PROPERTY_OPTIONS: [(&str, &str); 5] = [
    ("--shell", "shell"),
    ("--comment", "comment"),
    ("--home", "home"),
    ("--gid", "gid"),
    ("--groups", "groups"),
];

/// Parsed command line
#[derive(Debug, Clone, Default)]
pub struct ParsedArgs {
    /// Declared account
    pub spec: AccountSpec,
    /// Current state, when given explicitly
    pub current: Option<Ensure>,
    /// Requested modifications
    pub modifications: Vec<AttributeChange>,
    /// Output format (text or json)
    pub output_format: String,
    /// Execute instead of only printing
    pub apply: bool,
    /// Print capabilities and exit
    pub show_capabilities: bool,
    /// Print usage and exit
    pub help: bool,
}

/// Parse command line arguments (without the program name)
pub fn parse_args(args: &[String]) -> Result<ParsedArgs, String> {
    let mut parsed = ParsedArgs {
        output_format: "text".to_string(),
        ..Default::default()
    };
    let mut name: Option<String> = None;
    let mut spec_file: Option<String> = None;
    let mut overrides = AccountSpec::default();
    let mut ensure: Option<Ensure> = None;

    let mut i = 0;
    while i < args.len() {
        let (option, inline) = split_inline(&args[i]);
        let consumed = match option {
            "--help" | "-h" => {
                parsed.help = true;
                1
            }
            "--allowdupe" | "-o" => {
                overrides.allow_duplicate_uid = true;
                1
            }
            "--system" | "-r" => {
                overrides.is_system_account = true;
                1
            }
            "--managehome" | "-m" => {
                overrides.manage_home_directory = true;
                1
            }
            "--apply" => {
                parsed.apply = true;
                1
            }
            "--show-capabilities" => {
                parsed.show_capabilities = true;
                1
            }
            "--ensure" | "--current" => {
                let (value, n) = take_value(args, i, inline)?;
                let state = Ensure::parse(&value).ok_or_else(|| {
                    format!("Option {} expects present or absent, got '{}'", option, value)
                })?;
                if option == "--ensure" {
                    ensure = Some(state);
                } else {
                    parsed.current = Some(state);
                }
                n
            }
            "--uid" => {
                let (value, n) = take_value(args, i, inline)?;
                overrides.uid = Some(parse_number(option, &value)?);
                n
            }
            "--password-min-age" => {
                let (value, n) = take_value(args, i, inline)?;
                overrides.password_min_age = Some(parse_number(option, &value)?);
                n
            }
            "--password-max-age" => {
                let (value, n) = take_value(args, i, inline)?;
                overrides.password_max_age = Some(parse_number(option, &value)?);
                n
            }
            "--expiry" => {
                let (value, n) = take_value(args, i, inline)?;
                overrides.expiry_date = Some(value);
                n
            }
            "--property" | "--modify" => {
                let (value, n) = take_value(args, i, inline)?;
                let change = AttributeChange::parse(&value).ok_or_else(|| {
                    format!("Option {} expects <attribute>=<value>, got '{}'", option, value)
                })?;
                if option == "--modify" {
                    parsed.modifications.push(change);
                } else {
                    overrides
                        .properties
                        .push(DeclaredAttribute::new(change.attribute, change.value));
                }
                n
            }
            "--spec-file" => {
                let (value, n) = take_value(args, i, inline)?;
                spec_file = Some(value);
                n
            }
            "--output-format" => {
                let (value, n) = take_value(args, i, inline)?;
                parsed.output_format = value.to_lowercase();
                n
            }
            _ => {
                if let Some((_, property)) = PROPERTY_OPTIONS.iter().find(|(o, _)| *o == option) {
                    let (value, n) = take_value(args, i, inline)?;
                    overrides
                        .properties
                        .push(DeclaredAttribute::new(*property, value));
                    n
                } else if option.starts_with('-') {
                    return Err(format!("Unknown option: {}", args[i]));
                } else if name.is_some() {
                    return Err(format!("Unexpected argument: {}", args[i]));
                } else {
                    name = Some(args[i].clone());
                    1
                }
            }
        };
        i += consumed;
    }

    let mut spec = match spec_file {
        Some(path) => load_spec_file(&path)?,
        None => AccountSpec::default(),
    };
    merge(&mut spec, overrides);
    if let Some(name) = name {
        spec.name = name;
    }
    if let Some(state) = ensure {
        spec.ensure = state;
    }
    parsed.spec = spec;

    validate_options(&parsed)?;
    Ok(parsed)
}

/// `--opt=value` splits into the option and its inline value
fn split_inline(arg: &str) -> (&str, Option<&str>) {
    if arg.starts_with("--") {
        if let Some((option, value)) = arg.split_once('=') {
            return (option, Some(value));
        }
    }
    (arg, None)
}

/// Value for the option at `index`, and how many arguments it used
fn take_value(
    args: &[String],
    index: usize,
    inline: Option<&str>,
) -> Result<(String, usize), String> {
    if let Some(value) = inline {
        return Ok((value.to_string(), 1));
    }
    match args.get(index + 1) {
        Some(next) if !next.starts_with("--") => Ok((next.clone(), 2)),
        _ => Err(format!("Option {} requires a value", args[index])),
    }
}

fn parse_number<T: std::str::FromStr>(option: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("Option {} expects a number, got '{}'", option, value))
}

/// Read an `AccountSpec` from a JSON file
pub fn load_spec_file(path: &str) -> Result<AccountSpec, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Cannot read spec file {}: {}", path, e))?;
    AccountSpec::from_json(&content).map_err(|e| format!("Invalid spec file {}: {}", path, e))
}

/// Command line values win over the spec file
fn merge(spec: &mut AccountSpec, overrides: AccountSpec) {
    spec.allow_duplicate_uid |= overrides.allow_duplicate_uid;
    spec.is_system_account |= overrides.is_system_account;
    spec.manage_home_directory |= overrides.manage_home_directory;
    if overrides.uid.is_some() {
        spec.uid = overrides.uid;
    }
    if overrides.password_min_age.is_some() {
        spec.password_min_age = overrides.password_min_age;
    }
    if overrides.password_max_age.is_some() {
        spec.password_max_age = overrides.password_max_age;
    }
    if overrides.expiry_date.is_some() {
        spec.expiry_date = overrides.expiry_date;
    }
    for property in overrides.properties {
        match spec.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => existing.value = property.value,
            None => spec.properties.push(property),
        }
    }
}

/// Validate the combination of options
pub fn validate_options(parsed: &ParsedArgs) -> Result<(), String> {
    if !VALID_OUTPUT_FORMATS.contains(&parsed.output_format.as_str()) {
        return Err(format!(
            "Invalid output format: {}. Valid formats: {}",
            parsed.output_format,
            VALID_OUTPUT_FORMATS.join(", ")
        ));
    }
    if parsed.help || parsed.show_capabilities {
        return Ok(());
    }
    if parsed.spec.name.is_empty() {
        return Err("An account name is required".to_string());
    }
    if !parsed.modifications.is_empty() && parsed.spec.ensure == Ensure::Absent {
        return Err("--modify cannot be combined with --ensure absent".to_string());
    }
    if !parsed.modifications.is_empty() && parsed.current == Some(Ensure::Absent) {
        return Err("--modify needs an existing account, not --current absent".to_string());
    }
    Ok(())
}

/// Usage text
pub fn usage() -> &'static str {
    "Usage: useradd-plan [options] <name>

Options:
  --ensure <present|absent>     Desired state (default: present)
  --current <present|absent>    Current state (default: opposite of --ensure)
  --uid <n>                     User id
  --allowdupe, -o               Allow a duplicate uid
  --system, -r                  Create a system account
  --managehome, -m              Manage the home directory
  --password-min-age <days>     Minimum password age
  --password-max-age <days>     Maximum password age
  --expiry <YYYY-MM-DD>         Account expiry date
  --shell <path>                Login shell
  --comment <text>              GECOS comment
  --home <dir>                  Home directory
  --gid <group>                 Primary group
  --groups <list>               Supplementary groups
  --property <attr>=<value>     Any other declared property
  --modify <attr>=<value>       Render a modification (repeatable)
  --spec-file <path>            Read the account from JSON
  --output-format <text|json>   Output format (default: text)
  --apply                       Execute the plan
  --show-capabilities           Print detected capabilities and exit"
}
