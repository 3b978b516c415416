//! useradd-plan CLI
//!
//! Prints (and optionally runs) the commands that bring one account to its
//! declared state:
//! - creation with useradd, then chage for password aging
//! - one usermod/chage call per modified attribute
//! - deletion with userdel

use std::env;
use std::process;

use tracing::debug;
use tracing_subscriber::EnvFilter;
use useradd_planner::{
    apply_plan, detected, format_capabilities, format_plan, parse_args, usage, CommandSynthesizer,
    Config, Ensure, ParsedArgs, PropertyTable, SystemRunner, Transition,
};

fn init_logging(config: &Config) {
    let default_level = if config.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

/// Current state defaults to the opposite of the desired one, except when
/// modifications are requested (the account must already exist)
fn select_transition(parsed: &ParsedArgs) -> Transition {
    let desired = parsed.spec.ensure;
    let current = parsed.current.unwrap_or(if !parsed.modifications.is_empty() {
        Ensure::Present
    } else {
        match desired {
            Ensure::Present => Ensure::Absent,
            Ensure::Absent => Ensure::Present,
        }
    });
    Transition::between(current, desired, parsed.modifications.clone())
}

fn transition_name(transition: &Transition) -> &'static str {
    match transition {
        Transition::Create => "create",
        Transition::Modify(_) => "modify",
        Transition::Delete => "delete",
        Transition::Unchanged => "unchanged",
    }
}

fn main() {
    let config = Config::from_env();
    init_logging(&config);

    let args: Vec<String> = env::args().skip(1).collect();
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("{}", usage());
            process::exit(1);
        }
    };

    if parsed.help {
        println!("{}", usage());
        return;
    }

    let caps = detected();
    if parsed.show_capabilities {
        println!("{}", format_capabilities(caps));
        return;
    }

    let properties = PropertyTable::default();
    let synthesizer = CommandSynthesizer::new(caps, &config.tools, &properties);
    let transition = select_transition(&parsed);
    debug!(account = %parsed.spec.name, transition = transition_name(&transition), "planning");

    let plan = match synthesizer.plan_transition(&parsed.spec, &transition) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    println!(
        "{}",
        format_plan(
            &parsed.output_format,
            &parsed.spec,
            transition_name(&transition),
            caps,
            &plan
        )
    );

    if !parsed.apply {
        return;
    }

    let runner = SystemRunner::new(config.use_sudo);
    let outcomes = apply_plan(&runner, &plan);
    let mut failed = false;
    for outcome in &outcomes {
        if outcome.success {
            eprintln!("{}", outcome.message);
        } else {
            eprintln!("Error: {}", outcome.message);
            failed = true;
        }
    }
    if failed {
        process::exit(1);
    }
}
