//! Demonstration binary for the cliopt option parser.
//!
//! Registers a small but representative option table, processes the real
//! command line and prints what it found. Run with `--help` for the
//! rendered usage screen, or set `RUST_LOG=debug` to watch the decoder.

use std::process::ExitCode;

use cliopt_core::{OptionManager, OptionSpec, ValueKind};

fn build_manager() -> cliopt_core::Result<OptionManager> {
    let mut manager = OptionManager::from_env();
    manager.set_credits("cliopt demo");
    manager.set_usage("cliopt-demo [options] [files...]");

    manager.register(
        OptionSpec::new("help")?
            .with_alias("h")
            .with_id(1)
            .exclusive()?
            .with_description("Show this help screen."),
    )?;
    manager.register(
        OptionSpec::new("verbose")?
            .with_alias("v")
            .with_id(2)
            .multiple()?
            .with_description("Increase verbosity (may be repeated)."),
    )?;
    manager.register(
        OptionSpec::new("level")?
            .with_alias("l")
            .with_id(3)
            .with_kind(ValueKind::String)
            .argument_required()
            .valid_values(["warning", "error"])
            .with_description("Set the diagnostic level."),
    )?;
    manager.register(
        OptionSpec::new("count")?
            .with_id(4)
            .with_kind(ValueKind::Integer)
            .argument_required()
            .with_min_value(1.0)
            .with_max_value(10.0)
            .with_description("Repeat count, between 1 and 10."),
    )?;
    manager.register(
        OptionSpec::new("commit")?
            .with_id(5)
            .allow_no_prefix()
            .with_description("Commit the result (negate with --no-commit)."),
    )?;

    Ok(manager)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = build_manager()?;
    manager.process()?;

    if manager.has_option("help") {
        print!("{manager}");
        return Ok(());
    }

    while let Some(option) = manager.next_option()? {
        match option.values().first() {
            Some(value) => println!("option {} = {}", option.name(), value),
            None if option.is_negated() => println!("option {} (negated)", option.name()),
            None => println!("option {}", option.name()),
        }
    }

    for argument in manager.arguments().iter().skip(1) {
        println!("argument {argument}");
    }

    println!("{}", manager.dump().to_json()?);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
