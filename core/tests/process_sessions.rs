//! End-to-end parse sessions exercising the full register → process →
//! query flow.

use std::cell::Cell;
use std::rc::Rc;

use cliopt_core::{Binding, Error, OptionManager, OptionSpec, SessionState, ValueKind};

fn manager(args: &[&str]) -> OptionManager {
    OptionManager::new(args.iter().map(|s| s.to_string()))
}

#[test]
fn test_mixed_session_with_aliases_and_arguments() {
    let mut om = manager(&[
        "demo",
        "-i",
        "first.txt",
        "--input-file",
        "second.txt",
        "-n",
        "-v",
        "extra",
    ]);
    om.register(
        OptionSpec::new("input-file")
            .unwrap()
            .with_alias("i")
            .argument_required()
            .multiple()
            .unwrap()
            .required()
            .unwrap(),
    )
    .unwrap();
    om.register(OptionSpec::new("print-name").unwrap().with_alias("n").argument())
        .unwrap();
    om.register(OptionSpec::new("verbose").unwrap().with_alias("v"))
        .unwrap();
    om.process().unwrap();

    assert_eq!(om.state(), SessionState::Processed);
    assert_eq!(om.count_processed_options(), 3);

    let inputs = om.get_option("input-file").unwrap();
    assert_eq!(inputs.occurrences(), 2);
    assert_eq!(inputs.values(), ["first.txt", "second.txt"]);

    // "-n" consumed no value: the next token was "-v", an option.
    assert_eq!(om.get_option("print-name").unwrap().count_values(), 0);

    assert_eq!(om.arguments(), ["demo", "extra"]);
    assert_eq!(om.last_argument().unwrap(), "extra");
}

#[test]
fn test_dispatch_by_id_in_command_line_order() {
    let mut om = manager(&["demo", "-c", "-a", "-b"]);
    om.register(OptionSpec::new("a").unwrap().with_id(1)).unwrap();
    om.register(OptionSpec::new("b").unwrap().with_id(2)).unwrap();
    om.register(OptionSpec::new("c").unwrap().with_id(3)).unwrap();
    om.process().unwrap();

    assert!(om.has_option_id(1));
    assert!(om.has_option_id(3));
    assert!(!om.has_option_id(4));

    let mut ids = Vec::new();
    while let Some(option) = om.next_option().unwrap() {
        ids.push(option.id());
    }
    assert_eq!(ids, [3, 1, 2]);
}

#[test]
fn test_level_option_with_valid_values_via_short_alias() {
    let mut om = manager(&["demo", "-l", "error"]);
    om.register(
        OptionSpec::new("level")
            .unwrap()
            .with_alias("l")
            .with_kind(ValueKind::String)
            .argument_required()
            .valid_values(["warning", "error", "w", "e"]),
    )
    .unwrap();
    om.process().unwrap();
    assert_eq!(om.get_option("l").unwrap().value().unwrap(), "error");
}

#[test]
fn test_negated_option_round_trip() {
    let mut om = manager(&["demo", "--no-commit"]);
    om.register(
        OptionSpec::new("commit")
            .unwrap()
            .allow_no_prefix()
            .required()
            .unwrap()
            .with_description("Do commit."),
    )
    .unwrap();
    om.process().unwrap();

    let commit = om.get_option("commit").unwrap();
    assert!(commit.is_negated());
    assert_eq!(commit.count_values(), 0);
    // The negated form satisfies the required check: the option is present.
}

#[test]
fn test_update_variable_after_process() {
    let value = Rc::new(Cell::new(0i64));
    let mut om = manager(&["demo", "--update", "7"]);
    om.register(
        OptionSpec::new("update")
            .unwrap()
            .with_kind(ValueKind::Integer)
            .argument_required()
            .required()
            .unwrap()
            .bind(Binding::Integer(Rc::clone(&value))),
    )
    .unwrap();

    assert_eq!(value.get(), 0);
    om.process().unwrap();
    assert_eq!(value.get(), 7);
}

#[test]
fn test_bounded_integer_binding_round_trip() {
    let register = |om: &mut OptionManager, slot: &Rc<Cell<i64>>| {
        om.register(
            OptionSpec::new("count")
                .unwrap()
                .with_kind(ValueKind::Integer)
                .argument_required()
                .with_min_value(1.0)
                .with_max_value(10.0)
                .bind(Binding::Integer(Rc::clone(slot))),
        )
        .unwrap();
    };

    let slot = Rc::new(Cell::new(0i64));
    let mut om = manager(&["demo", "--count=11"]);
    register(&mut om, &slot);
    assert!(matches!(om.process(), Err(Error::InvalidArgument { .. })));
    assert_eq!(slot.get(), 0);

    let slot = Rc::new(Cell::new(0i64));
    let mut om = manager(&["demo", "--count=5"]);
    register(&mut om, &slot);
    om.process().unwrap();
    assert_eq!(slot.get(), 5);
}

#[test]
fn test_exclusive_help_suppresses_required_inputs() {
    let build = |args: &[&str]| {
        let mut om = manager(args);
        om.register(
            OptionSpec::new("help")
                .unwrap()
                .with_alias("h")
                .exclusive()
                .unwrap(),
        )
        .unwrap();
        om.register(
            OptionSpec::new("input-file")
                .unwrap()
                .argument_required()
                .required()
                .unwrap(),
        )
        .unwrap();
        om
    };

    // Exclusive option alone: required check waived.
    let mut om = build(&["demo", "-h"]);
    om.process().unwrap();

    // Exclusive option with company: exclusivity fires first.
    let mut om = build(&["demo", "-h", "--input-file", "x"]);
    assert_eq!(om.process(), Err(Error::ExclusiveOption("--help".to_string())));

    // No exclusive option present: the required check applies.
    let mut om = build(&["demo"]);
    assert_eq!(
        om.process(),
        Err(Error::RequiredOption("--input-file".to_string()))
    );
}

#[test]
fn test_error_kinds_are_distinguishable() {
    let mut om = manager(&["demo", "--frobnicate"]);
    let error = om.process().unwrap_err();
    match error {
        Error::InvalidOption(option) => assert_eq!(option, "--frobnicate"),
        other => panic!("expected InvalidOption, got {other:?}"),
    }
}

#[test]
fn test_positional_count_with_program_name() {
    // [2,3] window: the program name counts, so one extra token passes...
    let mut om = manager(&["demo", "file.txt"]);
    om.argument_count_range().min = 2;
    om.argument_count_range().max = 3;
    om.process().unwrap();
    assert_eq!(om.count_arguments(), 2);

    // ...and none fails.
    let mut om = manager(&["demo"]);
    om.argument_count_range().min = 2;
    om.argument_count_range().max = 3;
    assert!(matches!(om.process(), Err(Error::Length(_))));
}

#[test]
fn test_default_value_is_metadata_only() {
    let mut om = manager(&["demo"]);
    om.register(
        OptionSpec::new("mode")
            .unwrap()
            .argument()
            .with_default("fast"),
    )
    .unwrap();
    om.process().unwrap();

    // Never auto-injected into results; the host reads it off the spec.
    assert!(!om.has_option("mode"));
    assert_eq!(om.spec("mode").unwrap().default_value(), Some("fast"));
}
