//! The decoder: raw token queue → parsed options + positional arguments.
//!
//! Tokens are consumed front to back with one token of lookahead for
//! argument consumption. Short options cluster (`-xyz` ≡ `-x -y -z`, or
//! `-xVALUE` when `x` takes an argument), long options support the
//! `--name=value` and negated `--no-name` forms, bare `-` is a positional
//! argument (stdin convention) and bare `--` turns everything after it
//! into positional arguments.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::manager::OptionManager;
use crate::parsed::ParsedOption;
use crate::spec::{OptionSpec, dashed};

const SHORT_MARKER: &str = "-";
const LONG_MARKER: &str = "--";
const NEGATION_PREFIX: &str = "no-";
const ARGUMENT_SEPARATOR: char = '=';

/// Whether a token is option-shaped at all (short or long form).
pub(crate) fn is_option(token: &str) -> bool {
    is_short_option(token) || is_long_option(token)
}

/// `-x...` but not `--...`.
pub(crate) fn is_short_option(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some('-') && matches!(chars.next(), Some(c) if c != '-')
}

/// `--x...` (three characters or more).
pub(crate) fn is_long_option(token: &str) -> bool {
    token.len() > 2 && token.starts_with(LONG_MARKER)
}

impl OptionManager {
    /// Drains the raw token queue, classifying every token.
    pub(crate) fn decode(&mut self) -> Result<()> {
        // Argument zero is the program name.
        if let Some(program) = self.raw.pop_front() {
            self.positionals.push(program);
        }

        let mut only_arguments = false;
        while let Some(token) = self.raw.pop_front() {
            trace!(token, "decoding token");
            if only_arguments {
                self.positionals.push(token);
            } else if is_short_option(&token) {
                self.decode_short(&token)?;
            } else if is_long_option(&token) {
                self.decode_long(&token)?;
            } else if token == SHORT_MARKER {
                // Conventionally "read from stdin".
                self.positionals.push(token);
            } else if token == LONG_MARKER {
                only_arguments = true;
            } else {
                self.positionals.push(token);
            }
        }
        Ok(())
    }

    /// Decodes one short-option token, including clusters.
    ///
    /// The cluster is walked iteratively: each no-argument option strips
    /// one character and the remainder is treated as a fresh cluster, so
    /// `-xyz` resolves without recursion.
    fn decode_short(&mut self, token: &str) -> Result<()> {
        let mut cluster = token[1..].to_string();
        // What the user typed, for error messages; the marker is kept on
        // the first round only, matching what appeared on the command line.
        let mut display = token.to_string();
        loop {
            let mut chars = cluster.chars();
            let Some(first) = chars.next() else {
                return Ok(());
            };
            let tail = chars.as_str().to_string();

            if tail.is_empty() {
                // Plain single-character option.
                let Some(spec) = self.spec_handle(&cluster) else {
                    return Err(Error::InvalidOption(display));
                };
                return self.post_process(&spec, &cluster, false);
            }

            let name = first.to_string();
            let Some(spec) = self.spec_handle(&name) else {
                return Err(Error::InvalidOption(display));
            };

            if spec.has_argument() {
                if spec.is_argument_required() {
                    // The rest of the cluster is the argument, verbatim.
                    return self.add_option(&spec, &tail, false);
                }
                // Optional argument: if what follows could itself name an
                // option, the construction is ambiguous. Reject rather
                // than guess.
                let probe: String = tail.chars().take(2).collect();
                if self.lookup.contains_key(&probe) {
                    return Err(Error::AmbiguousOption(display));
                }
                return self.add_option(&spec, &tail, false);
            }

            // No argument: register and keep walking the cluster.
            self.add_option(&spec, "", false)?;
            cluster = tail;
            display = cluster.clone();
        }
    }

    /// Decodes one long-option token (`--name`, `--name=value`,
    /// `--no-name`).
    fn decode_long(&mut self, token: &str) -> Result<()> {
        let name = &token[2..];
        if let Some(spec) = self.spec_handle(name) {
            return self.post_process(&spec, name, false);
        }

        if let Some(position) = token.find(ARGUMENT_SEPARATOR) {
            let stripped = &token[2..position];
            let value = &token[position + 1..];
            return match self.spec_handle(stripped) {
                Some(spec) if spec.has_argument() => self.add_option(&spec, value, false),
                Some(_) => Err(Error::InvalidArgument {
                    option: format!("--{stripped}"),
                    reason: "option does not take an argument".to_string(),
                }),
                None => Err(Error::InvalidOption(format!("--{stripped}"))),
            };
        }

        if let Some(base) = name.strip_prefix(NEGATION_PREFIX) {
            // Negated options never carry an argument.
            return match self.spec_handle(base) {
                Some(spec) if spec.allows_no_prefix() && !spec.is_argument_required() => {
                    self.post_process(&spec, base, true)
                }
                _ => Err(Error::InvalidOption(format!("--{NEGATION_PREFIX}{base}"))),
            };
        }

        Err(Error::InvalidOption(token.to_string()))
    }

    /// Shared tail for a matched spec: consumes a following token as the
    /// argument where the arity calls for it.
    ///
    /// `typed` is the option text as the user wrote it (without marker);
    /// error messages size the `-`/`--` prefix to it rather than to the
    /// canonical spec name.
    fn post_process(&mut self, spec: &Rc<OptionSpec>, typed: &str, negated: bool) -> Result<()> {
        if !spec.has_argument() {
            return self.add_option(spec, "", negated);
        }

        let next_is_value = self.raw.front().is_some_and(|next| !is_option(next));
        if spec.is_argument_required() {
            if next_is_value {
                let value = self.raw.pop_front().unwrap_or_default();
                self.add_option(spec, &value, negated)
            } else {
                Err(Error::RequiredArgument(dashed(typed)))
            }
        } else if next_is_value {
            let value = self.raw.pop_front().unwrap_or_default();
            self.add_option(spec, &value, negated)
        } else {
            self.add_option(spec, "", negated)
        }
    }

    /// Registers one occurrence of a matched option.
    fn add_option(&mut self, spec: &Rc<OptionSpec>, value: &str, negated: bool) -> Result<()> {
        let name = spec.name();
        debug!(option = name, value, negated, "matched option");
        if let Some(&index) = self.by_name.get(name) {
            if !spec.is_multiple() {
                return Err(Error::MultipleOption(dashed(name)));
            }
            self.parsed[index].record_occurrence(value);
            self.order.push(index);
        } else {
            let index = self.parsed.len();
            self.parsed
                .push(ParsedOption::new(Rc::clone(spec), value, negated));
            self.by_name.insert(name.to_string(), index);
            self.order.push(index);
        }
        Ok(())
    }

    fn spec_handle(&self, name: &str) -> Option<Rc<OptionSpec>> {
        self.lookup.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::OptionSpec;

    fn manager(args: &[&str]) -> OptionManager {
        OptionManager::new(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_token_shapes() {
        assert!(is_short_option("-v"));
        assert!(is_short_option("-vvv"));
        assert!(!is_short_option("-"));
        assert!(!is_short_option("--verbose"));
        assert!(is_long_option("--verbose"));
        assert!(!is_long_option("--"));
        assert!(!is_long_option("value"));
    }

    #[test]
    fn test_cluster_equals_separate_options() {
        for args in [
            &["demo", "-a", "-b", "-c"][..],
            &["demo", "-abc"][..],
        ] {
            let mut om = manager(args);
            om.register(OptionSpec::new("a").unwrap()).unwrap();
            om.register(OptionSpec::new("b").unwrap()).unwrap();
            om.register(OptionSpec::new("c").unwrap()).unwrap();
            om.process().unwrap();
            for name in ["a", "b", "c"] {
                let option = om.get_option(name).unwrap();
                assert_eq!(option.occurrences(), 1, "args: {args:?}");
            }
        }
    }

    #[test]
    fn test_attached_required_argument() {
        let mut om = manager(&["demo", "-xVALUE"]);
        om.register(OptionSpec::new("x").unwrap().argument_required())
            .unwrap();
        om.process().unwrap();
        assert_eq!(om.get_option("x").unwrap().values(), ["VALUE"]);
    }

    #[test]
    fn test_missing_required_argument_names_typed_form() {
        let mut om = manager(&["demo", "-x"]);
        om.register(OptionSpec::new("x").unwrap().argument_required())
            .unwrap();
        assert_eq!(
            om.process(),
            Err(Error::RequiredArgument("-x".to_string()))
        );

        let mut om = manager(&["demo", "--level"]);
        om.register(
            OptionSpec::new("level")
                .unwrap()
                .argument_required(),
        )
        .unwrap();
        assert_eq!(
            om.process(),
            Err(Error::RequiredArgument("--level".to_string()))
        );
    }

    #[test]
    fn test_required_argument_not_satisfied_by_option_token() {
        let mut om = manager(&["demo", "-x", "-y"]);
        om.register(OptionSpec::new("x").unwrap().argument_required())
            .unwrap();
        om.register(OptionSpec::new("y").unwrap()).unwrap();
        assert!(matches!(om.process(), Err(Error::RequiredArgument(_))));
    }

    #[test]
    fn test_ambiguous_optional_argument_cluster() {
        let mut om = manager(&["demo", "-xy"]);
        om.register(OptionSpec::new("x").unwrap().argument()).unwrap();
        om.register(OptionSpec::new("y").unwrap()).unwrap();
        assert_eq!(
            om.process(),
            Err(Error::AmbiguousOption("-xy".to_string()))
        );
    }

    #[test]
    fn test_unambiguous_optional_argument_cluster_takes_value() {
        let mut om = manager(&["demo", "-xfoo"]);
        om.register(OptionSpec::new("x").unwrap().argument()).unwrap();
        om.process().unwrap();
        assert_eq!(om.get_option("x").unwrap().values(), ["foo"]);
    }

    #[test]
    fn test_optional_argument_consumes_following_value_token() {
        let mut om = manager(&["demo", "-x", "foo"]);
        om.register(OptionSpec::new("x").unwrap().argument()).unwrap();
        om.process().unwrap();
        assert_eq!(om.get_option("x").unwrap().values(), ["foo"]);
        assert_eq!(om.count_arguments(), 1);
    }

    #[test]
    fn test_optional_argument_omitted_before_option() {
        let mut om = manager(&["demo", "-x", "-y"]);
        om.register(OptionSpec::new("x").unwrap().argument()).unwrap();
        om.register(OptionSpec::new("y").unwrap()).unwrap();
        om.process().unwrap();
        assert_eq!(om.get_option("x").unwrap().count_values(), 0);
        assert!(om.has_option("y"));
    }

    #[test]
    fn test_long_option_with_equals_value() {
        let mut om = manager(&["demo", "--level=error"]);
        om.register(OptionSpec::new("level").unwrap().argument_required())
            .unwrap();
        om.process().unwrap();
        assert_eq!(om.get_option("level").unwrap().value().unwrap(), "error");
    }

    #[test]
    fn test_equals_value_on_no_argument_option() {
        let mut om = manager(&["demo", "--quiet=1"]);
        om.register(OptionSpec::new("quiet").unwrap()).unwrap();
        assert!(matches!(
            om.process(),
            Err(Error::InvalidArgument { option, .. }) if option == "--quiet"
        ));
    }

    #[test]
    fn test_unknown_long_option() {
        let mut om = manager(&["demo", "--bogus"]);
        assert_eq!(
            om.process(),
            Err(Error::InvalidOption("--bogus".to_string()))
        );
    }

    #[test]
    fn test_unknown_short_option_inside_cluster() {
        let mut om = manager(&["demo", "-az"]);
        om.register(OptionSpec::new("a").unwrap()).unwrap();
        assert!(matches!(om.process(), Err(Error::InvalidOption(_))));
    }

    #[test]
    fn test_negated_long_option() {
        let mut om = manager(&["demo", "--no-commit"]);
        om.register(OptionSpec::new("commit").unwrap().allow_no_prefix())
            .unwrap();
        om.process().unwrap();
        let commit = om.get_option("commit").unwrap();
        assert!(commit.is_negated());
        assert_eq!(commit.count_values(), 0);
    }

    #[test]
    fn test_negation_requires_allow_no_prefix() {
        let mut om = manager(&["demo", "--no-commit"]);
        om.register(OptionSpec::new("commit").unwrap()).unwrap();
        assert_eq!(
            om.process(),
            Err(Error::InvalidOption("--no-commit".to_string()))
        );
    }

    #[test]
    fn test_negation_of_unknown_option() {
        let mut om = manager(&["demo", "--no-commit"]);
        assert_eq!(
            om.process(),
            Err(Error::InvalidOption("--no-commit".to_string()))
        );
    }

    #[test]
    fn test_double_dash_stops_option_parsing() {
        let mut om = manager(&["demo", "-v", "--", "-v", "--weird"]);
        om.register(OptionSpec::new("v").unwrap()).unwrap();
        om.process().unwrap();
        assert_eq!(om.get_option("v").unwrap().occurrences(), 1);
        assert_eq!(om.arguments(), ["demo", "-v", "--weird"]);
    }

    #[test]
    fn test_bare_dash_is_positional() {
        let mut om = manager(&["demo", "-"]);
        om.process().unwrap();
        assert_eq!(om.arguments(), ["demo", "-"]);
    }

    #[test]
    fn test_repeat_of_non_multiple_option() {
        let mut om = manager(&["demo", "-v", "-v"]);
        om.register(OptionSpec::new("v").unwrap()).unwrap();
        assert_eq!(
            om.process(),
            Err(Error::MultipleOption("-v".to_string()))
        );
    }

    #[test]
    fn test_multiple_option_accumulates_values() {
        let mut om = manager(&["demo", "--input=a", "--input=b"]);
        om.register(
            OptionSpec::new("input")
                .unwrap()
                .argument_required()
                .multiple()
                .unwrap(),
        )
        .unwrap();
        om.process().unwrap();
        let input = om.get_option("input").unwrap();
        assert_eq!(input.occurrences(), 2);
        assert_eq!(input.values(), ["a", "b"]);
    }

    #[test]
    fn test_ordered_iteration_yields_per_occurrence() {
        let mut om = manager(&["demo", "-v", "-q", "-v"]);
        om.register(OptionSpec::new("v").unwrap().multiple().unwrap())
            .unwrap();
        om.register(OptionSpec::new("q").unwrap()).unwrap();
        om.process().unwrap();

        let mut seen = Vec::new();
        while let Some(option) = om.next_option().unwrap() {
            seen.push(option.name().to_string());
        }
        assert_eq!(seen, ["v", "q", "v"]);

        om.rewind();
        assert_eq!(om.next_option().unwrap().unwrap().name(), "v");
    }
}
