//! The validator: post-decoding invariant checks, variable binding and
//! callback execution.
//!
//! Stages run in a fixed order, and the first failure anywhere is
//! terminal: exclusivity, required options (superseded when an exclusive
//! option matched), per-value type/set/bound checks, conflicts, positional
//! argument count, then variable binding and callbacks.

use tracing::debug;

use crate::convert;
use crate::error::{Error, Result};
use crate::manager::OptionManager;
use crate::spec::{OptionSpec, ValueKind, dashed};

impl OptionManager {
    pub(crate) fn validate(&self) -> Result<()> {
        let exclusive = self.check_exclusive()?;
        if !exclusive {
            self.check_required()?;
        }
        self.check_values()?;
        self.check_conflicts()?;
        self.check_argument_count()?;
        self.update_bindings()?;
        self.run_callbacks();
        Ok(())
    }

    /// An exclusive option, if matched, must be the only option present.
    /// Returns whether one matched (which also waives the required check).
    fn check_exclusive(&self) -> Result<bool> {
        let found = self
            .specs
            .iter()
            .find(|spec| spec.is_exclusive() && self.by_name.contains_key(spec.name()));
        let Some(spec) = found else {
            return Ok(false);
        };
        if self.parsed.len() > 1 {
            return Err(Error::ExclusiveOption(dashed(spec.name())));
        }
        debug!(option = spec.name(), "exclusive option present");
        Ok(true)
    }

    fn check_required(&self) -> Result<()> {
        for spec in &self.specs {
            if spec.is_required() && !self.by_name.contains_key(spec.name()) {
                return Err(Error::RequiredOption(dashed(spec.name())));
            }
        }
        Ok(())
    }

    /// Type check, then valid-value membership, then numeric bounds, for
    /// every value of every parsed option.
    fn check_values(&self) -> Result<()> {
        for parsed in &self.parsed {
            let spec = parsed.spec();
            for value in parsed.values() {
                check_kind(spec, value)?;
                check_constraints(spec, value)?;
            }
        }
        Ok(())
    }

    fn check_conflicts(&self) -> Result<()> {
        for parsed in &self.parsed {
            for other in parsed.spec().conflicts() {
                if self.by_name.contains_key(other.as_str()) {
                    return Err(Error::Conflict {
                        option: dashed(parsed.name()),
                        other: dashed(other),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_argument_count(&self) -> Result<()> {
        let range = self.argument_range;
        let count = self.positionals.len() as i32;
        if range.min > 0 && count < range.min {
            return Err(Error::Length(format!(
                "must have at least {} arguments and {count} have been supplied",
                range.min
            )));
        }
        if range.max > 0 && count > range.max {
            return Err(Error::Length(format!(
                "must have {} arguments or less and {count} have been supplied",
                range.max
            )));
        }
        Ok(())
    }

    /// Writes each bound slot from the option's first value.
    ///
    /// Options with no collected value (omitted optional argument, negated
    /// form) leave their slot untouched.
    fn update_bindings(&self) -> Result<()> {
        for parsed in &self.parsed {
            let spec = parsed.spec();
            let Some(binding) = spec.binding() else {
                continue;
            };
            let Some(value) = parsed.values().first() else {
                continue;
            };
            if spec.kind() == ValueKind::None {
                return Err(Error::InvalidArgument {
                    option: dashed(parsed.name()),
                    reason: format!("cannot assign argument to variable: {value}"),
                });
            }
            binding.store(value);
        }
        Ok(())
    }

    /// Per-spec callbacks in registration order, then the session-wide
    /// per-argument callback left to right.
    fn run_callbacks(&self) {
        for spec in &self.specs {
            let Some(callback) = spec.callback() else {
                continue;
            };
            if let Some(&index) = self.by_name.get(spec.name()) {
                callback(&self.parsed[index]);
            }
        }
        if let Some(callback) = &self.argument_callback {
            for (index, argument) in self.positionals.iter().enumerate() {
                callback(argument, index);
            }
        }
    }
}

fn check_kind(spec: &OptionSpec, value: &str) -> Result<()> {
    let noun = match spec.kind() {
        ValueKind::Integer => "an integer",
        ValueKind::Float => "a float",
        ValueKind::Boolean => "a boolean",
        ValueKind::None | ValueKind::String => return Ok(()),
    };
    if convert::matches_kind(spec.kind(), value) {
        return Ok(());
    }
    Err(Error::InvalidArgument {
        option: dashed(spec.name()),
        reason: format!("must be {noun}: {value}"),
    })
}

fn check_constraints(spec: &OptionSpec, value: &str) -> Result<()> {
    // All arguments are strings until the type check has run, so the
    // valid-value set applies to every kind.
    let valid = spec.valid_values_set();
    if !valid.is_empty() && !valid.contains(value) {
        let allowed = valid
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::InvalidArgument {
            option: dashed(spec.name()),
            reason: format!("must be one of {allowed}: {value}"),
        });
    }

    if !matches!(spec.kind(), ValueKind::Integer | ValueKind::Float) {
        return Ok(());
    }
    let Some(numeric) = convert::parse_float(value) else {
        return Ok(());
    };
    // Each bound is gated on its own presence flag.
    if let Some(min) = spec.min_value() {
        if numeric < min {
            return Err(Error::InvalidArgument {
                option: dashed(spec.name()),
                reason: format!("must be at least {min}: {value}"),
            });
        }
    }
    if let Some(max) = spec.max_value() {
        if numeric > max {
            return Err(Error::InvalidArgument {
                option: dashed(spec.name()),
                reason: format!("must be at most {max}: {value}"),
            });
        }
    }
    Ok(())
}
