//! Runtime records for options seen on the command line.

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::spec::OptionSpec;

/// One option actually matched during decoding.
///
/// Created on the first occurrence of a name; repeated occurrences of a
/// `multiple` option mutate the same record, incrementing
/// [`occurrences`](ParsedOption::occurrences) and appending values.
///
/// # Examples
///
/// ```
/// use cliopt_core::{OptionManager, OptionSpec};
///
/// let args = ["demo", "-v", "-v"].map(String::from);
/// let mut manager = OptionManager::new(args);
/// manager.register(OptionSpec::new("v")?.multiple()?)?;
/// manager.process()?;
///
/// let verbose = manager.get_option("v").unwrap();
/// assert_eq!(verbose.occurrences(), 2);
/// assert_eq!(verbose.count_values(), 0);
/// # Ok::<(), cliopt_core::Error>(())
/// ```
#[derive(Debug)]
pub struct ParsedOption {
    spec: Rc<OptionSpec>,
    id: i32,
    negated: bool,
    occurrences: u32,
    values: Vec<String>,
}

impl ParsedOption {
    pub(crate) fn new(spec: Rc<OptionSpec>, value: &str, negated: bool) -> Self {
        let mut values = Vec::new();
        if !value.is_empty() {
            values.push(value.to_string());
        }
        Self {
            id: spec.id(),
            spec,
            negated,
            occurrences: 1,
            values,
        }
    }

    /// Records a repeat match; empty values are not stored.
    pub(crate) fn record_occurrence(&mut self, value: &str) {
        self.occurrences += 1;
        if !value.is_empty() {
            self.values.push(value.to_string());
        }
    }

    /// The definition this record was matched against.
    pub fn spec(&self) -> &OptionSpec {
        &self.spec
    }

    /// Canonical option name (the spec's name, even when matched by alias
    /// or negated form).
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// Dispatch id copied from the spec.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// True when matched via the `--no-name` form.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// How many times the option appeared.
    pub fn occurrences(&self) -> u32 {
        self.occurrences
    }

    /// All collected argument values, in command-line order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of collected values. May be less than
    /// [`occurrences`](Self::occurrences) when optional arguments were
    /// omitted.
    pub fn count_values(&self) -> usize {
        self.values.len()
    }

    /// First collected value; [`Error::OutOfBounds`] if there is none.
    pub fn value(&self) -> Result<&str> {
        self.value_at(0)
    }

    /// Value at `index`; [`Error::OutOfBounds`] past the end.
    pub fn value_at(&self, index: usize) -> Result<&str> {
        self.values
            .get(index)
            .map(String::as_str)
            .ok_or(Error::OutOfBounds {
                index,
                len: self.values.len(),
            })
    }
}
