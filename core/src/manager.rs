//! Parse session: registry, orchestration and result queries.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::parsed::ParsedOption;
use crate::spec::{OnArgument, OptionSpec};

/// Lifecycle of a parse session.
///
/// Queries that assume a completed parse (ordered iteration) are only
/// legal in `Processed`; by-name lookups and counts are safe in any state
/// and simply come back empty before processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// `process()` has not been called yet.
    Unprocessed,
    /// The decoder is draining the raw token queue.
    Decoding,
    /// The validator is checking invariants.
    Validating,
    /// Decoding and validation completed successfully.
    Processed,
}

/// Accepted count range for positional arguments.
///
/// A bound ≤ 0 disables that side of the check. The program name counts as
/// positional argument zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentRange {
    /// Minimum number of positionals (disabled when ≤ 0).
    pub min: i32,
    /// Maximum number of positionals (disabled when ≤ 0).
    pub max: i32,
}

impl ArgumentRange {
    /// Creates a range with both bounds set.
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the enabled bounds.
    pub fn contains(&self, value: i32) -> bool {
        (self.min <= 0 || value >= self.min) && (self.max <= 0 || value <= self.max)
    }
}

impl Default for ArgumentRange {
    fn default() -> Self {
        Self { min: -1, max: -1 }
    }
}

/// A complete option-parsing session.
///
/// The manager owns the option registry, the raw token queue and all parse
/// results. Typical flow: register specs, call
/// [`process()`](OptionManager::process), then query results by name, id or
/// in command-line order.
///
/// # Examples
///
/// ```
/// use cliopt_core::{OptionManager, OptionSpec, ValueKind};
///
/// let args = ["demo", "--count=5", "input.txt"].map(String::from);
/// let mut manager = OptionManager::new(args);
/// manager.register(
///     OptionSpec::new("count")?
///         .with_kind(ValueKind::Integer)
///         .argument_required()
///         .with_min_value(1.0)
///         .with_max_value(10.0),
/// )?;
/// manager.process()?;
///
/// assert_eq!(manager.get_option("count").unwrap().value()?, "5");
/// assert_eq!(manager.count_arguments(), 2); // program name + input.txt
/// # Ok::<(), cliopt_core::Error>(())
/// ```
pub struct OptionManager {
    /// Original argument vector, kept for the dump report.
    pub(crate) argv: Vec<String>,
    /// Raw tokens still to be decoded (front pop + peek).
    pub(crate) raw: VecDeque<String>,
    /// Registered specs in registration order.
    pub(crate) specs: Vec<Rc<OptionSpec>>,
    /// Name *and* alias lookup into the registry.
    pub(crate) lookup: HashMap<String, Rc<OptionSpec>>,
    /// Parsed option records, in first-match order.
    pub(crate) parsed: Vec<ParsedOption>,
    /// Canonical name → index into `parsed`.
    pub(crate) by_name: HashMap<String, usize>,
    /// Command-line-ordered indices into `parsed`, one per occurrence.
    pub(crate) order: Vec<usize>,
    /// Positional arguments; index 0 is the program name.
    pub(crate) positionals: Vec<String>,
    pub(crate) argument_range: ArgumentRange,
    pub(crate) argument_callback: Option<OnArgument>,
    credits: String,
    usage: String,
    cursor: usize,
    state: SessionState,
}

impl OptionManager {
    /// Creates a session over a raw argument vector. The first element is
    /// expected to be the program name.
    pub fn new<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let argv: Vec<String> = args.into_iter().collect();
        Self {
            raw: argv.iter().cloned().collect(),
            argv,
            specs: Vec::new(),
            lookup: HashMap::new(),
            parsed: Vec::new(),
            by_name: HashMap::new(),
            order: Vec::new(),
            positionals: Vec::new(),
            argument_range: ArgumentRange::default(),
            argument_callback: None,
            credits: String::new(),
            usage: String::new(),
            cursor: 0,
            state: SessionState::Unprocessed,
        }
    }

    /// Creates a session over the process's own arguments.
    pub fn from_env() -> Self {
        Self::new(std::env::args())
    }

    /// Registers an option definition.
    ///
    /// Fails with [`Error::Definition`] on an illegal exclusivity
    /// combination or when the name or alias is already taken (aliases and
    /// primary names share one namespace).
    pub fn register(&mut self, spec: OptionSpec) -> Result<()> {
        spec.check_invariants()?;
        if self.lookup.contains_key(spec.name()) {
            return Err(Error::Definition(format!(
                "cannot add option '{}': {} option already exists",
                spec.name(),
                if spec.is_short() { "short" } else { "long" },
            )));
        }
        if let Some(alias) = spec.alias() {
            if alias == spec.name() || self.lookup.contains_key(alias) {
                return Err(Error::Definition(format!(
                    "cannot assign alias '{}' for option '{}': alias already exists",
                    alias,
                    spec.name(),
                )));
            }
        }

        let spec = Rc::new(spec);
        self.lookup
            .insert(spec.name().to_string(), Rc::clone(&spec));
        if let Some(alias) = spec.alias() {
            self.lookup.insert(alias.to_string(), Rc::clone(&spec));
        }
        debug!(option = spec.name(), id = spec.id(), "registered option");
        self.specs.push(spec);
        Ok(())
    }

    /// Sets the callback invoked once per positional argument, in
    /// left-to-right order, after validation.
    pub fn on_argument<F>(&mut self, callback: F)
    where
        F: Fn(&str, usize) + 'static,
    {
        self.argument_callback = Some(Rc::new(callback));
    }

    /// Mutable access to the positional-argument count range.
    pub fn argument_count_range(&mut self) -> &mut ArgumentRange {
        &mut self.argument_range
    }

    /// Sets the credits line shown at the top of the help output.
    pub fn set_credits(&mut self, credits: &str) {
        self.credits = credits.to_string();
    }

    /// Credits line, empty if unset.
    pub fn credits(&self) -> &str {
        &self.credits
    }

    /// Sets the usage line shown in the help output.
    pub fn set_usage(&mut self, usage: &str) {
        self.usage = usage.to_string();
    }

    /// Usage line, empty if unset.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Decodes the raw tokens and validates the result.
    ///
    /// On success the session reaches [`SessionState::Processed`] and all
    /// query methods become available. The first failure anywhere aborts
    /// and propagates; no partial result is ever exposed as valid.
    pub fn process(&mut self) -> Result<()> {
        self.state = SessionState::Decoding;
        self.decode()?;
        self.state = SessionState::Validating;
        self.validate()?;
        self.state = SessionState::Processed;
        self.cursor = 0;
        debug!(
            options = self.parsed.len(),
            arguments = self.positionals.len(),
            "options processed"
        );
        Ok(())
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of registered specs (aliases not counted).
    pub fn count_defined_options(&self) -> usize {
        self.specs.len()
    }

    /// Number of distinct options matched on the command line.
    pub fn count_processed_options(&self) -> usize {
        self.parsed.len()
    }

    /// Whether a spec with this name or alias is registered.
    pub fn has_spec(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// Registered spec for a name or alias.
    pub fn spec(&self, name: &str) -> Option<&OptionSpec> {
        self.lookup.get(name).map(Rc::as_ref)
    }

    /// Whether an option with this name (or alias) was matched.
    pub fn has_option(&self, name: &str) -> bool {
        self.get_option(name).is_some()
    }

    /// Whether any matched option carries this id. Linear scan; ids are
    /// not required to be unique.
    pub fn has_option_id(&self, id: i32) -> bool {
        self.parsed.iter().any(|option| option.id() == id)
    }

    /// Matched option by name or alias.
    pub fn get_option(&self, name: &str) -> Option<&ParsedOption> {
        let canonical = match self.lookup.get(name) {
            Some(spec) => spec.name(),
            None => name,
        };
        let index = *self.by_name.get(canonical)?;
        Some(&self.parsed[index])
    }

    /// Number of positional arguments, including the program name.
    pub fn count_arguments(&self) -> usize {
        self.positionals.len()
    }

    /// All positional arguments in order.
    pub fn arguments(&self) -> &[String] {
        &self.positionals
    }

    /// Positional argument at `index`; [`Error::OutOfBounds`] otherwise.
    pub fn argument(&self, index: usize) -> Result<&str> {
        self.positionals
            .get(index)
            .map(String::as_str)
            .ok_or(Error::OutOfBounds {
                index,
                len: self.positionals.len(),
            })
    }

    /// First positional argument (the program name, once processed).
    pub fn first_argument(&self) -> Result<&str> {
        self.argument(0)
    }

    /// Last positional argument.
    pub fn last_argument(&self) -> Result<&str> {
        match self.positionals.len() {
            0 => Err(Error::OutOfBounds { index: 0, len: 0 }),
            len => self.argument(len - 1),
        }
    }

    /// Next matched option in command-line order, or `None` when the
    /// cursor reaches the end. A `multiple` option is yielded once per
    /// occurrence.
    ///
    /// Fails with [`Error::Unprocessed`] before a successful
    /// [`process()`](Self::process).
    pub fn next_option(&mut self) -> Result<Option<&ParsedOption>> {
        if self.state != SessionState::Processed {
            return Err(Error::Unprocessed);
        }
        let Some(&index) = self.order.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;
        Ok(Some(&self.parsed[index]))
    }

    /// Resets the ordered-iteration cursor.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl fmt::Debug for OptionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionManager")
            .field("state", &self.state)
            .field("specs", &self.specs.len())
            .field("parsed", &self.parsed.len())
            .field("positionals", &self.positionals)
            .finish_non_exhaustive()
    }
}
