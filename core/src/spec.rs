//! Option definitions.
//!
//! An [`OptionSpec`] describes one recognized option: its name, value kind,
//! arity, constraints and relationships to other options. Specs are built
//! with chainable constructor methods and become immutable once registered
//! with an [`OptionManager`](crate::OptionManager).
//!
//! # Examples
//!
//! ```
//! use cliopt_core::{OptionSpec, ValueKind};
//!
//! let level = OptionSpec::new("level")?
//!     .with_alias("l")
//!     .with_kind(ValueKind::String)
//!     .argument_required()
//!     .valid_values(["warning", "error"])
//!     .with_description("Set the diagnostic level");
//!
//! assert!(level.is_long());
//! assert!(level.has_argument());
//! assert_eq!(level.alias(), Some("l"));
//! # Ok::<(), cliopt_core::Error>(())
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::convert;
use crate::error::{Error, Result};
use crate::parsed::ParsedOption;

/// Value kind of an option argument.
///
/// `None` means the option carries no typed value at all; `String` accepts
/// any text. The numeric and boolean kinds are checked by the validator
/// before any binding or callback runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueKind {
    /// No typed value (the default).
    #[default]
    None,
    /// Free-form string value.
    String,
    /// Integer value.
    Integer,
    /// Floating-point value.
    Float,
    /// Boolean value (`true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`).
    Boolean,
}

/// Callback invoked for a matched option after validation succeeds.
pub type OnOptionMatched = Rc<dyn Fn(&ParsedOption)>;

/// Callback invoked for each positional argument, with its index.
pub type OnArgument = Rc<dyn Fn(&str, usize)>;

/// Caller-owned slot the validator writes a converted first value into.
///
/// The tag fixes the conversion rule, so there is no way to write a value
/// of the wrong type into the slot. Slots are shared handles; keep a clone
/// on the caller side and read it after
/// [`process()`](crate::OptionManager::process).
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use cliopt_core::Binding;
///
/// let count = Rc::new(Cell::new(0i64));
/// let binding = Binding::Integer(Rc::clone(&count));
/// assert_eq!(count.get(), 0);
/// ```
#[derive(Clone)]
pub enum Binding {
    /// Writes the raw argument text.
    String(Rc<RefCell<String>>),
    /// Writes the argument parsed as an integer.
    Integer(Rc<Cell<i64>>),
    /// Writes the argument parsed as a float.
    Float(Rc<Cell<f64>>),
    /// Writes the argument parsed as a boolean.
    Boolean(Rc<Cell<bool>>),
}

impl Binding {
    /// Converts `value` according to the slot's tag and stores it.
    ///
    /// The validator has already type-checked `value` against the spec's
    /// kind, so conversion failures cannot occur for well-formed sessions;
    /// a mismatched slot falls back to the type's default value.
    pub(crate) fn store(&self, value: &str) {
        match self {
            Binding::String(slot) => *slot.borrow_mut() = value.to_string(),
            Binding::Integer(slot) => slot.set(convert::parse_integer(value).unwrap_or(0)),
            Binding::Float(slot) => slot.set(convert::parse_float(value).unwrap_or(0.0)),
            Binding::Boolean(slot) => slot.set(convert::parse_boolean(value).unwrap_or(false)),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Binding::String(_) => "String",
            Binding::Integer(_) => "Integer",
            Binding::Float(_) => "Float",
            Binding::Boolean(_) => "Boolean",
        };
        write!(f, "Binding::{tag}")
    }
}

/// Prepends the option marker sized to the name: `-v`, `--verbose`.
pub(crate) fn dashed(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}

/// Definition of one recognized command-line option.
///
/// A one-character name is a short option (`-v`), a longer name a long
/// option (`--verbose`). Attribute toggles that participate in the
/// exclusivity invariant ([`required`](OptionSpec::required),
/// [`multiple`](OptionSpec::multiple), [`exclusive`](OptionSpec::exclusive))
/// return `Result` and fail as soon as an illegal combination is formed,
/// in either order of assignment.
pub struct OptionSpec {
    name: String,
    id: i32,
    kind: ValueKind,
    description: String,
    hidden: bool,
    required: bool,
    has_argument: bool,
    argument_required: bool,
    multiple: bool,
    exclusive: bool,
    allow_no_prefix: bool,
    alias: Option<String>,
    valid_values: BTreeSet<String>,
    conflicts: BTreeSet<String>,
    min_value: Option<f64>,
    max_value: Option<f64>,
    default_value: Option<String>,
    binding: Option<Binding>,
    on_matched: Option<OnOptionMatched>,
}

impl OptionSpec {
    /// Creates a spec with the given name and all attributes off.
    ///
    /// Fails with [`Error::Definition`] if the name is empty.
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::Definition("option name cannot be empty".to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            id: 0,
            kind: ValueKind::None,
            description: String::new(),
            hidden: false,
            required: false,
            has_argument: false,
            argument_required: false,
            multiple: false,
            exclusive: false,
            allow_no_prefix: false,
            alias: None,
            valid_values: BTreeSet::new(),
            conflicts: BTreeSet::new(),
            min_value: None,
            max_value: None,
            default_value: None,
            binding: None,
            on_matched: None,
        })
    }

    /// Sets the numeric id used for dispatch. Uniqueness is the caller's
    /// responsibility; the default is 0.
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    /// Sets the argument value kind.
    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the help description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Sets the secondary name. At most one alias is kept; calling this
    /// again replaces the previous alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// Sets the default value. This is metadata for the host to read; the
    /// decoder never injects it into parse results.
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    /// Sets the inclusive lower bound for Integer/Float arguments.
    pub fn with_min_value(mut self, value: f64) -> Self {
        self.min_value = Some(value);
        self
    }

    /// Sets the inclusive upper bound for Integer/Float arguments.
    pub fn with_max_value(mut self, value: f64) -> Self {
        self.max_value = Some(value);
        self
    }

    /// Adds one acceptable literal argument value.
    pub fn valid_value(mut self, value: &str) -> Self {
        self.valid_values.insert(value.to_string());
        self
    }

    /// Adds several acceptable literal argument values.
    pub fn valid_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Declares a conflict with another option (by canonical name). The
    /// check is symmetric at validation time, so one-sided declarations
    /// suffice. Conflicts accumulate.
    pub fn conflicts_with(mut self, name: &str) -> Self {
        self.conflicts.insert(name.to_string());
        self
    }

    /// Declares an optional argument.
    pub fn argument(mut self) -> Self {
        self.has_argument = true;
        self
    }

    /// Declares a mandatory argument (implies [`argument`](Self::argument)).
    pub fn argument_required(mut self) -> Self {
        self.argument_required = true;
        self.has_argument = true;
        self
    }

    /// Marks the option as required on every parse.
    ///
    /// Fails if the option is already exclusive.
    pub fn required(mut self) -> Result<Self> {
        self.required = true;
        self.check_invariants()?;
        Ok(self)
    }

    /// Allows repeated occurrences, accumulating values.
    ///
    /// Fails if the option is already exclusive.
    pub fn multiple(mut self) -> Result<Self> {
        self.multiple = true;
        self.check_invariants()?;
        Ok(self)
    }

    /// Marks the option as exclusive: if present it must be the only
    /// option on the command line.
    ///
    /// Fails if the option is already required or multiple.
    pub fn exclusive(mut self) -> Result<Self> {
        self.exclusive = true;
        self.check_invariants()?;
        Ok(self)
    }

    /// Hides the option from the help renderer.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Permits the `--no-name` negated long form.
    pub fn allow_no_prefix(mut self) -> Self {
        self.allow_no_prefix = true;
        self
    }

    /// Attaches a caller-owned slot that receives the converted first
    /// value after validation.
    pub fn bind(mut self, binding: Binding) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Attaches a callback run once after validation if the option was
    /// matched. Callbacks fire in spec registration order.
    pub fn on_matched<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ParsedOption) + 'static,
    {
        self.on_matched = Some(Rc::new(callback));
        self
    }

    /// Exclusive options can be neither required nor multiple.
    pub(crate) fn check_invariants(&self) -> Result<()> {
        if self.exclusive && (self.required || self.multiple) {
            return Err(Error::Definition(format!(
                "exclusive option '{}' cannot be required nor multiple",
                self.name
            )));
        }
        Ok(())
    }

    /// Canonical name, without any marker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Numeric dispatch id.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Argument value kind.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// True for one-character names (`-v` style).
    pub fn is_short(&self) -> bool {
        self.name.chars().count() == 1
    }

    /// True for multi-character names (`--verbose` style).
    pub fn is_long(&self) -> bool {
        !self.is_short()
    }

    /// Help description text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the help renderer skips this option.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether the option must be present on every parse.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether repeated occurrences are allowed.
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Whether the option must be the only one present.
    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Whether the `--no-name` form is accepted.
    pub fn allows_no_prefix(&self) -> bool {
        self.allow_no_prefix
    }

    /// Whether the option takes an argument at all.
    pub fn has_argument(&self) -> bool {
        self.has_argument
    }

    /// Whether the argument is mandatory.
    pub fn is_argument_required(&self) -> bool {
        self.argument_required
    }

    /// Secondary name, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Whether a secondary name is set.
    pub fn has_alias(&self) -> bool {
        self.alias.is_some()
    }

    /// Closed set of acceptable literal values (empty = unconstrained).
    pub fn valid_values_set(&self) -> &BTreeSet<String> {
        &self.valid_values
    }

    /// Names of options this one cannot appear together with.
    pub fn conflicts(&self) -> &BTreeSet<String> {
        &self.conflicts
    }

    /// Inclusive lower bound for numeric arguments.
    pub fn min_value(&self) -> Option<f64> {
        self.min_value
    }

    /// Inclusive upper bound for numeric arguments.
    pub fn max_value(&self) -> Option<f64> {
        self.max_value
    }

    /// Default value metadata.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Bound output slot, if any.
    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub(crate) fn callback(&self) -> Option<&OnOptionMatched> {
        self.on_matched.as_ref()
    }
}

impl fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("has_argument", &self.has_argument)
            .field("argument_required", &self.argument_required)
            .field("multiple", &self.multiple)
            .field("exclusive", &self.exclusive)
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}
