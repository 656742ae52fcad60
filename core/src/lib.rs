//! Command-line option decoding and validation.
//!
//! This crate parses a process's raw argument vector against a table of
//! registered option definitions:
//!
//! - [`OptionSpec`] is one recognized option: name, value kind, arity,
//!   constraints (valid values, numeric bounds), relationships (alias,
//!   conflicts, exclusivity) and optional output binding/callback.
//! - [`ParsedOption`] is the runtime record for an option actually seen on
//!   the command line: occurrence count, negation flag, collected values.
//! - [`OptionManager`] is the parse session: registry, decoder, validator
//!   and query interface.
//!
//! The decoder understands short-option clusters (`-xyz`, `-xVALUE`), long
//! options with `--name=value`, negated `--no-name` forms, bare `-`
//! (positional, stdin convention) and `--` (end of options). After
//! decoding, validation enforces required/exclusive/conflict rules, checks
//! every value's type, set membership and numeric bounds, writes bound
//! variables and runs callbacks, failing fast with a typed [`Error`] at
//! the first violation.
//!
//! # Example
//!
//! ```
//! use cliopt_core::{OptionManager, OptionSpec, ValueKind};
//!
//! let args = ["demo", "-v", "--level=error", "input.txt"].map(String::from);
//! let mut manager = OptionManager::new(args);
//! manager.register(OptionSpec::new("verbose")?.with_alias("v").multiple()?)?;
//! manager.register(
//!     OptionSpec::new("level")?
//!         .with_kind(ValueKind::String)
//!         .argument_required()
//!         .valid_values(["warning", "error"]),
//! )?;
//! manager.process()?;
//!
//! assert!(manager.has_option("verbose"));
//! assert_eq!(manager.get_option("level").unwrap().value()?, "error");
//! assert_eq!(manager.argument(1)?, "input.txt");
//! # Ok::<(), cliopt_core::Error>(())
//! ```

mod convert;
mod decode;
mod dump;
mod error;
mod help;
mod manager;
mod parsed;
mod spec;
mod validate;

pub use convert::{matches_kind, parse_boolean, parse_float, parse_integer};
pub use dump::{DefinitionReport, DumpReport, ParsedOptionReport};
pub use error::{Error, Result};
pub use manager::{ArgumentRange, OptionManager, SessionState};
pub use parsed::ParsedOption;
pub use spec::{Binding, OnArgument, OnOptionMatched, OptionSpec, ValueKind};
