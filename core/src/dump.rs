//! Serializable snapshot of a parse session, for debugging.

use serde::Serialize;

use crate::manager::OptionManager;
use crate::spec::ValueKind;

/// Snapshot of one registered option definition.
#[derive(Debug, Clone, Serialize)]
pub struct DefinitionReport {
    pub name: String,
    pub id: i32,
    pub kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub required: bool,
    pub has_argument: bool,
    pub argument_required: bool,
    pub multiple: bool,
    pub exclusive: bool,
}

/// Snapshot of one option matched on the command line.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedOptionReport {
    pub name: String,
    pub id: i32,
    pub negated: bool,
    pub occurrences: u32,
    pub values: Vec<String>,
}

/// Full session snapshot: argv, definitions, matched options and
/// positional arguments.
///
/// # Examples
///
/// ```
/// use cliopt_core::{OptionManager, OptionSpec};
///
/// let mut manager = OptionManager::new(["demo", "-v"].map(String::from));
/// manager.register(OptionSpec::new("v")?)?;
/// manager.process()?;
///
/// let report = manager.dump();
/// assert_eq!(report.argv, ["demo", "-v"]);
/// assert_eq!(report.options[0].name, "v");
/// # Ok::<(), cliopt_core::Error>(())
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct DumpReport {
    pub argv: Vec<String>,
    pub definitions: Vec<DefinitionReport>,
    pub options: Vec<ParsedOptionReport>,
    pub arguments: Vec<String>,
}

impl DumpReport {
    /// Pretty-printed JSON rendition.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl OptionManager {
    /// Builds a serializable snapshot of the current session state.
    ///
    /// Safe in any session state; before processing the option and
    /// argument lists are simply empty.
    pub fn dump(&self) -> DumpReport {
        DumpReport {
            argv: self.argv.clone(),
            definitions: self
                .specs
                .iter()
                .map(|spec| DefinitionReport {
                    name: spec.name().to_string(),
                    id: spec.id(),
                    kind: spec.kind(),
                    alias: spec.alias().map(String::from),
                    required: spec.is_required(),
                    has_argument: spec.has_argument(),
                    argument_required: spec.is_argument_required(),
                    multiple: spec.is_multiple(),
                    exclusive: spec.is_exclusive(),
                })
                .collect(),
            options: self
                .parsed
                .iter()
                .map(|option| ParsedOptionReport {
                    name: option.name().to_string(),
                    id: option.id(),
                    negated: option.is_negated(),
                    occurrences: option.occurrences(),
                    values: option.values().to_vec(),
                })
                .collect(),
            arguments: self.positionals.clone(),
        }
    }
}
