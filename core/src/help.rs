//! Usage/help rendering.
//!
//! A pure read-only consumer of the spec table: renders an aligned options
//! block with short/long markers, aliases, argument placeholders and
//! descriptions, in registration order. Hidden specs are skipped.

use std::fmt;

use crate::manager::OptionManager;
use crate::spec::{OptionSpec, ValueKind, dashed};

/// Placeholder for the option's argument in help text: `%s` string, `%i`
/// integer, `%f` float, `%b` boolean, `%a` untyped. Brackets mark an
/// optional argument.
fn argument_placeholder(spec: &OptionSpec) -> String {
    let symbol = match spec.kind() {
        ValueKind::Boolean => "%b",
        ValueKind::Float => "%f",
        ValueKind::Integer => "%i",
        ValueKind::String => "%s",
        ValueKind::None => "%a",
    };
    if spec.is_argument_required() {
        symbol.to_string()
    } else {
        format!("[{symbol}]")
    }
}

/// Left column of one help line: `-x|--alias %i` and friends.
fn option_label(spec: &OptionSpec) -> String {
    let mut label = dashed(spec.name());
    if let Some(alias) = spec.alias() {
        label.push('|');
        label.push_str(&dashed(alias));
    }
    if spec.has_argument() {
        label.push(' ');
        label.push_str(&argument_placeholder(spec));
    }
    label
}

impl OptionManager {
    /// Renders the options block, one aligned line per visible spec.
    ///
    /// `title` is printed on its own line first when non-empty. `padding`
    /// is the left indent (capped: anything above 32 falls back to 2).
    pub fn description(&self, title: &str, padding: usize) -> String {
        let padding = if padding > 32 { 2 } else { padding };
        let indent = " ".repeat(padding);

        let labels: Vec<(String, &str)> = self
            .specs
            .iter()
            .filter(|spec| !spec.is_hidden())
            .map(|spec| (option_label(spec), spec.description()))
            .collect();
        let width = labels
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        if !title.is_empty() {
            out.push_str(title);
            out.push('\n');
        }
        for (label, description) in labels {
            out.push_str(&indent);
            out.push_str(&label);
            for _ in label.chars().count()..width {
                out.push(' ');
            }
            out.push(' ');
            out.push_str(description);
            out.push('\n');
        }
        out
    }

    /// Full help text: credits, `Usage:` line and the options block.
    pub fn render_help(&self) -> String {
        let mut out = String::new();
        if !self.credits().is_empty() {
            out.push_str(self.credits());
            out.push('\n');
        }
        if !self.usage().is_empty() {
            out.push_str("Usage: ");
            out.push_str(self.usage());
            out.push('\n');
        }
        out.push_str(&self.description("Options:", 2));
        out
    }
}

impl fmt::Display for OptionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_help())
    }
}
