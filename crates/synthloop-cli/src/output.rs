//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: colored, sectioned output for humans, compact text for
//! pipes, or stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `output` in the user config file
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

use synthloop_core::config::normalize_output_mode;
use synthloop_core::loader::LoadError;
use synthloop_core::matcher::UsesRelation;
use synthloop_core::{ErrorCode, NotFound, SearchBudgetExceeded};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{}", heading.bold())?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<14} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, colors).
    Pretty,
    /// Plain text, one record per line.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Returns `true` if pretty output was requested.
    pub const fn is_pretty(self) -> bool {
        matches!(self, Self::Pretty)
    }

    fn from_name(name: &str) -> Option<Self> {
        match normalize_output_mode(name)? {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            _ => Some(Self::Pretty),
        }
    }
}

/// Core resolution logic, separated from I/O for testability.
///
/// `format_flag`: explicit `--format` value if provided.
/// `json_flag`: hidden `--json` alias.
/// `format_env`: the value of `FORMAT` if set.
/// `user_output`: `output` from the user config file.
/// `is_tty`: true if stdout is a TTY.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    user_output: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    // Unknown values fall through to the next source.
    if let Some(mode) = format_env.and_then(OutputMode::from_name) {
        return mode;
    }
    if let Some(mode) = user_output.and_then(OutputMode::from_name) {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, user config and TTY
/// defaults.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    user_output: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(format_flag, json_flag, env_val.as_deref(), user_output, is_tty)
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Crafting relations
// ────────────────────────────────────────────────────────────────────────────

/// One "ingredient → crafted item" step, as it appears in JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct LinkView {
    pub ingredient: String,
    pub item: String,
    /// The recipe entry of `item` that was satisfied.
    pub requirement: String,
    /// The ingredient's name or category tag that satisfied it.
    pub matched: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<String>,
}

impl From<&UsesRelation<'_>> for LinkView {
    fn from(relation: &UsesRelation<'_>) -> Self {
        Self {
            ingredient: relation.ingredient.name.clone(),
            item: relation.item.name.clone(),
            requirement: relation.requirement.to_string(),
            matched: relation.matched_type().to_string(),
            effects: relation.item.effects.clone(),
        }
    }
}

impl LinkView {
    /// `Ore[(Ore)] -> [(Ore)]Ingot`, uncolored.
    pub fn plain(&self) -> String {
        format!(
            "{}[{}] -> [{}]{}",
            self.ingredient, self.matched, self.requirement, self.item
        )
    }

    /// Same layout as [`LinkView::plain`], with type labels in magenta,
    /// the arrow in blue and the crafted item's effects in yellow.
    pub fn painted(&self) -> String {
        let line = format!(
            "{}{} {} {}{}",
            self.ingredient,
            format!("[{}]", self.matched).magenta(),
            "->".blue(),
            format!("[{}]", self.requirement).magenta(),
            self.item
        );
        if self.effects.is_empty() {
            line
        } else {
            format!("{line}  {}", self.effects.join(", ").yellow())
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E2001").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create a simple error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }

    fn coded(message: String, code: ErrorCode) -> Self {
        Self {
            message,
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

/// Map a command failure to its code and hint where the cause is known.
impl From<&anyhow::Error> for CliError {
    fn from(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        if let Some(not_found) = err.downcast_ref::<NotFound>() {
            return Self::coded(message, not_found.code());
        }
        if let Some(load) = err.downcast_ref::<LoadError>() {
            return Self::coded(message, load.code());
        }
        if err.downcast_ref::<SearchBudgetExceeded>().is_some() {
            return Self::coded(message, ErrorCode::SearchBudgetExceeded);
        }
        if err.downcast_ref::<toml::de::Error>().is_some() {
            return Self::coded(message, ErrorCode::ConfigParseError);
        }
        Self::new(message)
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            match &error.error_code {
                Some(code) => writeln!(out, "error[{code}]: {}", error.message)?,
                None => writeln!(out, "error: {}", error.message)?,
            }
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Print a non-fatal notice to stderr (never in JSON mode).
pub fn render_notice(mode: OutputMode, message: &str) -> io::Result<()> {
    if mode.is_json() {
        return Ok(());
    }
    let stderr = io::stderr();
    let mut out = stderr.lock();
    if mode.is_pretty() {
        writeln!(out, "{} {message}", "note:".yellow().bold())
    } else {
        writeln!(out, "note: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthloop_core::Item;
    use synthloop_core::matcher::uses_as_ingredient;

    // ── resolve_output_mode_inner ───────────────────────────────────────────

    #[test]
    fn resolve_format_flag_wins_over_everything() {
        let mode = resolve_output_mode_inner(
            Some(OutputMode::Text),
            true,
            Some("pretty"),
            Some("json"),
            true,
        );
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_json_flag_wins_over_env() {
        let mode = resolve_output_mode_inner(None, true, Some("pretty"), None, true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_env_wins_over_user_config() {
        let mode = resolve_output_mode_inner(None, false, Some("TEXT"), Some("json"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_user_config_when_env_unknown() {
        let mode = resolve_output_mode_inner(None, false, Some("fancy"), Some("json"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_defaults_follow_tty() {
        assert_eq!(
            resolve_output_mode_inner(None, false, None, None, true),
            OutputMode::Pretty
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, None, Some("nonsense"), false),
            OutputMode::Text
        );
    }

    // ── LinkView ────────────────────────────────────────────────────────────

    #[test]
    fn link_view_plain_matches_relation_display() {
        let ingot = Item::new("Ingot")
            .with_recipe(["(Ore)"])
            .with_effects(["Sturdy"]);
        let ore = Item::new("Iron Ore").with_categories(["(Ore)"]);
        let relation = uses_as_ingredient(&ingot, &ore).expect("match");

        let view = LinkView::from(&relation);
        assert_eq!(view.plain(), relation.to_string());
        assert_eq!(view.effects, vec!["Sturdy"]);
    }

    #[test]
    fn link_view_painted_without_colors_keeps_layout() {
        colored::control::set_override(false);
        let view = LinkView {
            ingredient: "Uni".into(),
            item: "Craft".into(),
            requirement: "(Gunpowder)".into(),
            matched: "(Gunpowder)".into(),
            effects: vec!["Blast".into()],
        };
        assert_eq!(view.painted(), "Uni[(Gunpowder)] -> [(Gunpowder)]Craft  Blast");
        colored::control::unset_override();
    }

    // ── CliError ────────────────────────────────────────────────────────────

    #[test]
    fn not_found_maps_to_code_and_hint() {
        let err = anyhow::Error::new(NotFound::Item("Nope".into()));
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E2001"));
        assert!(cli.suggestion.is_some());
        assert_eq!(cli.message, "item not found: Nope");
    }

    #[test]
    fn context_preserves_downcast() {
        let err = anyhow::Error::new(LoadError::NoSources).context("loading catalog");
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E1002"));
        assert!(cli.message.starts_with("loading catalog"));
    }

    #[test]
    fn unknown_errors_have_no_code() {
        let err = anyhow::anyhow!("boom");
        let cli = CliError::from(&err);
        assert!(cli.error_code.is_none());
        assert_eq!(cli.message, "boom");
    }

    #[test]
    fn cli_error_json_omits_empty_fields() {
        let json = serde_json::to_value(CliError::new("oops")).expect("serialize");
        assert_eq!(json, serde_json::json!({"message": "oops"}));
    }
}
