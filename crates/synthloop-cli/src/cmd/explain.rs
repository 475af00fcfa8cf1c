//! `synthloop explain`: how two items relate through the ingredient rule.

use std::io::Write;

use clap::Args;
use serde::Serialize;
use synthloop_core::Relation;

use crate::cmd::{CatalogArgs, Session};
use crate::output::{LinkView, OutputMode, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// First item name.
    pub a: String,

    /// Second item name.
    pub b: String,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum RelationKind {
    Mutual,
    Forward,
    Backward,
    Unrelated,
}

#[derive(Debug, Serialize)]
struct ExplainOutput {
    a: String,
    b: String,
    relation: RelationKind,
    links: Vec<LinkView>,
}

impl ExplainOutput {
    fn new(a: &str, b: &str, relation: &Relation<'_>) -> Self {
        let (kind, links) = match relation {
            Relation::Mutual { forward, backward } => (
                RelationKind::Mutual,
                vec![LinkView::from(forward), LinkView::from(backward)],
            ),
            Relation::Forward(link) => (RelationKind::Forward, vec![LinkView::from(link)]),
            Relation::Backward(link) => (RelationKind::Backward, vec![LinkView::from(link)]),
            Relation::Unrelated => (RelationKind::Unrelated, Vec::new()),
        };
        Self {
            a: a.to_string(),
            b: b.to_string(),
            relation: kind,
            links,
        }
    }

    fn summary(&self) -> String {
        match self.relation {
            RelationKind::Mutual => {
                format!("{} and {} can each be crafted from the other", self.a, self.b)
            }
            RelationKind::Forward => format!("{} is an ingredient of {}", self.a, self.b),
            RelationKind::Backward => format!("{} is an ingredient of {}", self.b, self.a),
            RelationKind::Unrelated => format!("No relation between {} and {}", self.a, self.b),
        }
    }
}

/// Execute `synthloop explain <a> <b>`.
///
/// # Errors
///
/// Returns an error if either item is unknown or output rendering fails.
pub fn run_explain(
    args: &ExplainArgs,
    output: OutputMode,
    session: &Session,
) -> anyhow::Result<()> {
    let relation = session.query().explain(&args.a, &args.b)?;
    let payload = ExplainOutput::new(&args.a, &args.b, &relation);
    render_mode(output, &payload, render_text, |p, w| render_human(p, w, output))
}

fn render_human(
    payload: &ExplainOutput,
    w: &mut dyn Write,
    output: OutputMode,
) -> std::io::Result<()> {
    pretty_section(w, &payload.summary())?;
    for link in &payload.links {
        if output.is_pretty() {
            writeln!(w, "{}", link.painted())?;
        } else {
            writeln!(w, "{}", link.plain())?;
        }
    }
    Ok(())
}

fn render_text(payload: &ExplainOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if payload.links.is_empty() {
        return writeln!(w, "unrelated");
    }
    for link in &payload.links {
        writeln!(w, "{}", link.plain())?;
    }
    Ok(())
}
