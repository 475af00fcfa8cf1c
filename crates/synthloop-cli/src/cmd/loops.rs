//! `synthloop loops`: crafting loop discovery.
//!
//! Subcommands:
//! - `synthloop loops pairs [--item NAME]`: mutually related items (2-loops)
//! - `synthloop loops find --size N [START]`: loops of exactly N items
//!
//! A START beginning with `(` is a category tag; the search then starts from
//! every craftable item carrying it.

use std::io::Write;
use std::time::Duration;

use clap::{Args, Subcommand};
use serde::Serialize;
use synthloop_core::{Loop, PairScope, SearchOptions, Start};

use crate::cmd::{CatalogArgs, Session};
use crate::output::{
    LinkView, OutputMode, pretty_rule, pretty_section, render_mode, render_notice,
};

// ---------------------------------------------------------------------------
// Clap types
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct LoopsArgs {
    #[command(subcommand)]
    pub command: LoopsCommand,
}

impl LoopsArgs {
    /// `-c/--catalog` values given after `pairs` or `find`.
    pub fn catalogs(&self) -> &[std::path::PathBuf] {
        match &self.command {
            LoopsCommand::Pairs(args) => &args.catalog.catalogs,
            LoopsCommand::Find(args) => &args.catalog.catalogs,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum LoopsCommand {
    #[command(
        about = "List pairs of items that can each be crafted from the other",
        after_help = "EXAMPLES:\n    # Every mutual pair in the catalog\n    synthloop loops pairs\n\n    # Partners of one item\n    synthloop loops pairs --item Craft"
    )]
    Pairs(PairsArgs),

    #[command(
        about = "Find crafting loops of an exact size",
        after_help = "EXAMPLES:\n    # All 3-item loops\n    synthloop loops find --size 3\n\n    # 4-item loops starting at Uni that pass through Craft\n    synthloop loops find -n 4 Uni --having Craft\n\n    # Start from any craftable (Fuel) item, one line per loop\n    synthloop loops find -n 3 \"(Fuel)\" -S"
    )]
    Find(FindArgs),
}

/// Arguments for `synthloop loops pairs`.
#[derive(Args, Debug)]
pub struct PairsArgs {
    /// Only list partners of this item.
    #[arg(long)]
    pub item: Option<String>,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Arguments for `synthloop loops find`.
#[derive(Args, Debug)]
pub struct FindArgs {
    /// Number of distinct items in each loop.
    #[arg(short = 'n', long)]
    pub size: usize,

    /// Start item name, or a category tag such as "(Fuel)".
    pub start: Option<String>,

    /// Start from every craftable item in this category (tag may omit the parentheses).
    #[arg(long, conflicts_with = "start")]
    pub category: Option<String>,

    /// Only keep loops that contain this item (repeatable).
    #[arg(short = 'i', long = "having", value_name = "NAME")]
    pub having: Vec<String>,

    /// Print each loop as a single line of names.
    #[arg(short = 'S', long)]
    pub simplified: bool,

    /// Keep one rotation of each loop.
    #[arg(long)]
    pub unique: bool,

    /// Stop after this many search steps.
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Stop after this many milliseconds.
    #[arg(long)]
    pub max_millis: Option<u64>,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

impl FindArgs {
    fn start(&self) -> Start {
        match &self.category {
            Some(tag) if tag.trim().starts_with('(') => Start::Category(tag.trim().to_string()),
            Some(tag) => Start::Category(format!("({})", tag.trim())),
            None => Start::parse(self.start.as_deref()),
        }
    }

    fn options(&self, configured: SearchOptions) -> SearchOptions {
        let mut options = configured;
        if let Some(steps) = self.max_steps {
            options.budget.max_steps = Some(steps);
        }
        if let Some(millis) = self.max_millis {
            options.budget.max_duration = Some(Duration::from_millis(millis));
        }
        options.unique_rotations |= self.unique;
        options
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct LoopView {
    members: Vec<String>,
    links: Vec<LinkView>,
}

impl LoopView {
    fn new(session: &Session, cycle: &Loop<'_>) -> Self {
        let links = cycle
            .links()
            .filter_map(|(ingredient, crafted)| {
                session
                    .matcher
                    .uses_as_ingredient(crafted, ingredient)
                    .ok()
                    .map(|relation| LinkView::from(&relation))
            })
            .collect();
        Self {
            members: cycle.names().into_iter().map(str::to_string).collect(),
            links,
        }
    }

    /// `A -> B -> A`
    fn line(&self) -> String {
        let mut names = self.members.clone();
        if let Some(first) = self.members.first() {
            names.push(first.clone());
        }
        names.join(" -> ")
    }
}

#[derive(Debug, Serialize)]
struct PairsOutput {
    item: Option<String>,
    count: usize,
    pairs: Vec<LoopView>,
}

#[derive(Debug, Serialize)]
struct FindOutput {
    size: usize,
    start: String,
    having: Vec<String>,
    count: usize,
    steps: u64,
    truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stopped_at: Option<String>,
    #[serde(skip)]
    simplified: bool,
    loops: Vec<LoopView>,
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Execute `synthloop loops <subcommand>`.
///
/// # Errors
///
/// Returns an error for unknown items or categories, or if output rendering
/// fails.
pub fn run_loops(args: &LoopsArgs, output: OutputMode, session: &Session) -> anyhow::Result<()> {
    match &args.command {
        LoopsCommand::Pairs(a) => run_pairs(a, output, session),
        LoopsCommand::Find(a) => run_find(a, output, session),
    }
}

fn run_pairs(args: &PairsArgs, output: OutputMode, session: &Session) -> anyhow::Result<()> {
    let scope = args
        .item
        .as_ref()
        .map_or(PairScope::All, |name| PairScope::Item(name.clone()));
    let pairs = session.query().mutual_pairs(&scope)?;
    let pairs: Vec<LoopView> = pairs.iter().map(|pair| LoopView::new(session, pair)).collect();

    let payload = PairsOutput {
        item: args.item.clone(),
        count: pairs.len(),
        pairs,
    };
    render_mode(output, &payload, render_pairs_text, |p, w| {
        render_pairs_human(p, w, output)
    })
}

fn run_find(args: &FindArgs, output: OutputMode, session: &Session) -> anyhow::Result<()> {
    let start = args.start();
    let query = session
        .query()
        .with_options(args.options(session.options));
    let outcome = query.find_cycles(args.size, &start, &args.having)?;

    if let Some(exceeded) = &outcome.truncated {
        render_notice(output, &exceeded.to_string())?;
    }

    let loops: Vec<LoopView> = outcome
        .loops
        .iter()
        .map(|cycle| LoopView::new(session, cycle))
        .collect();
    let payload = FindOutput {
        size: args.size,
        start: start.to_string(),
        having: args.having.clone(),
        count: loops.len(),
        steps: outcome.steps,
        truncated: outcome.truncated.is_some(),
        stopped_at: outcome.truncated.map(|exceeded| exceeded.limit.to_string()),
        simplified: args.simplified,
        loops,
    };
    render_mode(output, &payload, render_find_text, |p, w| {
        render_find_human(p, w, output)
    })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn write_links(w: &mut dyn Write, links: &[LinkView], output: OutputMode) -> std::io::Result<()> {
    for link in links {
        if output.is_pretty() {
            writeln!(w, "  {}", link.painted())?;
        } else {
            writeln!(w, "  {}", link.plain())?;
        }
    }
    Ok(())
}

fn render_pairs_human(
    payload: &PairsOutput,
    w: &mut dyn Write,
    output: OutputMode,
) -> std::io::Result<()> {
    let heading = match &payload.item {
        Some(item) => format!("Mutual partners of {item} ({})", payload.count),
        None => format!("Mutual pairs ({})", payload.count),
    };
    pretty_section(w, &heading)?;
    if payload.pairs.is_empty() {
        writeln!(w, "none")?;
    }
    for pair in &payload.pairs {
        writeln!(w, "{}", pair.members.join(" <-> "))?;
        write_links(w, &pair.links, output)?;
    }
    Ok(())
}

fn render_pairs_text(payload: &PairsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for pair in &payload.pairs {
        writeln!(w, "{}", pair.members.join("\t"))?;
    }
    Ok(())
}

fn render_find_human(
    payload: &FindOutput,
    w: &mut dyn Write,
    output: OutputMode,
) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!(
            "{} loops of size {} from {}",
            payload.count, payload.size, payload.start
        ),
    )?;
    if payload.loops.is_empty() {
        writeln!(w, "no loops found")?;
        return Ok(());
    }
    for (n, cycle) in payload.loops.iter().enumerate() {
        if payload.simplified {
            writeln!(w, "{}", cycle.line())?;
            continue;
        }
        if n > 0 {
            pretty_rule(w)?;
        }
        writeln!(w, "{}", cycle.line())?;
        write_links(w, &cycle.links, output)?;
    }
    Ok(())
}

fn render_find_text(payload: &FindOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for cycle in &payload.loops {
        if payload.simplified {
            writeln!(w, "{}", cycle.line())?;
        } else {
            let steps: Vec<String> = cycle.links.iter().map(LinkView::plain).collect();
            writeln!(w, "{}", steps.join(" | "))?;
        }
    }
    Ok(())
}
