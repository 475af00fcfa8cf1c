//! `synthloop search`: find items by name fragment or category tag.

use std::io::Write;

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use synthloop_core::Item;

use crate::cmd::{CatalogArgs, ItemView, Session};
use crate::output::{OutputMode, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Name fragment (case-insensitive), or a category tag when it starts with "(".
    pub term: String,

    /// Treat TERM as a category tag even without a leading "(".
    #[arg(long)]
    pub category: bool,

    /// Only list items that have a recipe.
    #[arg(long)]
    pub craftable: bool,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

#[derive(Debug, Serialize)]
struct SearchOutput {
    term: String,
    by: &'static str,
    items: Vec<ItemView>,
}

/// Execute `synthloop search <term>`.
///
/// # Errors
///
/// Returns an error if output rendering fails.
pub fn run_search(args: &SearchArgs, output: OutputMode, session: &Session) -> anyhow::Result<()> {
    let (by, hits) = find(args, session);
    let payload = SearchOutput {
        term: args.term.clone(),
        by,
        items: hits.into_iter().map(ItemView::from).collect(),
    };

    render_mode(output, &payload, render_search_text, render_search_human)
}

fn find<'s>(args: &SearchArgs, session: &'s Session) -> (&'static str, Vec<&'s Item>) {
    let query = session.query();
    let term = args.term.trim();
    if args.category && !term.starts_with('(') {
        let hits = session
            .catalog
            .find_by_category(term)
            .into_iter()
            .filter(|item| !args.craftable || item.is_craftable())
            .collect();
        return ("category", hits);
    }
    let by = if term.starts_with('(') { "category" } else { "name" };
    (by, query.search(term, args.craftable))
}

fn render_search_human(payload: &SearchOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!(
            "Matches for {} by {} ({})",
            payload.term, payload.by, payload.items.len()
        ),
    )?;
    if payload.items.is_empty() {
        writeln!(w, "no matching items")?;
        return Ok(());
    }
    for item in &payload.items {
        writeln!(
            w,
            "{:<28} {}",
            item.name,
            item.categories.join(" ").magenta()
        )?;
    }
    Ok(())
}

fn render_search_text(payload: &SearchOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for item in &payload.items {
        writeln!(w, "{}", item.name)?;
    }
    Ok(())
}
