//! `synthloop show`: display one catalog item and its immediate neighbours.

use std::io::Write;

use clap::Args;
use serde::Serialize;

use crate::cmd::{CatalogArgs, ItemView, Session, names};
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Exact item name.
    pub name: String,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Item detail as returned in JSON output.
#[derive(Debug, Serialize)]
pub struct ShowItem {
    #[serde(flatten)]
    pub item: ItemView,
    pub craftable: bool,
    /// Items that can be crafted using this one.
    pub used_in: Vec<String>,
    /// Items this one can be crafted from.
    pub made_from: Vec<String>,
}

/// Execute `synthloop show <name>`.
///
/// # Errors
///
/// Returns an error if the item is unknown or output rendering fails.
pub fn run_show(args: &ShowArgs, output: OutputMode, session: &Session) -> anyhow::Result<()> {
    let query = session.query();
    let item = query.lookup(&args.name)?;

    let show_item = ShowItem {
        item: ItemView::from(item),
        craftable: item.is_craftable(),
        used_in: names(&query.consumers_of(&args.name)?),
        made_from: names(&query.ingredients_of(&args.name)?),
    };

    render_mode(output, &show_item, render_show_text, render_show_human)
}

fn render_show_human(show: &ShowItem, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &show.item.name)?;
    pretty_kv(w, "categories", show.item.categories.join(", "))?;
    if show.craftable {
        pretty_kv(w, "recipe", show.item.recipe.join(", "))?;
    } else {
        pretty_kv(w, "recipe", "(raw material)")?;
    }
    if !show.item.effects.is_empty() {
        pretty_kv(w, "effects", show.item.effects.join(", "))?;
    }
    pretty_rule(w)?;
    pretty_kv(w, "used in", list_or_none(&show.used_in))?;
    pretty_kv(w, "made from", list_or_none(&show.made_from))?;
    Ok(())
}

fn render_show_text(show: &ShowItem, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "name: {}", show.item.name)?;
    writeln!(w, "categories: {}", show.item.categories.join("; "))?;
    writeln!(w, "recipe: {}", show.item.recipe.join("; "))?;
    if !show.item.effects.is_empty() {
        writeln!(w, "effects: {}", show.item.effects.join("; "))?;
    }
    writeln!(w, "used_in: {}", show.used_in.join("; "))?;
    writeln!(w, "made_from: {}", show.made_from.join("; "))?;
    Ok(())
}

fn list_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}
