//! `synthloop uses` / `synthloop ingredients`: one-step craft neighbours.
//!
//! `uses NAME` lists what NAME can be an ingredient for; `ingredients NAME`
//! lists what NAME can be crafted from. Each line carries the requirement
//! that matched.

use std::io::Write;

use clap::Args;
use serde::Serialize;
use synthloop_core::Item;

use crate::cmd::{CatalogArgs, Session};
use crate::output::{LinkView, OutputMode, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct UsesArgs {
    /// Exact item name.
    pub name: String,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

#[derive(Args, Debug)]
pub struct IngredientsArgs {
    /// Exact item name.
    pub name: String,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Direction {
    UsedIn,
    MadeFrom,
}

#[derive(Debug, Serialize)]
struct NeighbourOutput {
    item: String,
    direction: Direction,
    links: Vec<LinkView>,
}

/// Execute `synthloop uses <name>`.
///
/// # Errors
///
/// Returns an error if the item is unknown or output rendering fails.
pub fn run_uses(args: &UsesArgs, output: OutputMode, session: &Session) -> anyhow::Result<()> {
    let query = session.query();
    let item = query.lookup(&args.name)?;
    let consumers = query.consumers_of(&args.name)?;
    let payload = neighbours(session, item, &consumers, Direction::UsedIn);
    render_mode(output, &payload, render_text, |p, w| render_human(p, w, output))
}

/// Execute `synthloop ingredients <name>`.
///
/// # Errors
///
/// Returns an error if the item is unknown or output rendering fails.
pub fn run_ingredients(
    args: &IngredientsArgs,
    output: OutputMode,
    session: &Session,
) -> anyhow::Result<()> {
    let query = session.query();
    let item = query.lookup(&args.name)?;
    let ingredients = query.ingredients_of(&args.name)?;
    let payload = neighbours(session, item, &ingredients, Direction::MadeFrom);
    render_mode(output, &payload, render_text, |p, w| render_human(p, w, output))
}

fn neighbours(
    session: &Session,
    item: &Item,
    others: &[&Item],
    direction: Direction,
) -> NeighbourOutput {
    let links = others
        .iter()
        .filter_map(|other| {
            let (crafted, ingredient) = match direction {
                Direction::UsedIn => (*other, item),
                Direction::MadeFrom => (item, *other),
            };
            session
                .matcher
                .uses_as_ingredient(crafted, ingredient)
                .ok()
                .map(|relation| LinkView::from(&relation))
        })
        .collect();
    NeighbourOutput {
        item: item.name.clone(),
        direction,
        links,
    }
}

fn render_human(
    payload: &NeighbourOutput,
    w: &mut dyn Write,
    output: OutputMode,
) -> std::io::Result<()> {
    let heading = match payload.direction {
        Direction::UsedIn => "is used in",
        Direction::MadeFrom => "is made from",
    };
    let heading = format!("{} {heading} ({})", payload.item, payload.links.len());
    pretty_section(w, &heading)?;
    if payload.links.is_empty() {
        writeln!(w, "nothing")?;
    }
    for link in &payload.links {
        if output.is_pretty() {
            writeln!(w, "{}", link.painted())?;
        } else {
            writeln!(w, "{}", link.plain())?;
        }
    }
    Ok(())
}

fn render_text(payload: &NeighbourOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for link in &payload.links {
        let other = match payload.direction {
            Direction::UsedIn => &link.item,
            Direction::MadeFrom => &link.ingredient,
        };
        writeln!(w, "{other}\t{}", link.requirement)?;
    }
    Ok(())
}
