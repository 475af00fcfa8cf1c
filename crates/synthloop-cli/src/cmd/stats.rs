//! `synthloop stats`: catalog and craft graph summary.

use std::io::Write;

use clap::Args;
use serde::Serialize;
use synthloop_core::graph::GraphStats;

use crate::cmd::{CatalogArgs, Session};
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};

#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,
}

#[derive(Debug, Serialize)]
struct StatsOutput {
    #[serde(flatten)]
    graph: GraphStats,
    /// Names carried by more than one catalog entry.
    duplicate_names: Vec<String>,
}

/// Execute `synthloop stats`.
///
/// # Errors
///
/// Returns an error if output rendering fails.
pub fn run_stats(_args: &StatsArgs, output: OutputMode, session: &Session) -> anyhow::Result<()> {
    let payload = collect(session);
    render_mode(output, &payload, render_stats_text, render_stats_human)
}

fn collect(session: &Session) -> StatsOutput {
    StatsOutput {
        graph: session.query().stats(),
        duplicate_names: session
            .catalog
            .duplicate_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

fn render_stats_human(stats: &StatsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let g = &stats.graph;
    pretty_section(w, "Catalog")?;
    pretty_kv(w, "items", g.item_count.to_string())?;
    pretty_kv(w, "craftable", g.craftable_count.to_string())?;
    if !stats.duplicate_names.is_empty() {
        pretty_kv(w, "duplicates", stats.duplicate_names.join(", "))?;
    }
    pretty_rule(w)?;
    pretty_kv(w, "edges", g.edge_count.to_string())?;
    pretty_kv(w, "density", format!("{:.4}", g.density))?;
    pretty_kv(w, "in-degree max", g.max_in_degree.to_string())?;
    pretty_kv(w, "out-degree max", g.max_out_degree.to_string())?;
    pretty_rule(w)?;
    pretty_kv(w, "mutual pairs", g.mutual_pair_count.to_string())?;
    pretty_kv(
        w,
        "loop groups",
        format!("{} of {} components", g.cyclic_scc_count, g.scc_count),
    )?;
    pretty_kv(w, "on loops", g.items_on_cycles.to_string())?;
    pretty_kv(w, "longest loop", format!("<= {}", g.largest_scc))?;
    Ok(())
}

fn render_stats_text(stats: &StatsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let g = &stats.graph;
    writeln!(w, "items\t{}", g.item_count)?;
    writeln!(w, "craftable\t{}", g.craftable_count)?;
    writeln!(w, "edges\t{}", g.edge_count)?;
    writeln!(w, "density\t{:.4}", g.density)?;
    writeln!(w, "mutual_pairs\t{}", g.mutual_pair_count)?;
    writeln!(w, "sccs\t{}", g.scc_count)?;
    writeln!(w, "cyclic_sccs\t{}", g.cyclic_scc_count)?;
    writeln!(w, "largest_scc\t{}", g.largest_scc)?;
    writeln!(w, "items_on_cycles\t{}", g.items_on_cycles)?;
    writeln!(w, "max_in_degree\t{}", g.max_in_degree)?;
    writeln!(w, "max_out_degree\t{}", g.max_out_degree)?;
    if !stats.duplicate_names.is_empty() {
        writeln!(w, "duplicates\t{}", stats.duplicate_names.join("; "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testing::workshop_session;

    #[test]
    fn workshop_summary() {
        let stats = collect(&workshop_session());
        let g = &stats.graph;
        assert_eq!(g.item_count, 6);
        assert_eq!(g.craftable_count, 5);
        assert_eq!(g.edge_count, 6);
        assert_eq!(g.mutual_pair_count, 1);
        assert_eq!(g.scc_count, 3);
        assert_eq!(g.cyclic_scc_count, 2);
        assert_eq!(g.largest_scc, 3);
        assert_eq!(g.items_on_cycles, 5);
        assert!(stats.duplicate_names.is_empty());
    }

    #[test]
    fn json_flattens_graph_fields() {
        let json = serde_json::to_value(collect(&workshop_session())).expect("serialize");
        assert_eq!(json["item_count"], 6);
        assert_eq!(json["duplicate_names"], serde_json::json!([]));
    }

    #[test]
    fn text_is_tab_separated() {
        let mut buf = Vec::new();
        render_stats_text(&collect(&workshop_session()), &mut buf).expect("render");
        let out = String::from_utf8(buf).expect("utf8");
        assert!(out.starts_with("items\t6\ncraftable\t5\nedges\t6\n"));
        assert!(!out.contains("duplicates"));
    }
}
