//! Renderers for the package dependency graph (`layercheck graph`).

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::io::Write;

type Adjacency = BTreeMap<String, Vec<String>>;

fn cycle_edges(cycles: &[Vec<String>]) -> HashSet<(&str, &str)> {
    let mut edges = HashSet::new();
    for cycle in cycles {
        for (i, from) in cycle.iter().enumerate() {
            let to = &cycle[(i + 1) % cycle.len()];
            edges.insert((from.as_str(), to.as_str()));
        }
    }
    edges
}

/// One line per package: `pkg -> dep, dep`.
pub fn render_graph_text<W: Write>(adjacency: &Adjacency, writer: &mut W) -> std::io::Result<()> {
    for (package, deps) in adjacency {
        if deps.is_empty() {
            writeln!(writer, "{}", package)?;
        } else {
            writeln!(writer, "{} -> {}", package, deps.join(", "))?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonGraph<'a> {
    packages: usize,
    edges: usize,
    dependencies: &'a Adjacency,
    cycles: &'a [Vec<String>],
}

pub fn render_graph_json<W: Write>(
    adjacency: &Adjacency,
    cycles: &[Vec<String>],
    writer: &mut W,
) -> std::io::Result<()> {
    let graph = JsonGraph {
        packages: adjacency.len(),
        edges: adjacency.values().map(Vec::len).sum(),
        dependencies: adjacency,
        cycles,
    };
    let json = serde_json::to_string_pretty(&graph).map_err(std::io::Error::other)?;
    writeln!(writer, "{}", json)
}

/// Graphviz DOT. Edges that sit on a cycle are drawn red.
pub fn render_dot<W: Write>(
    adjacency: &Adjacency,
    cycles: &[Vec<String>],
    writer: &mut W,
) -> std::io::Result<()> {
    let on_cycle = cycle_edges(cycles);

    writeln!(writer, "digraph imports {{")?;
    writeln!(writer, "  rankdir=LR;")?;
    writeln!(writer, "  node [shape=box, fontname=\"monospace\"];")?;

    for package in adjacency.keys() {
        writeln!(writer, "  \"{}\";", escape(package))?;
    }
    for (package, deps) in adjacency {
        for dep in deps {
            let style = if on_cycle.contains(&(package.as_str(), dep.as_str())) {
                " [color=red, penwidth=2]"
            } else {
                ""
            };
            writeln!(
                writer,
                "  \"{}\" -> \"{}\"{};",
                escape(package),
                escape(dep),
                style
            )?;
        }
    }

    writeln!(writer, "}}")
}

fn escape(id: &str) -> String {
    id.replace('\\', "\\\\").replace('"', "\\\"")
}
