use crate::analysis::DependencyGraph;
use crate::model::Issue;
use petgraph::graph::NodeIndex;
use std::collections::BTreeSet;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not reached yet.
    White,
    /// On the current DFS path.
    Gray,
    /// Fully explored.
    Black,
}

pub fn detect_circular_dependencies(graph: &DependencyGraph) -> Vec<Issue> {
    find_cycles(graph)
        .into_iter()
        .map(Issue::circular_dependency)
        .collect()
}

/// Find import cycles with a three-color depth-first search.
///
/// Reaching a gray node closes a cycle, which is read off the current path
/// from that node onwards. Each cycle is rotated to start at its smallest
/// package, so one loop found from different entry points is reported
/// once. Roots and successors are visited in sorted order, and the result
/// is sorted.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Vec<String>> {
    let pg = graph.graph();
    let mut color = vec![Color::White; pg.node_count()];
    let mut cycles: BTreeSet<Vec<String>> = BTreeSet::new();

    for root in graph.packages() {
        let Some(root_idx) = graph.node_index(root) else {
            continue;
        };
        if color[root_idx.index()] != Color::White {
            continue;
        }

        // Explicit stack of (node, sorted successors, next successor to try).
        let mut stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> = Vec::new();
        let mut path: Vec<NodeIndex> = Vec::new();

        color[root_idx.index()] = Color::Gray;
        path.push(root_idx);
        stack.push((root_idx, graph.sorted_successors(root_idx), 0));

        while let Some((node, successors, next)) = stack.last_mut() {
            let Some(&succ) = successors.get(*next) else {
                color[node.index()] = Color::Black;
                path.pop();
                stack.pop();
                continue;
            };
            *next += 1;

            match color[succ.index()] {
                Color::White => {
                    color[succ.index()] = Color::Gray;
                    path.push(succ);
                    stack.push((succ, graph.sorted_successors(succ), 0));
                }
                Color::Gray => {
                    if let Some(start) = path.iter().position(|&n| n == succ) {
                        let cycle: Vec<String> =
                            path[start..].iter().map(|&n| pg[n].clone()).collect();
                        cycles.insert(canonicalize_cycle(&cycle));
                    }
                }
                Color::Black => {}
            }
        }
    }

    cycles.into_iter().collect()
}

/// Rotate a cycle so it starts at its lexicographically smallest member.
pub fn canonicalize_cycle(cycle: &[String]) -> Vec<String> {
    let Some(min_pos) = cycle
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(pos, _)| pos)
    else {
        return Vec::new();
    };

    cycle[min_pos..]
        .iter()
        .chain(cycle[..min_pos].iter())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
        DependencyGraph::from_adjacency(edges.iter().map(|(k, v)| (*k, v.iter().copied())))
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_three_node_cycle() {
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let cycles = find_cycles(&g);

        assert_eq!(cycles, vec![strings(&["a", "b", "c"])]);

        let issues = detect_circular_dependencies(&g);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Circular dependency: a -> b -> c -> a");
    }

    #[test]
    fn test_acyclic_chain_has_no_cycles() {
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        assert!(find_cycles(&g).is_empty());
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let g = graph(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &["d"]), ("d", &[])]);
        assert!(find_cycles(&g).is_empty());
    }

    #[test]
    fn test_same_cycle_found_regardless_of_entry_point() {
        // "0" sorts first and enters the loop at c, so the raw path starts at c.
        let g = graph(&[
            ("0", &["c"]),
            ("a", &["b"]),
            ("b", &["c"]),
            ("c", &["a"]),
        ]);
        assert_eq!(find_cycles(&g), vec![strings(&["a", "b", "c"])]);
    }

    #[test]
    fn test_two_node_cycle_and_disjoint_components() {
        let g = graph(&[
            ("x", &["y"]),
            ("y", &["x"]),
            ("p", &["q"]),
            ("q", &["r"]),
            ("r", &["p"]),
            ("lonely", &[]),
        ]);
        assert_eq!(
            find_cycles(&g),
            vec![strings(&["p", "q", "r"]), strings(&["x", "y"])]
        );
    }

    #[test]
    fn test_cycle_reachable_only_through_finished_node() {
        // a finishes b's subtree before the loop through d is entered from c.
        let g = graph(&[
            ("a", &["b", "c"]),
            ("b", &[]),
            ("c", &["d"]),
            ("d", &["c"]),
        ]);
        assert_eq!(find_cycles(&g), vec![strings(&["c", "d"])]);
    }

    #[test]
    fn test_canonicalize_rotates_to_minimum() {
        assert_eq!(
            canonicalize_cycle(&strings(&["c", "a", "b"])),
            strings(&["a", "b", "c"])
        );
        assert_eq!(
            canonicalize_cycle(&strings(&["pkg/z", "pkg/m", "pkg/q"])),
            strings(&["pkg/m", "pkg/q", "pkg/z"])
        );
        assert!(canonicalize_cycle(&[]).is_empty());
    }

    #[test]
    fn test_every_rotation_canonicalizes_identically() {
        let cycle = strings(&["d", "b", "e", "a", "c"]);
        let expected = canonicalize_cycle(&cycle);
        assert_eq!(expected[0], "a");

        for shift in 0..cycle.len() {
            let mut rotated = cycle.clone();
            rotated.rotate_left(shift);
            assert_eq!(canonicalize_cycle(&rotated), expected);
        }
    }
}
