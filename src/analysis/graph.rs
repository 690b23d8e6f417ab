use crate::model::Package;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, HashMap};

/// Package-level import graph. Nodes are package directories, edges point
/// from an importer to the package it imports.
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn build(packages: &[Package]) -> Self {
        let mut dep_graph = Self::empty();

        for package in packages {
            dep_graph.ensure_node(&package.path);
        }

        for package in packages {
            for import in &package.imports {
                dep_graph.add_dependency(&package.path, import);
            }
        }

        dep_graph
    }

    /// Build directly from a `package -> dependencies` mapping.
    pub fn from_adjacency<I, K, D, S>(adjacency: I) -> Self
    where
        I: IntoIterator<Item = (K, D)>,
        K: AsRef<str>,
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dep_graph = Self::empty();

        for (package, deps) in adjacency {
            dep_graph.ensure_node(package.as_ref());
            for dep in deps {
                dep_graph.add_dependency(package.as_ref(), dep.as_ref());
            }
        }

        dep_graph
    }

    fn empty() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        }
    }

    fn ensure_node(&mut self, package: &str) -> NodeIndex {
        if let Some(idx) = self.node_indices.get(package) {
            return *idx;
        }
        let idx = self.graph.add_node(package.to_string());
        self.node_indices.insert(package.to_string(), idx);
        idx
    }

    /// Self-imports are dropped and repeated edges collapse into one.
    fn add_dependency(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);
        self.graph.update_edge(from_idx, to_idx, ());
    }

    pub fn graph(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    pub fn node_index(&self, package: &str) -> Option<NodeIndex> {
        self.node_indices.get(package).copied()
    }

    pub fn contains(&self, package: &str) -> bool {
        self.node_indices.contains_key(package)
    }

    pub fn package_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All packages, sorted.
    pub fn packages(&self) -> Vec<&str> {
        let mut packages: Vec<&str> = self.node_indices.keys().map(|k| k.as_str()).collect();
        packages.sort_unstable();
        packages
    }

    /// Packages imported by `package`, sorted.
    pub fn dependencies(&self, package: &str) -> Vec<&str> {
        self.neighbors(package, Direction::Outgoing)
    }

    /// Packages importing `package`, sorted.
    pub fn dependents(&self, package: &str) -> Vec<&str> {
        self.neighbors(package, Direction::Incoming)
    }

    fn neighbors(&self, package: &str, direction: Direction) -> Vec<&str> {
        let Some(idx) = self.node_index(package) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Sorted neighbour indices, the order the cycle search walks them in.
    pub(crate) fn sorted_successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut successors: Vec<NodeIndex> = self.graph.neighbors(idx).collect();
        successors.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        successors
    }

    pub fn fan_in(&self, package: &str) -> usize {
        self.node_index(package)
            .map(|idx| self.graph.neighbors_directed(idx, Direction::Incoming).count())
            .unwrap_or(0)
    }

    pub fn fan_out(&self, package: &str) -> usize {
        self.node_index(package)
            .map(|idx| self.graph.neighbors_directed(idx, Direction::Outgoing).count())
            .unwrap_or(0)
    }

    /// Sorted adjacency view, stable across runs.
    pub fn adjacency(&self) -> BTreeMap<String, Vec<String>> {
        self.packages()
            .into_iter()
            .map(|package| {
                let deps = self
                    .dependencies(package)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                (package.to_string(), deps)
            })
            .collect()
    }
}
