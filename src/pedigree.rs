//! Pedigree graph derived from the family history.
//!
//! Nodes are keyed by role label (`Patient`, `Father`, ...) and edges run from
//! parent to child. Parents are roots; the patient and siblings form the
//! generation below them.

use crate::record::{FamilyHistoryEntry, Patient, Relative};
use crate::{Error, Result};
use log::debug;
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Node id used for the patient
pub const PATIENT_ID: &str = "Patient";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Patient,
    Relative(Relative),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PedigreeNode {
    /// Unique role label
    pub id: String,
    /// Display label (the patient's name for the patient node)
    pub label: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct Pedigree {
    graph: DiGraph<PedigreeNode, ()>,
    index: HashMap<String, NodeIndex>,
}

impl Pedigree {
    /// Build the pedigree for `patient` from the family history.
    ///
    /// A relative listed more than once becomes a single node. Edges are only
    /// drawn from parents that appear in the history.
    pub fn build(patient: &Patient, history: &[FamilyHistoryEntry]) -> Result<Self> {
        let mut pedigree = Pedigree {
            graph: DiGraph::new(),
            index: HashMap::new(),
        };
        pedigree.add_node(PedigreeNode {
            id: PATIENT_ID.to_string(),
            label: patient.name.clone(),
            role: Role::Patient,
        });

        let mut parents: Vec<NodeIndex> = Vec::new();
        let mut children: Vec<NodeIndex> = vec![pedigree.index[PATIENT_ID]];
        for entry in history {
            let rel = entry.relative;
            if pedigree.index.contains_key(rel.label()) {
                continue;
            }
            let idx = pedigree.add_node(PedigreeNode {
                id: rel.label().to_string(),
                label: rel.label().to_string(),
                role: Role::Relative(rel),
            });
            if rel.is_parent() {
                parents.push(idx);
            } else if rel.is_sibling() {
                children.push(idx);
            }
        }

        for &child in &children {
            for &parent in &parents {
                pedigree.graph.update_edge(parent, child, ());
            }
        }

        if is_cyclic_directed(&pedigree.graph) {
            return Err(Error::Pedigree("family graph contains a cycle".into()));
        }
        debug!(
            "built pedigree with {} nodes and {} edges",
            pedigree.node_count(),
            pedigree.edge_count()
        );
        Ok(pedigree)
    }

    fn add_node(&mut self, node: PedigreeNode) -> NodeIndex {
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in insertion order (patient first)
    pub fn nodes(&self) -> impl Iterator<Item = &PedigreeNode> {
        self.graph.node_indices().map(move |i| &self.graph[i])
    }

    pub fn node(&self, id: &str) -> Option<&PedigreeNode> {
        self.index.get(id).map(|&i| &self.graph[i])
    }

    /// Edges as `(parent id, child id)` pairs, in insertion order
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| {
                (
                    self.graph[e.source()].id.as_str(),
                    self.graph[e.target()].id.as_str(),
                )
            })
            .collect()
    }

    /// Ids of the nodes with an edge into `id`
    pub fn parents_of(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|p| self.graph[p].id.as_str())
            .collect();
        out.sort_unstable();
        out
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Generation of every node: roots are 0, each child sits one below its
    /// deepest parent. Returned in node insertion order.
    pub fn generations(&self) -> Result<Vec<(&PedigreeNode, usize)>> {
        let order = toposort(&self.graph, None)
            .map_err(|_| Error::Pedigree("family graph contains a cycle".into()))?;
        let mut depth: HashMap<NodeIndex, usize> = HashMap::new();
        for idx in order {
            let d = self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .filter_map(|p| depth.get(&p))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);
            depth.insert(idx, d);
        }
        Ok(self
            .graph
            .node_indices()
            .map(|i| (&self.graph[i], depth.get(&i).copied().unwrap_or(0)))
            .collect())
    }

    /// Graphviz DOT source for the pedigree
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph pedigree {\n");
        for node in self.nodes() {
            let _ = writeln!(
                out,
                "    \"{}\" [label=\"{}\"];",
                escape_dot(&node.id),
                escape_dot(&node.label)
            );
        }
        for (from, to) in self.edges() {
            let _ = writeln!(out, "    \"{}\" -> \"{}\";", escape_dot(from), escape_dot(to));
        }
        out.push_str("}\n");
        out
    }
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ClinicalRecord;

    fn sample() -> Pedigree {
        let r = ClinicalRecord::sample();
        Pedigree::build(&r.patient, &r.family_history).unwrap()
    }

    #[test]
    fn edges_follow_parent_child_order() {
        let p = sample();
        assert_eq!(
            p.edges(),
            vec![
                ("Father", "Patient"),
                ("Mother", "Patient"),
                ("Father", "Brother"),
                ("Mother", "Brother"),
                ("Father", "Sister"),
                ("Mother", "Sister"),
            ]
        );
    }

    #[test]
    fn patient_node_uses_name() {
        let p = sample();
        assert_eq!(p.node(PATIENT_ID).unwrap().label, "John Doe");
        assert_eq!(p.parents_of("Sister"), vec!["Father", "Mother"]);
    }

    #[test]
    fn duplicate_relatives_collapse() {
        let r = ClinicalRecord::sample();
        let mut history = r.family_history.clone();
        history.push(FamilyHistoryEntry {
            relative: Relative::Father,
            condition: "Gout".into(),
        });
        let p = Pedigree::build(&r.patient, &history).unwrap();
        assert_eq!(p.node_count(), 5);
        assert_eq!(p.edge_count(), 6);
    }

    #[test]
    fn siblings_without_parents_are_isolated() {
        let r = ClinicalRecord::sample();
        let history = vec![FamilyHistoryEntry {
            relative: Relative::Brother,
            condition: "None".into(),
        }];
        let p = Pedigree::build(&r.patient, &history).unwrap();
        assert_eq!(p.node_count(), 2);
        assert_eq!(p.edge_count(), 0);
    }

    #[test]
    fn generations_put_parents_on_top() {
        let p = sample();
        let gens = p.generations().unwrap();
        for (node, g) in gens {
            match node.role {
                Role::Relative(r) if r.is_parent() => assert_eq!(g, 0),
                _ => assert_eq!(g, 1),
            }
        }
    }

    #[test]
    fn dot_output() {
        let dot = sample().to_dot();
        assert!(dot.starts_with("digraph pedigree {"));
        assert!(dot.contains("\"Patient\" [label=\"John Doe\"];"));
        assert!(dot.contains("\"Mother\" -> \"Sister\";"));
        assert_eq!(escape_dot("a\"b"), "a\\\"b");
    }
}
