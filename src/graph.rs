//! Reference graph module.
//!
//! Provides the `ReferenceGraph` type, which records which matches and
//! groups every team slot depends on. It is built whenever stages are added
//! to a competition and enforces the structural reference rules:
//!
//! - every referenced stage, group and match exists;
//! - a reference points at an earlier stage, or at an earlier match of its
//!   own group;
//! - a group never references its own ranking or positions;
//! - ranks are only taken from league groups.
//!
//! On top of those rules the graph is checked for cycles, so a competition
//! that passes validation can always be resolved without recursing forever.

use crate::error::{CompetitionError, Result};
use crate::group::{Group, GroupType};
use crate::reference::{Reference, SlotTarget};
use crate::stage::Stage;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// A directed graph of reference dependencies.
///
/// Nodes are `stage:group` for whole groups and `stage:group:match` for
/// single matches. If node A depends on node B, B must be decided before A
/// can be resolved.
///
/// # Examples
///
/// ```rust
/// use vbcomp::graph::ReferenceGraph;
///
/// let mut graph = ReferenceGraph::new();
/// graph.add_edge("F:KO:SF2", "F:KO:SF1");
/// assert!(graph.detect_cycles().is_ok());
///
/// graph.add_edge("F:KO:SF1", "F:KO:SF2");
/// assert!(graph.detect_cycles().is_err());
/// ```
#[derive(Debug, Default)]
pub struct ReferenceGraph {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl ReferenceGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a sequence of stages, in competition order,
    /// checking every reference as it goes.
    pub fn build(stages: &[Stage]) -> Result<Self> {
        let mut graph = Self::new();
        for (stage_no, stage) in stages.iter().enumerate() {
            for group in stage.groups() {
                graph.add_group(stages, stage_no, group)?;
            }
        }
        Ok(graph)
    }

    fn add_group(&mut self, stages: &[Stage], stage_no: usize, group: &Group) -> Result<()> {
        let stage_id = stages[stage_no].id();
        let group_node = format!("{}:{}", stage_id, group.id());
        self.add_node(&group_node);
        for m in group.matches() {
            self.add_edge(&group_node, &format!("{}:{}", group_node, m.id()));
        }

        for (entry, slot) in group.slots() {
            let Some(reference) = slot.as_reference() else {
                continue;
            };
            let owner = match entry.and_then(|i| group.entries()[i].as_match()) {
                Some(m) => format!("{}:{}", group_node, m.id()),
                None => group_node.clone(),
            };
            let target = check_reference(stages, stage_no, group, entry, reference)?;
            self.add_edge(&owner, &target);
        }
        Ok(())
    }

    /// Add a node if it doesn't exist and return its index.
    pub fn add_node(&mut self, node: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(node) {
            idx
        } else {
            let idx = self.graph.add_node(node.to_string());
            self.node_map.insert(node.to_string(), idx);
            idx
        }
    }

    /// Record that `from` depends on `to`.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);
        self.graph.add_edge(to_idx, from_idx, ());
    }

    /// Whether a node with this name has been added.
    pub fn contains_node(&self, node: &str) -> bool {
        self.node_map.contains_key(node)
    }

    /// Nodes that `node` depends on directly.
    pub fn dependencies(&self, node: &str) -> Vec<&str> {
        let Some(&idx) = self.node_map.get(node) else {
            return Vec::new();
        };
        let mut deps: Vec<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| self.graph[n].as_str())
            .collect();
        deps.sort_unstable();
        deps.dedup();
        deps
    }

    /// Detect dependency cycles with a depth-first search.
    ///
    /// The error carries the closed cycle path, e.g. `A -> B -> A`.
    pub fn detect_cycles(&self) -> Result<()> {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();

        for node_idx in self.graph.node_indices() {
            if !visited.contains(&node_idx) {
                let mut cycle_path = Vec::new();
                if let Some(cycle) = self.dfs_cycle_detect(node_idx, &mut visited, &mut rec_stack, &mut cycle_path) {
                    return Err(cycle);
                }
            }
        }
        Ok(())
    }

    fn dfs_cycle_detect(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        rec_stack: &mut HashSet<NodeIndex>,
        cycle_path: &mut Vec<NodeIndex>,
    ) -> Option<CompetitionError> {
        visited.insert(node);
        rec_stack.insert(node);
        cycle_path.push(node);

        for neighbor in self.graph.neighbors_directed(node, Direction::Outgoing) {
            if !visited.contains(&neighbor) {
                if let Some(cycle) = self.dfs_cycle_detect(neighbor, visited, rec_stack, cycle_path) {
                    return Some(cycle);
                }
            } else if rec_stack.contains(&neighbor) {
                let start = cycle_path.iter().position(|&n| n == neighbor).unwrap_or(0);
                let mut path: Vec<String> = cycle_path[start..]
                    .iter()
                    .map(|&n| self.graph[n].clone())
                    .collect();
                path.push(self.graph[neighbor].clone());
                return Some(CompetitionError::ReferenceCycle { path });
            }
        }

        rec_stack.remove(&node);
        cycle_path.pop();
        None
    }
}

/// Check a reference held by `group` (in stage `stage_no`) and return the
/// node it depends on. `entry` is the index of the owning match, or `None`
/// for group-level slots.
fn check_reference(
    stages: &[Stage],
    stage_no: usize,
    group: &Group,
    entry: Option<usize>,
    reference: &Reference,
) -> Result<String> {
    let invalid = |reason: &str| {
        CompetitionError::Validation(format!(
            "Invalid team reference \"{}\" in group \"{}\" of stage \"{}\": {}",
            reference,
            group.id(),
            stages[stage_no].id(),
            reason
        ))
    };

    let target_no = stages
        .iter()
        .position(|s| s.id() == &reference.stage)
        .ok_or_else(|| CompetitionError::UnknownStage(reference.stage.to_string()))?;
    if target_no > stage_no {
        return Err(invalid("it refers to a later stage"));
    }
    let target_group = stages[target_no].get_group(&reference.group)?;
    let same_stage = target_no == stage_no;
    if same_stage && target_group.id() != group.id() {
        return Err(invalid("groups in the same stage cannot refer to each other"));
    }

    let group_node = format!("{}:{}", reference.stage, reference.group);
    match &reference.target {
        SlotTarget::Winner(match_id) | SlotTarget::Loser(match_id) => {
            target_group.get_match(match_id)?;
            if same_stage {
                if let (Some(own), Some(target)) = (entry, target_group.match_position(match_id)) {
                    if target >= own {
                        return Err(invalid("it refers to a match that is not declared before it"));
                    }
                }
            }
            Ok(format!("{}:{}", group_node, match_id))
        }
        SlotTarget::Rank(_) | SlotTarget::Position(_) => {
            if same_stage {
                return Err(invalid("a group cannot refer to its own positions"));
            }
            if matches!(reference.target, SlotTarget::Rank(_)) && target_group.group_type() != GroupType::League {
                return Err(invalid("ranks can only be taken from a league"));
            }
            Ok(group_node)
        }
    }
}
