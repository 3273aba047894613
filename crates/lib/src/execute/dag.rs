//! Cycle check for the dependency graph reachable from a root target.
//!
//! The recursive walk in [`super`] assumes an acyclic graph and would never
//! terminate on a cycle. Before a run starts, every reachable target is
//! loaded into a petgraph graph keyed by [`TargetId`] and topologically
//! sorted; a failed sort means a cycle.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use super::types::BuildError;
use crate::target::{Target, TargetId};

/// Dependency graph of the targets reachable from a root.
///
/// Edges point from a dependency to its dependent. Two target objects with
/// the same identity share a node; they must declare the same dependencies,
/// since the walk only ever visits one of them.
pub(crate) struct TargetGraph {
  graph: DiGraph<TargetId, ()>,
  nodes: HashMap<TargetId, NodeIndex>,
}

impl TargetGraph {
  /// Load every target reachable from `root`.
  ///
  /// Fails with `ConflictingTarget` if two objects with the same identity
  /// declare different dependencies.
  pub(crate) fn from_root(root: &dyn Target) -> Result<Self, BuildError> {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();
    let mut declared: HashMap<TargetId, Vec<TargetId>> = HashMap::new();

    nodes.insert(root.id().clone(), graph.add_node(root.id().clone()));
    declared.insert(root.id().clone(), dependency_ids(root));
    let mut pending = vec![root];

    while let Some(target) = pending.pop() {
      let dependent = nodes[target.id()];

      for dep in target.dependencies() {
        let dependency = match nodes.get(dep.id()) {
          Some(&idx) => {
            if declared.get(dep.id()) != Some(&dependency_ids(dep.as_ref())) {
              return Err(BuildError::ConflictingTarget {
                target: dep.id().to_string(),
              });
            }
            idx
          }
          None => {
            let idx = graph.add_node(dep.id().clone());
            nodes.insert(dep.id().clone(), idx);
            declared.insert(dep.id().clone(), dependency_ids(dep.as_ref()));
            pending.push(dep.as_ref());
            idx
          }
        };
        graph.add_edge(dependency, dependent, ());
      }
    }

    Ok(Self { graph, nodes })
  }

  pub(crate) fn len(&self) -> usize {
    self.nodes.len()
  }

  /// Verify that the graph is acyclic.
  pub(crate) fn verify_acyclic(&self) -> Result<(), BuildError> {
    toposort(&self.graph, None).map_err(|cycle| BuildError::CycleDetected {
      target: self.graph[cycle.node_id()].to_string(),
    })?;
    Ok(())
  }
}

fn dependency_ids(target: &dyn Target) -> Vec<TargetId> {
  target.dependencies().iter().map(|dep| dep.id().clone()).collect()
}
