//! Map graph - node registry, weighted adjacency and visibility
//!
//! Nodes live in an insertion-ordered arena with an id index, so tasks and
//! trails refer to them by [`NodeId`] rather than by reference.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{ContractViolation, Precondition, Result};
use crate::core::types::NodeId;
use crate::simulation::resource_node::ResourceNode;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub distance: f64,
}

impl MapEdge {
    /// The far end of the edge as seen from `node`
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.from == node {
            Some(self.to)
        } else if self.to == node {
            Some(self.from)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapGraph {
    nodes: Vec<ResourceNode>,
    index: AHashMap<NodeId, usize>,
    edges: Vec<MapEdge>,
    visibility_radius: f64,
}

impl MapGraph {
    pub fn new(visibility_radius: f64) -> Self {
        Self {
            visibility_radius: visibility_radius.max(0.0),
            ..Default::default()
        }
    }

    pub fn add_node(&mut self, node: ResourceNode) -> Result<()> {
        if self.index.contains_key(&node.id) {
            return Err(ContractViolation::DuplicateNode(node.id).into());
        }
        self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Connect two registered nodes
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, distance: f64) -> Result<()> {
        for id in [from, to] {
            if !self.index.contains_key(&id) {
                return Err(Precondition::UnknownNode(id).into());
            }
        }
        self.edges.push(MapEdge { from, to, distance });
        Ok(())
    }

    pub fn edges(&self) -> &[MapEdge] {
        &self.edges
    }

    /// Edges touching `node`, in insertion order
    pub fn neighbors(&self, node: NodeId) -> Vec<&MapEdge> {
        self.edges
            .iter()
            .filter(|edge| edge.other(node).is_some())
            .collect()
    }

    pub fn get(&self, id: NodeId) -> Option<&ResourceNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ResourceNode> {
        self.index.get(&id).map(|&i| &mut self.nodes[i])
    }

    /// All nodes in registry order
    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [ResourceNode] {
        &mut self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn visibility_radius(&self) -> f64 {
        self.visibility_radius
    }

    /// Raise visibility to `radius`; never shrinks
    pub fn reveal(&mut self, radius: f64) {
        self.visibility_radius = self.visibility_radius.max(radius);
    }

    pub fn is_visible(&self, node: &ResourceNode) -> bool {
        node.distance_to_colony <= self.visibility_radius
    }

    pub fn visible_nodes(&self) -> Vec<&ResourceNode> {
        self.nodes.iter().filter(|node| self.is_visible(node)).collect()
    }
}
