//! Exploration system - scouts widen what the colony can see

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::campaign::map::MapGraph;
use crate::core::types::NodeId;
use crate::entity::scout::ScoutTraits;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationOutcome {
    /// Nodes visible after the reveal, in registry order
    pub revealed: Vec<NodeId>,
    pub visibility_radius: f64,
    /// The scout's roll succeeded and some known node is rich
    pub discovered_rich_node: bool,
}

pub fn handle_scout_exploration<R: Rng + ?Sized>(
    map: &mut MapGraph,
    scout: &ScoutTraits,
    rng: &mut R,
    rich_threshold: f64,
) -> ExplorationOutcome {
    let discovery = scout.explore(rng);
    map.reveal(map.visibility_radius() + discovery.radius_revealed);

    let discovered_rich_node = discovery.discovered_rich_node
        && map.nodes().iter().any(|node| node.richness > rich_threshold);

    ExplorationOutcome {
        revealed: map.visible_nodes().iter().map(|node| node.id).collect(),
        visibility_radius: map.visibility_radius(),
        discovered_rich_node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ResourceKind;
    use crate::simulation::resource_node::ResourceNode;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn map_with(richness: f64) -> MapGraph {
        let mut map = MapGraph::new(4.0);
        map.add_node(ResourceNode::new(NodeId(1), ResourceKind::Nectar, 30.0, 1.0).with_distance(3.0))
            .unwrap();
        map.add_node(ResourceNode::new(NodeId(2), ResourceKind::Food, richness, 1.0).with_distance(6.0))
            .unwrap();
        map
    }

    #[test]
    fn test_reveal_is_additive() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut map = map_with(50.0);
        let scout = ScoutTraits::new(3.0, 0.0);

        let outcome = handle_scout_exploration(&mut map, &scout, &mut rng, 100.0);
        assert_eq!(outcome.visibility_radius, 7.0);
        assert_eq!(outcome.revealed, vec![NodeId(1), NodeId(2)]);

        handle_scout_exploration(&mut map, &scout, &mut rng, 100.0);
        assert_eq!(map.visibility_radius(), 10.0);
    }

    #[test]
    fn test_roll_without_rich_node_reports_false() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut map = map_with(100.0);
        let scout = ScoutTraits::new(1.0, 1.0);
        assert!(!handle_scout_exploration(&mut map, &scout, &mut rng, 100.0).discovered_rich_node);
    }

    #[test]
    fn test_roll_with_rich_node_reports_true() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut map = map_with(150.0);
        let scout = ScoutTraits::new(1.0, 1.0);
        assert!(handle_scout_exploration(&mut map, &scout, &mut rng, 100.0).discovered_rich_node);

        let shy = ScoutTraits::new(1.0, 0.0);
        assert!(!handle_scout_exploration(&mut map, &shy, &mut rng, 100.0).discovered_rich_node);
    }
}
