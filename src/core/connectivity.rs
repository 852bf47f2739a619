use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Undirected graph of bonded particles in the format of `particle -> neib1 neib2 neib3...`
///
/// Only particles taking part in at least one bond are nodes of the graph.
/// Nodes are kept in the order of their first appearance, which makes
/// enumeration of connected components deterministic for a given bond list.
/// Duplicated bonds are stored as a single edge.
#[derive(Debug, Default, Clone)]
pub struct BondGraph {
    nodes: Vec<usize>,
    adjacency: FxHashMap<usize, Vec<usize>>,
    edges: Vec<[usize; 2]>,
    edge_set: FxHashSet<[usize; 2]>,
}

impl BondGraph {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_edge(&mut self, i: usize, j: usize) {
        let e = if i <= j { [i, j] } else { [j, i] };
        if !self.edge_set.insert(e) {
            return;
        }
        self.edges.push(e);

        self.add_node(i).push(j);
        if i != j {
            self.add_node(j).push(i);
        }
    }

    // Neighbours of the node, which is created if absent
    fn add_node(&mut self, i: usize) -> &mut Vec<usize> {
        self.adjacency.entry(i).or_insert_with(|| {
            self.nodes.push(i);
            vec![]
        })
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, i: usize) -> bool {
        self.adjacency.contains_key(&i)
    }

    /// Nodes in the order of their first appearance
    pub fn iter_nodes(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.nodes.iter().copied()
    }

    /// Unique edges as `[min, max]` pairs in the order of their first appearance
    pub fn iter_edges(&self) -> impl ExactSizeIterator<Item = &[usize; 2]> {
        self.edges.iter()
    }

    pub fn neighbors(&self, i: usize) -> &[usize] {
        self.adjacency.get(&i).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Connected components found by breadth-first traversal started from
    /// each not yet visited node. Particles inside components are in
    /// traversal order, not sorted.
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let mut visited = FxHashSet::default();
        let mut components = vec![];
        let mut queue = VecDeque::new();

        for &start in &self.nodes {
            if !visited.insert(start) {
                continue;
            }
            let mut comp = vec![];
            queue.push_back(start);
            while let Some(i) = queue.pop_front() {
                comp.push(i);
                for &j in &self.adjacency[&i] {
                    if visited.insert(j) {
                        queue.push_back(j);
                    }
                }
            }
            components.push(comp);
        }
        components
    }
}

impl FromIterator<(usize, usize)> for BondGraph {
    fn from_iter<T: IntoIterator<Item = (usize, usize)>>(iter: T) -> Self {
        let mut res = Self::default();
        for (i, j) in iter {
            res.add_edge(i, j);
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::BondGraph;

    #[test]
    fn components_in_first_seen_order() {
        let g: BondGraph = [(7, 8), (0, 1), (8, 9), (1, 2)].into_iter().collect();
        assert_eq!(g.len(), 6);
        assert_eq!(g.iter_nodes().collect::<Vec<_>>(), vec![7, 8, 0, 1, 9, 2]);
        let comps = g.connected_components();
        assert_eq!(comps, vec![vec![7, 8, 9], vec![0, 1, 2]]);
    }

    #[test]
    fn duplicated_and_reversed_edges() {
        let g: BondGraph = [(0, 1), (1, 0), (0, 1), (1, 2)].into_iter().collect();
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.neighbors(1), &[0, 2]);
        assert_eq!(g.iter_edges().collect::<Vec<_>>(), vec![&[0, 1], &[1, 2]]);
    }

    #[test]
    fn self_loop() {
        let g: BondGraph = [(3, 3)].into_iter().collect();
        assert_eq!(g.len(), 1);
        assert_eq!(g.neighbors(3), &[3]);
        assert_eq!(g.connected_components(), vec![vec![3]]);
    }

    #[test]
    fn empty() {
        let g = BondGraph::new();
        assert!(g.is_empty());
        assert!(g.connected_components().is_empty());
        assert!(!g.contains(0));
        assert!(g.neighbors(0).is_empty());
    }
}
