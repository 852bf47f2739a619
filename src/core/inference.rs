use crate::prelude::*;
use log::debug;
use rustc_hash::FxHashMap;

/// Splits particles into molecules using bond connectivity.
///
/// Each connected component of the [BondGraph] becomes one molecule.
/// Particles without bonds become single-particle molecules unless
/// `ignore_zero_bond_order` is set, in which case they belong to no molecule.
#[derive(Debug, Default, Clone, Copy)]
pub struct MoleculeInferencer {
    pub ignore_zero_bond_order: bool,
}

impl MoleculeInferencer {
    pub fn new(ignore_zero_bond_order: bool) -> Self {
        Self {
            ignore_zero_bond_order,
        }
    }

    /// Builds molecules for the particles with given `types` and `bond_order`.
    ///
    /// Molecules from graph components come first, in the order of the
    /// components, followed by single-particle molecules in ascending
    /// particle order.
    ///
    /// `types` and `bond_order` must have an entry for every particle and
    /// the graph must only refer to these particles, as guaranteed by
    /// [SystemStorage::validate].
    pub fn infer(&self, types: &[String], bond_order: &[usize], graph: &BondGraph) -> Vec<Molecule> {
        debug_assert_eq!(types.len(), bond_order.len());
        debug_assert!(graph.iter_nodes().all(|i| i < types.len()));
        let components = graph.connected_components();

        // Component of each bonded particle
        let mut comp_of = FxHashMap::default();
        for (c, comp) in components.iter().enumerate() {
            for &i in comp {
                comp_of.insert(i, c);
            }
        }

        // Distribute edges over components
        let mut comp_edges = vec![vec![]; components.len()];
        for e in graph.iter_edges() {
            comp_edges[comp_of[&e[0]]].push(*e);
        }

        let mut molecules = Vec::with_capacity(components.len());
        for (mut comp, edges) in components.into_iter().zip(comp_edges) {
            comp.sort_unstable();

            let mut mol = Molecule::new();
            // Global to local index mapping
            let mut local = FxHashMap::default();
            for (li, &i) in comp.iter().enumerate() {
                mol.add_particle(i, &types[i]);
                local.insert(i, li);
            }

            for [i, j] in edges {
                mol.add_bond([local[&i], local[&j]]);
            }
            molecules.push(mol);
        }
        let n_bonded = molecules.len();

        if !self.ignore_zero_bond_order {
            for (i, _) in bond_order.iter().enumerate().filter(|(_, bo)| **bo == 0) {
                let mut mol = Molecule::new();
                mol.add_particle(i, &types[i]);
                molecules.push(mol);
            }
        }

        debug!(
            "{} molecules inferred: {} bonded, {} single particles",
            molecules.len(),
            n_bonded,
            molecules.len() - n_bonded
        );
        molecules
    }
}
