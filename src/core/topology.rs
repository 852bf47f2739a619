use crate::prelude::*;
use itertools::Itertools;
use thiserror::Error;

/// Labeled bonded interaction between `N` particles.
///
/// Particles are referenced by their index in the system. The label is taken
/// from the source file or synthesized from particle type names
/// (see [TopologyTerm::from_types]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopologyTerm<const N: usize> {
    pub label: String,
    pub ind: [usize; N],
}

pub type Bond = TopologyTerm<2>;
pub type Angle = TopologyTerm<3>;
pub type Dihedral = TopologyTerm<4>;
pub type Improper = TopologyTerm<4>;

impl<const N: usize> TopologyTerm<N> {
    pub fn new(label: impl Into<String>, ind: [usize; N]) -> Self {
        Self {
            label: label.into(),
            ind,
        }
    }

    /// Creates a term labeled by joining the type names of its particles with `-`.
    /// Indexes are looked up in `types`, so they may be local to a molecule.
    pub fn from_types(ind: [usize; N], types: &[impl AsRef<str>]) -> Self {
        let label = ind.iter().map(|&i| types[i].as_ref()).join("-");
        Self { label, ind }
    }

    pub fn max_index(&self) -> usize {
        self.ind.iter().copied().max().unwrap_or(0)
    }
}

/// Raw arrays of a particle system as produced by a file reader.
///
/// This is the contract between readers and [ParticleSystem]: any source
/// able to fill this storage can feed the molecule inference.
#[derive(Debug, Default, Clone)]
pub struct SystemStorage {
    pub positions: Vec<Pos>,
    pub types: Vec<String>,
    pub masses: Vec<f32>,
    pub charges: Vec<f32>,
    pub sim_box: SimBox,
    pub bonds: Vec<Bond>,
    pub angles: Vec<Angle>,
    pub dihedrals: Vec<Dihedral>,
    pub impropers: Vec<Improper>,
}

impl SystemStorage {
    pub fn num_particles(&self) -> usize {
        self.positions.len()
    }

    /// Checks that all per-particle arrays have the same size and
    /// that all topology terms refer to existing particles.
    pub fn validate(&self) -> Result<(), ConsistencyError> {
        let n = self.num_particles();
        check_size("types", n, self.types.len())?;
        check_size("masses", n, self.masses.len())?;
        check_size("charges", n, self.charges.len())?;

        check_terms("bond", &self.bonds, n)?;
        check_terms("angle", &self.angles, n)?;
        check_terms("dihedral", &self.dihedrals, n)?;
        check_terms("improper", &self.impropers, n)?;
        Ok(())
    }

    /// Number of bonds referencing each particle.
    pub fn bond_order(&self) -> Vec<usize> {
        let mut order = vec![0; self.num_particles()];
        for b in &self.bonds {
            order[b.ind[0]] += 1;
            order[b.ind[1]] += 1;
        }
        order
    }
}

fn check_size(array: &'static str, expected: usize, found: usize) -> Result<(), ConsistencyError> {
    if expected != found {
        Err(ConsistencyError::SizeMismatch {
            array,
            expected,
            found,
        })
    } else {
        Ok(())
    }
}

fn check_terms<const N: usize>(
    kind: &'static str,
    terms: &[TopologyTerm<N>],
    n: usize,
) -> Result<(), ConsistencyError> {
    for (i, t) in terms.iter().enumerate() {
        let max = t.max_index();
        if max >= n {
            return Err(ConsistencyError::IndexOutOfRange {
                kind,
                term: i,
                index: max,
                n,
            });
        }
    }
    Ok(())
}

#[derive(Error, Debug)]
pub enum ConsistencyError {
    #[error("{array} array has {found} entries while there are {expected} particles")]
    SizeMismatch {
        array: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{kind} #{term} refers to particle {index}, allowed range is 0:{n}")]
    IndexOutOfRange {
        kind: &'static str,
        term: usize,
        index: usize,
        n: usize,
    },
}
