use crate::prelude::*;

/// Holds references to the properties of a single particle and its index.
/// Usually created by types implementing [ParticleProvider].
#[derive(Debug, Clone, Copy)]
pub struct Particle<'a> {
    pub id: usize,
    pub type_name: &'a str,
    pub pos: &'a Pos,
    pub mass: f32,
    pub charge: f32,
}

//--------------------------------------------------------------
// Read-only providers for consumers of the particle system
//--------------------------------------------------------------
pub trait LenProvider {
    fn len(&self) -> usize;
}

pub trait ParticleProvider: LenProvider {
    fn get_particle(&self, i: usize) -> Option<Particle<'_>>;

    fn iter_particles(&self) -> impl Iterator<Item = Particle<'_>> {
        (0..self.len()).filter_map(|i| self.get_particle(i))
    }
}

pub trait BondsProvider {
    fn num_bonds(&self) -> usize;

    fn iter_bonds(&self) -> impl Iterator<Item = &Bond>;
}

pub trait MoleculesProvider {
    fn num_molecules(&self) -> usize;

    fn iter_molecules(&self) -> impl Iterator<Item = &Molecule>;

    fn nth_molecule(&self, i: usize) -> Option<&Molecule>;
}
