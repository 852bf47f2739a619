use crate::prelude::*;

/// Name of a molecule before the names are assigned
pub const UNNAMED_MOLECULE: &str = "none";

/// Group of bonded particles of the [ParticleSystem].
///
/// Particles are stored as system indexes in ascending order together with
/// their type names. Bonds use local numbering, i.e. positions in the
/// particle list of this molecule.
///
/// The `pattern` is a concatenation of particle type names. Molecules with
/// the same pattern are considered to be of the same kind and get the same
/// name, regardless of their internal connectivity.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    particles: Vec<usize>,
    types: Vec<String>,
    bonds: Vec<[usize; 2]>,
    pattern: String,
    name: String,
}

impl Default for Molecule {
    fn default() -> Self {
        Self {
            particles: vec![],
            types: vec![],
            bonds: vec![],
            pattern: String::new(),
            name: UNNAMED_MOLECULE.into(),
        }
    }
}

impl Molecule {
    pub fn new() -> Self {
        Default::default()
    }

    pub(crate) fn add_particle(&mut self, ind: usize, type_name: &str) {
        self.particles.push(ind);
        self.types.push(type_name.to_owned());
        self.pattern.push_str(type_name);
    }

    pub(crate) fn add_bond(&mut self, local: [usize; 2]) {
        self.bonds.push(local);
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    /// System indexes of particles in ascending order
    pub fn particles(&self) -> &[usize] {
        &self.particles
    }

    /// Particle type names aligned with [Molecule::particles]
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Bonds in local numbering
    pub fn bonds(&self) -> &[[usize; 2]] {
        &self.bonds
    }

    /// Bonds translated back to system indexes
    pub fn iter_global_bonds(&self) -> impl Iterator<Item = [usize; 2]> + '_ {
        self.bonds
            .iter()
            .map(|b| [self.particles[b[0]], self.particles[b[1]]])
    }

    /// Bonds in local numbering labeled by the type names of bonded particles
    pub fn labeled_bonds(&self) -> Vec<Bond> {
        self.bonds
            .iter()
            .map(|b| Bond::from_types(*b, &self.types))
            .collect()
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Position of system particle `ind` inside this molecule
    pub fn local_index(&self, ind: usize) -> Option<usize> {
        self.particles.binary_search(&ind).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn propane() -> Molecule {
        let mut m = Molecule::new();
        m.add_particle(4, "CH3");
        m.add_particle(5, "CH2");
        m.add_particle(9, "CH3");
        m.add_bond([0, 1]);
        m.add_bond([1, 2]);
        m
    }

    #[test]
    fn pattern_and_default_name() {
        let m = propane();
        assert_eq!(m.pattern(), "CH3CH2CH3");
        assert_eq!(m.name(), "none");
        assert_eq!(m.len(), 3);
        assert_eq!(m.types(), &["CH3", "CH2", "CH3"]);
    }

    #[test]
    fn local_and_global_bonds() {
        let m = propane();
        assert_eq!(m.bonds(), &[[0, 1], [1, 2]]);
        assert_eq!(
            m.iter_global_bonds().collect::<Vec<_>>(),
            vec![[4, 5], [5, 9]]
        );
        assert_eq!(m.local_index(9), Some(2));
        assert_eq!(m.local_index(6), None);

        let labeled = m.labeled_bonds();
        assert_eq!(labeled[0].label, "CH3-CH2");
        assert_eq!(labeled[1], Bond::new("CH2-CH3", [1, 2]));
    }
}
