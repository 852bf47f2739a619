use crate::prelude::*;

/// Particle entry of the [SystemHierarchy]
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleNode {
    /// Index in the particle system
    pub index: usize,
    /// Particle type name
    pub name: String,
    pub pos: Pos,
    pub mass: f32,
    pub charge: f32,
}

/// Molecule entry of the [SystemHierarchy].
/// Bonds use local particle numbering and are labeled by particle type names.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeNode {
    pub name: String,
    pub pattern: String,
    pub particles: Vec<ParticleNode>,
    pub bonds: Vec<Bond>,
}

/// Particle system arranged as system -> molecules -> particles.
///
/// This is the form expected by molecular model builders which represent
/// the system as a tree of compounds. Bonds of the whole system are kept
/// at the top level in system indexes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemHierarchy {
    pub molecules: Vec<MoleculeNode>,
    pub bonds: Vec<[usize; 2]>,
}

impl SystemHierarchy {
    pub fn build(data: &(impl ParticleProvider + BondsProvider + MoleculesProvider)) -> Self {
        let molecules = data
            .iter_molecules()
            .map(|m| MoleculeNode {
                name: m.name().to_owned(),
                pattern: m.pattern().to_owned(),
                particles: m
                    .particles()
                    .iter()
                    .filter_map(|&i| data.get_particle(i))
                    .map(|p| ParticleNode {
                        index: p.id,
                        name: p.type_name.to_owned(),
                        pos: *p.pos,
                        mass: p.mass,
                        charge: p.charge,
                    })
                    .collect(),
                bonds: m.labeled_bonds(),
            })
            .collect();

        Self {
            molecules,
            bonds: data.iter_bonds().map(|b| b.ind).collect(),
        }
    }

    pub fn num_particles(&self) -> usize {
        self.molecules.iter().map(|m| m.particles.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn water_dimer_hierarchy() -> anyhow::Result<()> {
        let types = ["O", "H", "H", "O", "H", "H"];
        let mut st = SystemStorage {
            positions: (0..6).map(|i| Pos::new(0.0, i as f32, 0.0)).collect(),
            types: types.iter().map(|t| t.to_string()).collect(),
            masses: vec![16.0, 1.0, 1.0, 16.0, 1.0, 1.0],
            charges: vec![-0.8, 0.4, 0.4, -0.8, 0.4, 0.4],
            ..Default::default()
        };
        for [i, j] in [[0, 1], [0, 2], [3, 4], [3, 5]] {
            st.bonds.push(Bond::from_types([i, j], &types));
        }
        let opts = LoadOptions::default().rename([("OHH", "SOL")]);
        let h = ParticleSystem::from_storage(st, &opts)?.to_hierarchy();

        assert_eq!(h.molecules.len(), 2);
        assert_eq!(h.num_particles(), 6);
        assert_eq!(h.bonds.len(), 4);

        let m = &h.molecules[1];
        assert_eq!(m.name, "SOL");
        assert_eq!(m.particles[0].index, 3);
        assert_eq!(m.particles[0].mass, 16.0);
        assert_eq!(m.particles[2].pos, Pos::new(0.0, 5.0, 0.0));
        assert_eq!(m.bonds, vec![Bond::new("O-H", [0, 1]), Bond::new("O-H", [0, 2])]);
        Ok(())
    }
}
