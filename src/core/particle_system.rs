use crate::prelude::*;
use log::{info, warn};
use std::path::Path;
use thiserror::Error;

/// Options controlling how a [ParticleSystem] is loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Frame to read from multi-frame (gsd) files.
    pub frame: usize,
    /// Group bonded particles into molecules.
    pub identify_molecules: bool,
    /// Do not create single-particle molecules for particles without bonds.
    pub ignore_zero_bond_order: bool,
    /// Pattern to name pairs applied after molecules are identified.
    pub rename: Option<Vec<(String, String)>>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            frame: 0,
            identify_molecules: true,
            ignore_zero_bond_order: false,
            rename: None,
        }
    }
}

impl LoadOptions {
    pub fn frame(mut self, frame: usize) -> Self {
        self.frame = frame;
        self
    }

    pub fn identify_molecules(mut self, val: bool) -> Self {
        self.identify_molecules = val;
        self
    }

    pub fn ignore_zero_bond_order(mut self, val: bool) -> Self {
        self.ignore_zero_bond_order = val;
        self
    }

    pub fn rename<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.rename = Some(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }
}

#[derive(Error, Debug)]
pub enum SystemError {
    #[error("no source file given, provide the name of a hoomd xml or gsd file")]
    NoSource,

    #[error(transparent)]
    Io(#[from] FileIoError),

    #[error("inconsistent particle system data")]
    Inconsistent(#[from] ConsistencyError),
}

/// Particle system read from a HOOMD configuration together with
/// the molecules inferred from its bonds.
///
/// Particles are identified by their index. All per-particle arrays
/// ([xyz](ParticleSystem::xyz), [types](ParticleSystem::types),
/// [masses](ParticleSystem::masses), [charges](ParticleSystem::charges),
/// [bond_order](ParticleSystem::bond_order)) have
/// [n_particles](ParticleSystem::n_particles) entries and all topology
/// terms refer to valid particle indexes.
///
/// Molecules are rebuilt each time the system is loaded or
/// [identify_molecules](ParticleSystem::identify_molecules) is called.
/// Their names come from [unique_molecules](ParticleSystem::unique_molecules)
/// and could be changed with
/// [set_molecule_name_by_dictionary](ParticleSystem::set_molecule_name_by_dictionary).
#[derive(Debug, Default, Clone)]
pub struct ParticleSystem {
    file_name: Option<String>,
    frame: usize,
    data: SystemStorage,
    bond_order: Vec<usize>,
    graph: BondGraph,
    molecules: Vec<Molecule>,
    unique_molecules: UniqueMolecules,
}

impl ParticleSystem {
    /// Creates an empty system
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_file(fname: impl AsRef<Path>, opts: &LoadOptions) -> Result<Self, SystemError> {
        let mut sys = Self::new();
        sys.load(fname, opts)?;
        Ok(sys)
    }

    /// Creates a system from raw arrays produced by any reader.
    pub fn from_storage(data: SystemStorage, opts: &LoadOptions) -> Result<Self, SystemError> {
        data.validate()?;
        let mut sys = Self::new();
        sys.frame = opts.frame;
        sys.populate(data, opts);
        Ok(sys)
    }

    /// Loads xml or gsd file replacing all current content of the system.
    ///
    /// The format is chosen by file extension. On error the system is left empty.
    pub fn load(&mut self, fname: impl AsRef<Path>, opts: &LoadOptions) -> Result<(), SystemError> {
        self.clear();
        let fname = fname.as_ref();
        if fname.as_os_str().is_empty() {
            return Err(SystemError::NoSource);
        }

        let mut fh = FileHandler::open(fname)?;
        let data = fh.read(opts.frame)?;

        self.file_name = Some(fh.file_name.clone());
        self.frame = opts.frame;
        self.populate(data, opts);

        info!(
            "Loaded '{}': {} particles, {} bonds, {} molecules of {} kinds",
            fh.file_name,
            self.n_particles(),
            self.n_bonds(),
            self.molecules.len(),
            self.unique_molecules.len(),
        );
        Ok(())
    }

    fn populate(&mut self, data: SystemStorage, opts: &LoadOptions) {
        self.bond_order = data.bond_order();
        self.graph = data.bonds.iter().map(|b| (b.ind[0], b.ind[1])).collect();
        self.data = data;

        if opts.identify_molecules {
            self.identify_molecules(opts.ignore_zero_bond_order);
        }

        if let Some(rename) = &opts.rename {
            self.set_molecule_name_by_dictionary(rename.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
    }

    /// Resets the system to the empty state
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Rebuilds molecules from bond connectivity and assigns automatic names.
    /// Previous molecules and names are discarded.
    pub fn identify_molecules(&mut self, ignore_zero_bond_order: bool) {
        self.molecules = MoleculeInferencer::new(ignore_zero_bond_order).infer(
            &self.data.types,
            &self.bond_order,
            &self.graph,
        );
        self.unique_molecules = assign_names(&mut self.molecules);
    }

    /// Assigns user defined names to molecule patterns.
    ///
    /// Entries are merged into [unique_molecules](ParticleSystem::unique_molecules),
    /// overwriting existing patterns. Molecules with patterns not present
    /// in `entries` keep their names.
    pub fn set_molecule_name_by_dictionary<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.unique_molecules.merge(entries);
        apply_names(&mut self.molecules, &self.unique_molecules);
    }

    /// Molecules with given name. Empty result is reported as a warning.
    pub fn select_molecules(&self, name: &str) -> Vec<&Molecule> {
        let sel: Vec<_> = self.molecules.iter().filter(|m| m.name() == name).collect();
        if sel.is_empty() {
            warn!("selection of molecules named '{name}' is empty");
        }
        sel
    }

    /// System -> molecules -> particles tree for model builders
    pub fn to_hierarchy(&self) -> SystemHierarchy {
        SystemHierarchy::build(self)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn n_particles(&self) -> usize {
        self.data.num_particles()
    }

    pub fn n_bonds(&self) -> usize {
        self.data.bonds.len()
    }

    pub fn n_angles(&self) -> usize {
        self.data.angles.len()
    }

    pub fn n_dihedrals(&self) -> usize {
        self.data.dihedrals.len()
    }

    pub fn n_impropers(&self) -> usize {
        self.data.impropers.len()
    }

    pub fn n_molecules(&self) -> usize {
        self.molecules.len()
    }

    /// Particle positions
    pub fn xyz(&self) -> &[Pos] {
        &self.data.positions
    }

    pub fn types(&self) -> &[String] {
        &self.data.types
    }

    pub fn masses(&self) -> &[f32] {
        &self.data.masses
    }

    pub fn charges(&self) -> &[f32] {
        &self.data.charges
    }

    pub fn sim_box(&self) -> &SimBox {
        &self.data.sim_box
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.data.bonds
    }

    pub fn angles(&self) -> &[Angle] {
        &self.data.angles
    }

    pub fn dihedrals(&self) -> &[Dihedral] {
        &self.data.dihedrals
    }

    pub fn impropers(&self) -> &[Improper] {
        &self.data.impropers
    }

    pub fn bond_order(&self) -> &[usize] {
        &self.bond_order
    }

    /// Graph of bonded particles
    pub fn graph(&self) -> &BondGraph {
        &self.graph
    }

    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn unique_molecules(&self) -> &UniqueMolecules {
        &self.unique_molecules
    }

    /// Raw arrays of the system
    pub fn storage(&self) -> &SystemStorage {
        &self.data
    }
}

impl LenProvider for ParticleSystem {
    fn len(&self) -> usize {
        self.n_particles()
    }
}

impl ParticleProvider for ParticleSystem {
    fn get_particle(&self, i: usize) -> Option<Particle<'_>> {
        Some(Particle {
            id: i,
            type_name: self.data.types.get(i)?,
            pos: self.data.positions.get(i)?,
            mass: *self.data.masses.get(i)?,
            charge: *self.data.charges.get(i)?,
        })
    }
}

impl BondsProvider for ParticleSystem {
    fn num_bonds(&self) -> usize {
        self.n_bonds()
    }

    fn iter_bonds(&self) -> impl Iterator<Item = &Bond> {
        self.data.bonds.iter()
    }
}

impl MoleculesProvider for ParticleSystem {
    fn num_molecules(&self) -> usize {
        self.molecules.len()
    }

    fn iter_molecules(&self) -> impl Iterator<Item = &Molecule> {
        self.molecules.iter()
    }

    fn nth_molecule(&self, i: usize) -> Option<&Molecule> {
        self.molecules.get(i)
    }
}
