use anyhow::Result;
use hoomd_reader::prelude::*;

const EXAMPLE: &str = "tests/example.hoomdxml";

#[test]
fn load_pentane_and_water() -> Result<()> {
    let sys = ParticleSystem::from_file(EXAMPLE, &LoadOptions::default())?;

    assert_eq!(sys.file_name(), Some(EXAMPLE));
    assert_eq!(sys.sim_box().lengths(), [10.0, 11.0, 12.0]);
    assert!(!sys.sim_box().is_triclinic());

    assert_eq!(sys.n_particles(), 10);
    assert_eq!(sys.xyz()[6], Pos::new(0.5, 0.5, 2.0));
    assert_eq!(sys.xyz()[9], Pos::new(0.0, 2.0, 4.0));
    assert_eq!(
        sys.types(),
        &["CH3", "CH2", "CH2", "CH2", "CH3", "water", "water", "water", "water", "water"]
    );
    assert_eq!(sys.bond_order(), &[1, 2, 2, 2, 1, 0, 0, 0, 0, 0]);
    assert_eq!(
        sys.masses(),
        &[15.0, 14.0, 14.0, 14.0, 15.0, 18.0, 18.0, 18.0, 18.0, 18.0]
    );
    assert!(sys.charges().iter().all(|&c| c == 0.0));

    assert_eq!(sys.n_bonds(), 4);
    assert_eq!(sys.bonds()[3], Bond::new("CH2-CH3", [3, 4]));
    assert_eq!(sys.n_angles(), 3);
    assert_eq!(sys.angles()[2], Angle::new("CH3-CH2-CH3", [2, 3, 4]));
    assert_eq!(sys.n_dihedrals(), 2);
    assert_eq!(sys.dihedrals()[0], Dihedral::new("CH3-CH2-CH2-CH2", [0, 1, 2, 3]));
    assert_eq!(sys.n_impropers(), 0);

    assert_eq!(sys.graph().len(), 5);
    assert_eq!(sys.n_molecules(), 6);
    assert_eq!(sys.unique_molecules().len(), 2);
    assert_eq!(&sys.unique_molecules()["CH3CH2CH2CH2CH3"], "molecule0");
    assert_eq!(&sys.unique_molecules()["water"], "molecule1");
    Ok(())
}

#[test]
fn ignore_free_particles() -> Result<()> {
    let opts = LoadOptions::default().ignore_zero_bond_order(true);
    let sys = ParticleSystem::from_file(EXAMPLE, &opts)?;

    assert_eq!(sys.n_molecules(), 1);
    assert_eq!(sys.unique_molecules().len(), 1);
    assert!(!sys.unique_molecules().contains_key("water"));

    let m = &sys.molecules()[0];
    assert_eq!(m.name(), "molecule0");
    assert_eq!(m.pattern(), "CH3CH2CH2CH2CH3");
    assert_eq!(m.particles(), &[0, 1, 2, 3, 4]);
    assert_eq!(m.types(), &["CH3", "CH2", "CH2", "CH2", "CH3"]);
    assert_eq!(m.bonds().len(), 4);
    Ok(())
}

#[test]
fn without_molecules() -> Result<()> {
    let opts = LoadOptions::default().identify_molecules(false);
    let sys = ParticleSystem::from_file(EXAMPLE, &opts)?;
    assert_eq!(sys.n_molecules(), 0);
    assert!(sys.unique_molecules().is_empty());
    assert_eq!(sys.n_particles(), 10);
    Ok(())
}

#[test]
fn rename_molecules() -> Result<()> {
    let names = [("CH3CH2CH2CH2CH3", "pentane"), ("water", "SOL")];

    let mut sys = ParticleSystem::from_file(EXAMPLE, &LoadOptions::default())?;
    sys.set_molecule_name_by_dictionary(names);
    assert_eq!(sys.unique_molecules().get("water"), Some("SOL"));
    assert_eq!(sys.unique_molecules().get("CH3CH2CH2CH2CH3"), Some("pentane"));
    assert_eq!(sys.select_molecules("SOL").len(), 5);

    let opts = LoadOptions::default()
        .ignore_zero_bond_order(true)
        .rename(names);
    let sys = ParticleSystem::from_file(EXAMPLE, &opts)?;
    assert_eq!(sys.molecules()[0].name(), "pentane");
    Ok(())
}

#[test]
fn reload_replaces_content() -> Result<()> {
    let mut sys = ParticleSystem::from_file(EXAMPLE, &LoadOptions::default())?;
    sys.set_molecule_name_by_dictionary([("water", "SOL")]);

    sys.load(EXAMPLE, &LoadOptions::default().frame(2))?;
    assert_eq!(sys.frame(), 2);
    assert_eq!(sys.n_particles(), 10);
    assert_eq!(sys.n_molecules(), 6);
    assert_eq!(&sys.unique_molecules()["water"], "molecule1");

    assert!(sys.load("tests/missing.hoomdxml", &LoadOptions::default()).is_err());
    assert_eq!(sys.n_particles(), 0);
    assert!(sys.file_name().is_none());
    Ok(())
}

#[test]
fn hierarchy_of_example() -> Result<()> {
    let opts = LoadOptions::default().rename([("CH3CH2CH2CH2CH3", "pentane")]);
    let h = ParticleSystem::from_file(EXAMPLE, &opts)?.to_hierarchy();
    assert_eq!(h.molecules.len(), 6);
    assert_eq!(h.num_particles(), 10);
    assert_eq!(h.bonds, vec![[0, 1], [1, 2], [2, 3], [3, 4]]);
    assert_eq!(h.molecules[0].name, "pentane");
    assert_eq!(h.molecules[0].bonds[0], Bond::new("CH3-CH2", [0, 1]));
    assert_eq!(h.molecules[5].particles[0].name, "water");
    assert_eq!(h.molecules[5].particles[0].index, 9);
    Ok(())
}

#[test]
fn bond_index_out_of_range() -> Result<()> {
    let text = std::fs::read_to_string(EXAMPLE)?.replace("CH2-CH3 3 4", "X 0 99");
    let path = std::env::temp_dir().join(format!("hoomd_reader_bad_{}.hoomdxml", std::process::id()));
    std::fs::write(&path, text)?;

    let mut sys = ParticleSystem::from_file(EXAMPLE, &LoadOptions::default())?;
    let res = sys.load(&path, &LoadOptions::default());
    std::fs::remove_file(&path)?;

    match res {
        Err(SystemError::Io(e)) => assert!(matches!(
            e.kind(),
            FileFormatError::Inconsistent(ConsistencyError::IndexOutOfRange {
                kind: "bond",
                term: 3,
                index: 99,
                n: 10
            })
        )),
        other => panic!("out of range bond is accepted: {other:?}"),
    }
    assert_eq!(sys.n_particles(), 0);
    assert_eq!(sys.n_molecules(), 0);
    assert!(sys.unique_molecules().is_empty());
    Ok(())
}
