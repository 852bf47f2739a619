use anyhow::{Context, Result};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use hoomd_reader::prelude::*;
use log::info;

pub(super) fn command_info(file: &str, opts: &LoadOptions) -> Result<()> {
    let sys = ParticleSystem::from_file(file, opts).with_context(|| format!("loading {file}"))?;

    let b = sys.sim_box();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Property", "Value"])
        .add_row(vec!["File".to_owned(), file.to_owned()])
        .add_row(vec!["Frame".to_owned(), sys.frame().to_string()])
        .add_row(vec![
            "Box".to_owned(),
            format!(
                "{} x {} x {}, tilts {} {} {}",
                b.lx, b.ly, b.lz, b.xy, b.xz, b.yz
            ),
        ])
        .add_row(vec!["Particles".to_owned(), sys.n_particles().to_string()])
        .add_row(vec!["Bonds".to_owned(), sys.n_bonds().to_string()])
        .add_row(vec!["Angles".to_owned(), sys.n_angles().to_string()])
        .add_row(vec!["Dihedrals".to_owned(), sys.n_dihedrals().to_string()])
        .add_row(vec!["Impropers".to_owned(), sys.n_impropers().to_string()])
        .add_row(vec!["Molecules".to_owned(), sys.n_molecules().to_string()]);
    println!("{table}");

    if sys.unique_molecules().is_empty() {
        info!("Molecules are not identified");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Name", "Pattern", "Count", "Particles each"]);
    for (pattern, name) in sys.unique_molecules().iter() {
        let mols: Vec<_> = sys
            .molecules()
            .iter()
            .filter(|m| m.pattern() == pattern)
            .collect();
        table.add_row(vec![
            name.to_owned(),
            pattern.to_owned(),
            mols.len().to_string(),
            mols.first().map_or(0, |m| m.len()).to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
