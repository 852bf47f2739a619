use anyhow::{Context, Result};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use hoomd_reader::prelude::*;
use log::info;

pub(super) fn command_molecules(file: &str, opts: &LoadOptions, name: &str) -> Result<()> {
    let sys = ParticleSystem::from_file(file, opts).with_context(|| format!("loading {file}"))?;

    let sel = sys.select_molecules(name);
    if sel.is_empty() {
        return Ok(());
    }
    info!("{} molecules named '{name}'", sel.len());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["#", "Pattern", "Particles", "Bonds"]);
    for (i, m) in sel.iter().enumerate() {
        let particles = match m.particles() {
            [] => String::new(),
            [p] => p.to_string(),
            [first, .., last] => format!("{first}..{last} ({})", m.len()),
        };
        table.add_row(vec![
            i.to_string(),
            m.pattern().to_owned(),
            particles,
            m.bonds().len().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
