use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use hoomd_reader::prelude::*;

mod command_info;
mod command_molecules;

use command_info::command_info;
use command_molecules::command_molecules;

/// HOOMD configuration inspection utility
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cmd {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prints the content of the file and the table of unique molecules
    Info {
        #[command(flatten)]
        load: LoadArgs,
    },

    /// Lists the molecules with given name
    Molecules {
        #[command(flatten)]
        load: LoadArgs,
        /// Molecule name, either automatic (molecule0, molecule1, ...)
        /// or the one given with --rename
        #[arg(short, long, required = true)]
        name: String,
    },
}

#[derive(Args)]
struct LoadArgs {
    /// HOOMD XML or GSD file
    #[arg(short, long, required = true)]
    file: String,
    /// Frame to read from gsd file
    #[arg(long, default_value_t = 0)]
    frame: usize,
    /// Don't make single-particle molecules from particles without bonds
    #[arg(long)]
    ignore_zero_bond_order: bool,
    /// Don't group particles into molecules
    #[arg(long)]
    no_molecules: bool,
    /// Name for the molecule pattern, given as PATTERN=NAME
    #[arg(short, long, value_parser = parse_rename)]
    rename: Vec<(String, String)>,
}

impl LoadArgs {
    fn options(&self) -> LoadOptions {
        let opts = LoadOptions::default()
            .frame(self.frame)
            .identify_molecules(!self.no_molecules)
            .ignore_zero_bond_order(self.ignore_zero_bond_order);
        if self.rename.is_empty() {
            opts
        } else {
            opts.rename(self.rename.iter().cloned())
        }
    }
}

fn parse_rename(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((pattern, name)) if !pattern.is_empty() && !name.is_empty() => {
            Ok((pattern.to_owned(), name.to_owned()))
        }
        _ => Err(format!("expected PATTERN=NAME, got '{s}'")),
    }
}

fn main() -> Result<()> {
    env_logger::builder()
        .format_timestamp(None)
        .format_indent(Some(8))
        .filter_level(log::LevelFilter::Info)
        .init();

    let cmd = Cmd::parse();

    // Greeting
    greeting();

    match &cmd.command {
        Commands::Info { load } => {
            println!("▶ Action: info");
            command_info(&load.file, &load.options())?;
        }
        Commands::Molecules { load, name } => {
            println!("▶ Action: molecules");
            command_molecules(&load.file, &load.options(), name)?;
        }
    }
    Ok(())
}

fn greeting() {
    use comfy_table::modifiers::UTF8_ROUND_CORNERS;
    use comfy_table::presets::UTF8_FULL;
    use comfy_table::{Attribute, Cell, Table};

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .add_row(vec![
            Cell::new("hoomd_reader - HOOMD configurations and molecules")
                .add_attributes(vec![Attribute::Bold]),
        ])
        .add_row(vec![format!(
            "{}\n{}",
            env!("CARGO_PKG_HOMEPAGE"),
            env!("CARGO_PKG_AUTHORS")
        )])
        .add_row(vec![format!("hoomd_reader version: {}", hoomd_reader::VERSION)])
        .add_row(vec![format!(
            "Utility: {}, Version: {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )]);
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_argument() {
        assert_eq!(
            parse_rename("OHH=SOL"),
            Ok(("OHH".to_owned(), "SOL".to_owned()))
        );
        assert!(parse_rename("OHH").is_err());
        assert!(parse_rename("=SOL").is_err());
    }

    #[test]
    fn options_from_args() {
        let cmd = Cmd::try_parse_from([
            "hoomd_reader",
            "info",
            "-f",
            "conf.gsd",
            "--frame",
            "3",
            "--no-molecules",
            "-r",
            "CH3CH3=ethane",
        ])
        .unwrap();
        let Commands::Info { load } = cmd.command else {
            panic!("info command expected");
        };
        let opts = load.options();
        assert_eq!(opts.frame, 3);
        assert!(!opts.identify_molecules);
        assert!(!opts.ignore_zero_bond_order);
        assert_eq!(
            opts.rename,
            Some(vec![("CH3CH3".to_owned(), "ethane".to_owned())])
        );
    }
}
