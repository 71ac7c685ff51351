// Copyright 2017-2024 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the MIT License.

/*! The main mockcat driver command

Two sub-commands: `tables` merges a directory of Shark mock and Stingray SED
chunks into `galaxies.csv` and `groups.csv`, and `metadata` writes the
archive metadata files described by a layout file.

*/

use anyhow::{Context, Error};
use clap::{crate_version, Arg, ArgMatches, Command};
use mockcat_core::mc_note;
use mockcat_core::notify::{ClapNotificationArgsExt, NotificationBackend};
use mockcat_hdf5::Hdf5Opener;
use mockcat_shark::discovery::DEFAULT_EXTENSION;
use mockcat_shark::layout::{write_archive_metadata, ArchiveLayout};
use mockcat_shark::merge::{build_big_tables, TableBuildConfig};
use std::path::PathBuf;
use std::process;

fn main() {
    let matches = make_app().get_matches();

    process::exit(mockcat_core::notify::run_with_notifications(
        matches,
        |matches, nbe| -> Result<i32, Error> {
            match matches.subcommand() {
                Some(("tables", m)) => do_tables(m, nbe),
                Some(("metadata", m)) => do_metadata(m, nbe),
                _ => {
                    make_app().print_long_help()?;
                    Ok(0)
                }
            }
        },
    ));
}

fn make_app() -> Command {
    Command::new("mockcat")
        .version(crate_version!())
        .about("Consolidate Shark mock catalogues for archive ingestion")
        .mockcat_notify_args()
        .subcommand(
            Command::new("tables")
                .about("Merge mock and SED chunks into galaxy and group CSV tables")
                .arg(
                    Arg::new("input_dir")
                        .long("input-dir")
                        .short('i')
                        .value_name("DIR")
                        .help("The directory holding the catalogue chunks")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value("."),
                )
                .arg(
                    Arg::new("output_dir")
                        .long("output-dir")
                        .short('o')
                        .value_name("DIR")
                        .help("The directory in which to write the tables")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value("."),
                )
                .arg(
                    Arg::new("mock_prefix")
                        .long("mock-prefix")
                        .value_name("PREFIX")
                        .help("The file name prefix of the mock catalogue chunks")
                        .default_value("mocksky"),
                )
                .arg(
                    Arg::new("sed_prefix")
                        .long("sed-prefix")
                        .value_name("PREFIX")
                        .help("The file name prefix of the SED chunks")
                        .default_value("Sting-SED-eagle-rr14_"),
                )
                .arg(
                    Arg::new("extension")
                        .long("extension")
                        .value_name("EXT")
                        .help("The file name extension of all chunks")
                        .default_value(DEFAULT_EXTENSION),
                )
                .arg(
                    Arg::new("galaxies_name")
                        .long("galaxies-name")
                        .value_name("NAME")
                        .help("The file name of the galaxy table")
                        .default_value("galaxies.csv"),
                )
                .arg(
                    Arg::new("groups_name")
                        .long("groups-name")
                        .value_name("NAME")
                        .help("The file name of the group table")
                        .default_value("groups.csv"),
                ),
        )
        .subcommand(
            Command::new("metadata")
                .about("Write column, table and group metadata for archive ingestion")
                .arg(
                    Arg::new("LAYOUT")
                        .help("The path to the archive layout JSON file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("output_dir")
                        .long("output-dir")
                        .short('o')
                        .value_name("DIR")
                        .help("The directory in which to write the metadata files")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value("."),
                ),
        )
}

fn string_arg(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.get_one::<String>(name).cloned()
}

fn table_config(matches: &ArgMatches) -> TableBuildConfig {
    let mut config = TableBuildConfig::new(
        matches.get_one::<PathBuf>("input_dir").cloned().unwrap_or_default(),
        matches.get_one::<PathBuf>("output_dir").cloned().unwrap_or_default(),
    );

    if let Some(p) = string_arg(matches, "mock_prefix") {
        config.mock_prefix = p;
    }

    if let Some(p) = string_arg(matches, "sed_prefix") {
        config.sed_prefix = p;
    }

    if let Some(e) = string_arg(matches, "extension") {
        config.extension = e;
    }

    if let Some(n) = string_arg(matches, "galaxies_name") {
        config.galaxies_file_name = n;
    }

    if let Some(n) = string_arg(matches, "groups_name") {
        config.groups_file_name = n;
    }

    config
}

/// Build the consolidated galaxy and group tables.
fn do_tables(matches: &ArgMatches, nbe: &mut dyn NotificationBackend) -> Result<i32, Error> {
    let config = table_config(matches);

    let report = build_big_tables(&Hdf5Opener, &config, nbe).with_context(|| {
        format!(
            "failed to build catalogue tables from \"{}\"",
            config.input_dir.display()
        )
    })?;

    mc_note!(
        nbe,
        "wrote {} galaxies ({} columns) and {} groups ({} columns)",
        report.galaxy_rows,
        report.galaxy_columns,
        report.group_rows,
        report.group_columns
    );
    Ok(0)
}

/// Write the archive metadata files.
fn do_metadata(matches: &ArgMatches, nbe: &mut dyn NotificationBackend) -> Result<i32, Error> {
    let layout_path = matches
        .get_one::<PathBuf>("LAYOUT")
        .context("no layout file given")?;
    let out_dir = matches
        .get_one::<PathBuf>("output_dir")
        .cloned()
        .unwrap_or_default();

    let layout = ArchiveLayout::from_path(layout_path)
        .with_context(|| format!("failed to load the layout \"{}\"", layout_path.display()))?;

    let report = write_archive_metadata(&Hdf5Opener, &layout, &out_dir, nbe)
        .context("failed to write the archive metadata")?;

    mc_note!(
        nbe,
        "described {} columns in \"{}\"",
        report.n_columns,
        report.column_meta.display()
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_is_consistent() {
        make_app().debug_assert();
    }

    #[test]
    fn table_defaults() {
        let m = make_app()
            .try_get_matches_from(["mockcat", "tables", "-i", "in", "--galaxies-name", "g.csv"])
            .unwrap();
        let (_, sub) = m.subcommand().unwrap();
        let config = table_config(sub);

        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.mock_prefix, "mocksky");
        assert_eq!(config.sed_prefix, "Sting-SED-eagle-rr14_");
        assert_eq!(config.extension, "hdf5");
        assert_eq!(config.galaxies_file_name, "g.csv");
        assert_eq!(config.groups_file_name, "groups.csv");
    }

    #[test]
    fn metadata_requires_layout() {
        assert!(make_app()
            .try_get_matches_from(["mockcat", "metadata"])
            .is_err());
    }
}
