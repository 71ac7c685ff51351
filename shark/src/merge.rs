// Copyright 2024 Peter Williams and collaborators
// Licensed under the MIT License.

//! Building the consolidated catalogue tables.
//!
//! The galaxy table of the mock files and the magnitude table of the SED
//! files describe the same galaxies in the same order, so they are joined
//! side by side. The group table is written out as-is.

use mockcat_core::container::ContainerOpener;
use mockcat_core::{ctry, mc_note, mc_warning};
use mockcat_core::notify::NotificationBackend;
use std::path::PathBuf;

use crate::discovery::{discover, DEFAULT_EXTENSION};
use crate::errors::Result;
use crate::mock::scrape_all_mock_data;
use crate::sed::scrape_all_sed_data;

/// Where to find the catalogue chunks and where to put the merged tables.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableBuildConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub mock_prefix: String,
    pub sed_prefix: String,
    pub extension: String,
    pub galaxies_file_name: String,
    pub groups_file_name: String,
}

impl TableBuildConfig {
    /// A configuration with the conventional Shark/Stingray file names.
    pub fn new<P1: Into<PathBuf>, P2: Into<PathBuf>>(input_dir: P1, output_dir: P2) -> Self {
        TableBuildConfig {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            mock_prefix: "mocksky".to_owned(),
            sed_prefix: "Sting-SED-eagle-rr14_".to_owned(),
            extension: DEFAULT_EXTENSION.to_owned(),
            galaxies_file_name: "galaxies.csv".to_owned(),
            groups_file_name: "groups.csv".to_owned(),
        }
    }
}

/// A summary of what `build_big_tables` wrote.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildReport {
    pub galaxies_path: PathBuf,
    pub galaxy_rows: usize,
    pub galaxy_columns: usize,
    pub groups_path: PathBuf,
    pub group_rows: usize,
    pub group_columns: usize,
}

/// Scrape all mock and SED files and write the merged galaxy table and the
/// group table.
///
/// The SED table must have exactly as many rows as the galaxy table. If it
/// does not, nothing is written.
pub fn build_big_tables<O: ContainerOpener>(
    opener: &O,
    config: &TableBuildConfig,
    nbe: &mut dyn NotificationBackend,
) -> Result<BuildReport> {
    let mock_paths = discover(&config.input_dir, &config.mock_prefix, &config.extension)?;
    let sed_paths = discover(&config.input_dir, &config.sed_prefix, &config.extension)?;

    if mock_paths.len() != sed_paths.len() {
        mc_warning!(
            nbe,
            "found {} mock files but {} SED files",
            mock_paths.len(),
            sed_paths.len()
        );
    }

    mc_note!(nbe, "scraping {} mock files", mock_paths.len());
    let mock = scrape_all_mock_data(opener, &mock_paths, nbe)?;

    mc_note!(nbe, "scraping {} SED files", sed_paths.len());
    let sed = scrape_all_sed_data(opener, &sed_paths, nbe)?;

    let galaxies = ctry!(mock.galaxies.hstack(sed);
                         "the SED files do not describe the same galaxies as the mock files");

    let report = BuildReport {
        galaxies_path: config.output_dir.join(&config.galaxies_file_name),
        galaxy_rows: galaxies.n_rows(),
        galaxy_columns: galaxies.n_columns(),
        groups_path: config.output_dir.join(&config.groups_file_name),
        group_rows: mock.groups.n_rows(),
        group_columns: mock.groups.n_columns(),
    };

    mc_note!(nbe, "writing galaxies to \"{}\"", report.galaxies_path.display());
    galaxies.write_csv_file(&report.galaxies_path)?;

    mc_note!(nbe, "writing groups to \"{}\"", report.groups_path.display());
    mock.groups.write_csv_file(&report.groups_path)?;

    Ok(report)
}
