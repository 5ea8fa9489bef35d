use bevy::prelude::Resource;
use clap::Parser;
use std::path::PathBuf;

use crate::settings::{
    DEFAULT_PREFS_FILE, DEFAULT_PRIMARY_CATCHMENTS_FILE, DEFAULT_PROPERTIES_FILE,
    DEFAULT_SECONDARY_CATCHMENTS_FILE,
};

/// Perch property browser command line interface
#[derive(Parser, Debug, Resource)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the property feed JSON
    #[arg(long = "properties")]
    pub properties: Option<PathBuf>,

    /// Path to the primary-school catchment overlay
    #[arg(long = "primary-catchments")]
    pub primary_catchments: Option<PathBuf>,

    /// Path to the secondary-school catchment overlay
    #[arg(long = "secondary-catchments")]
    pub secondary_catchments: Option<PathBuf>,

    /// Path to the preference store file
    #[arg(long = "prefs")]
    pub prefs: Option<PathBuf>,

    /// Apply an exported data file to the preference store on startup
    /// (and again on the I key)
    #[arg(long = "import")]
    pub import: Option<PathBuf>,

    /// Run with a synthetic dataset instead of loading files
    #[arg(long, default_value_t = false)]
    pub demo: bool,

    /// Display debug information
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl CliArgs {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn properties_path(&self) -> PathBuf {
        self.properties
            .clone()
            .unwrap_or_else(|| DEFAULT_PROPERTIES_FILE.into())
    }

    pub fn primary_catchments_path(&self) -> PathBuf {
        self.primary_catchments
            .clone()
            .unwrap_or_else(|| DEFAULT_PRIMARY_CATCHMENTS_FILE.into())
    }

    pub fn secondary_catchments_path(&self) -> PathBuf {
        self.secondary_catchments
            .clone()
            .unwrap_or_else(|| DEFAULT_SECONDARY_CATCHMENTS_FILE.into())
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.prefs.clone().unwrap_or_else(|| DEFAULT_PREFS_FILE.into())
    }
}
