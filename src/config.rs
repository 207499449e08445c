//! Everything a run needs to know up front. The core only ever sees the values passed in here.
use crate::constants::{DISK_DELAY, NUM_SECTORS, PRINT_DELAY};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

mod arg_parser;
pub use arg_parser::ArgParser;
pub use arg_parser::ResourceCounts;

#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub users: usize,
    pub disks: usize,
    pub printers: usize,
    pub sectors_per_disk: usize,
    pub disk_latency: Duration,
    pub print_latency: Duration,
    /// Where USER<i> scripts are read from
    pub script_dir: PathBuf,
    /// Where PRINTER<i> files are written, None keeps output in memory only
    pub output_dir: Option<PathBuf>,
}

impl SimConfig {
    /// Builds a config from the command line: -<users> -<disks> -<printers>
    ///
    /// Scripts are read from and printer files written to the current directory.
    pub fn from_args<I, S>(args: I) -> Result<SimConfig, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let counts = ArgParser::parse(args)?;
        let config = SimConfig {
            users: counts.users,
            disks: counts.disks,
            printers: counts.printers,
            output_dir: Some(PathBuf::from(".")),
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Writers and print jobs would wait forever on an empty pool
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.disks == 0 {
            return Err(ConfigError::NoResource("disks"));
        }
        if self.printers == 0 {
            return Err(ConfigError::NoResource("printers"));
        }
        if self.sectors_per_disk == 0 {
            return Err(ConfigError::NoResource("sectors per disk"));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            users: 1,
            disks: 1,
            printers: 1,
            sectors_per_disk: NUM_SECTORS,
            disk_latency: DISK_DELAY,
            print_latency: PRINT_DELAY,
            script_dir: PathBuf::from("."),
            output_dir: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Usage: -<users> -<disks> -<printers>, got {0}")]
    ParseError(String),
    #[error("Missing the {0} count")]
    MissingArgument(&'static str),
    #[error("At least one of {0} is needed")]
    NoResource(&'static str),
}
