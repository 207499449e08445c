//! Defaults for the simulated hardware.
use std::time::Duration;

/// Number of sectors on every disk, one line of text per sector
pub const NUM_SECTORS: usize = 2048;

/// Simulated seek + transfer time for every disk read or write
pub const DISK_DELAY: Duration = Duration::from_millis(80);

/// Simulated time to push one line through a printer
pub const PRINT_DELAY: Duration = Duration::from_millis(275);

/// Prefix of the per user command script, suffixed by the user number
pub const USER_SCRIPT_PREFIX: &str = "USER";

/// Prefix of the per printer output file, suffixed by the printer number
pub const PRINTER_OUTPUT_PREFIX: &str = "PRINTER";
