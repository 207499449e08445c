//Vendor Imports
#[macro_use]
extern crate log;
extern crate simplelog;
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode};

//Application Imports
use spooloslib::config::SimConfig;
use spooloslib::simulation::Simulation;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    CombinedLogger::init(vec![TermLogger::new(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])?;

    //command line format: spoolos -<users> -<disks> -<printers>
    let config = match SimConfig::from_args(std::env::args().skip(1)) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    info!("*** Simple OS Simulation ***");
    let simulation = Simulation::new(config)?;
    let report = simulation.run().await?;

    let failed_writers = report.writers.iter().filter(|w| w.is_err()).count();
    let failed_prints = report.print_jobs.iter().filter(|p| p.is_err()).count();
    info!(
        "{} of {} users finished their scripts, {} of {} print jobs succeeded",
        report.writers.len() - failed_writers,
        report.writers.len(),
        report.print_jobs.len() - failed_prints,
        report.print_jobs.len()
    );

    simulation.print_final_state().await?;
    Ok(())
}
