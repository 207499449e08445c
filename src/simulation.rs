//! Wires a run together: builds the managers, starts one writer per user, waits for every
//! writer and every print job they started, then snapshots what is left on the disks.
use crate::config::{ConfigError, SimConfig};
use crate::resources::{DiskId, DiskManager, DiskManagerError, FileExtent, PrinterManager};
use crate::script::{open_script, script_path};
use crate::tasks::{
    Command, PrintHandle, PrintJobError, PrintReceipt, WriterReport, WriterTask, WriterTaskError,
};
use futures::future::join_all;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{JoinError, JoinHandle};

type WriterHandle = JoinHandle<Result<WriterReport, WriterTaskError>>;

pub struct Simulation {
    config: SimConfig,
    disk_manager: DiskManager,
    printer_manager: PrinterManager,
}

#[derive(Debug)]
pub struct SimulationReport {
    /// Indexed by user id
    pub writers: Vec<Result<WriterReport, WriterTaskError>>,
    /// In the order the print jobs were handed over by the writers, across all writers
    pub print_jobs: Vec<Result<PrintReceipt, PrintJobError>>,
    pub directory: Vec<(String, FileExtent)>,
    /// Indexed by disk id
    pub disks: Vec<Vec<String>>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Simulation, SimulationError> {
        config.validate()?;

        let disk_manager = DiskManager::new(
            config.disks,
            config.sectors_per_disk,
            config.disk_latency,
        );
        let printer_manager = PrinterManager::new(
            config.printers,
            config.print_latency,
            config.output_dir.as_deref(),
        );

        Ok(Simulation {
            config,
            disk_manager,
            printer_manager,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn disk_manager(&self) -> &DiskManager {
        &self.disk_manager
    }

    pub fn printer_manager(&self) -> &PrinterManager {
        &self.printer_manager
    }

    /// Runs every USER<i> script found in the script directory.
    pub async fn run(&self) -> Result<SimulationReport, SimulationError> {
        info!(
            "Users: {}, Disks: {}, Printers: {}",
            self.config.users, self.config.disks, self.config.printers
        );
        let (print_send, print_recv) = mpsc::unbounded_channel();

        let mut writers = vec![];
        for user_id in 0..self.config.users {
            let writer = self.new_writer(user_id, print_send.clone());
            let path = script_path(&self.config.script_dir, user_id);
            writers.push(tokio::spawn(async move {
                let commands = open_script(&path).await?;
                writer.run(commands).await
            }));
        }
        drop(print_send);

        self.finish(writers, print_recv).await
    }

    /// Same as run but with the scripts already decoded, user i gets scripts[i].
    pub async fn run_commands(
        &self,
        scripts: Vec<Vec<Command>>,
    ) -> Result<SimulationReport, SimulationError> {
        let (print_send, print_recv) = mpsc::unbounded_channel();

        let writers = scripts
            .into_iter()
            .enumerate()
            .map(|(user_id, commands)| {
                let writer = self.new_writer(user_id, print_send.clone());
                tokio::spawn(writer.run_commands(commands))
            })
            .collect();
        drop(print_send);

        self.finish(writers, print_recv).await
    }

    /// Dumps the directory and every disk to the log
    pub async fn print_final_state(&self) -> Result<(), SimulationError> {
        info!("***Final Directory***");
        for (name, extent) in self.disk_manager.directory().entries().await {
            info!("{}: {}", name, extent);
        }

        info!("***Final Disk***");
        for id in 0..self.disk_manager.disk_count() {
            self.disk_manager.print_disk_content(DiskId(id)).await?;
        }
        Ok(())
    }

    fn new_writer(&self, user_id: usize, print_jobs: UnboundedSender<PrintHandle>) -> WriterTask {
        WriterTask::new(
            user_id,
            self.disk_manager.clone(),
            self.printer_manager.clone(),
            print_jobs,
        )
    }

    async fn finish(
        &self,
        writers: Vec<WriterHandle>,
        mut print_jobs: UnboundedReceiver<PrintHandle>,
    ) -> Result<SimulationReport, SimulationError> {
        let mut writer_results = vec![];
        for (user_id, joined) in join_all(writers).await.into_iter().enumerate() {
            let result = joined?;
            if let Err(e) = &result {
                warn!("User {} did not finish its script: {}", user_id, e);
            }
            debug!("joined: {}", user_id);
            writer_results.push(result);
        }

        //Every sender is gone once the writers are, so this drains all started jobs
        let mut print_results = vec![];
        while let Some(job) = print_jobs.recv().await {
            print_results.push(job.await?);
        }
        info!(
            "All writers and {} print jobs finished",
            print_results.len()
        );

        let directory = self.disk_manager.directory().entries().await;
        let mut disks = vec![];
        for id in 0..self.disk_manager.disk_count() {
            disks.push(self.disk_manager.disk_content(DiskId(id)).await?);
        }

        Ok(SimulationReport {
            writers: writer_results,
            print_jobs: print_results,
            directory,
            disks,
        })
    }
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    #[error(transparent)]
    DiskManagerError(#[from] DiskManagerError),
    #[error("A simulation task died: {0}")]
    TaskFailed(#[from] JoinError),
}
