//! Spools one user's files onto disk.
//!
//! A file is written while its disk is checked out: the first free sector of the disk is where
//! the file starts and every data line takes the next sector. Only once every line is on disk
//! does the file go into the directory, which is what lets print jobs read it without a lock.
//!
//! A DiskFull stops only the file being written, anything else stops the writer. Either way a
//! checked out disk always goes back to the pool.
use super::{Command, PrintHandle, PrintJob};
use crate::resources::{
    Disk, DiskError, DiskManager, DiskManagerError, FileExtent, PrinterManager, SectorOffset,
};
use crate::script::ScriptError;
use futures::pin_mut;
use futures::stream::{self, Stream};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tokio_stream::StreamExt;

#[derive(Debug)]
struct OpenFile {
    name: String,
    disk: Arc<Disk>,
    start_sector: SectorOffset,
    line_count: usize,
}

#[derive(Debug)]
enum WriterState {
    Idle,
    Open(OpenFile),
    /// The named file ran out of room, its remaining lines are dropped until .end
    Aborted(String),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WriterReport {
    pub user_id: usize,
    pub files_saved: Vec<String>,
    pub files_aborted: Vec<String>,
    pub print_jobs: usize,
}

pub struct WriterTask {
    user_id: usize,
    disk_manager: DiskManager,
    printer_manager: PrinterManager,
    print_jobs: UnboundedSender<PrintHandle>,
    state: WriterState,
    report: WriterReport,
}

impl WriterTask {
    pub fn new(
        user_id: usize,
        disk_manager: DiskManager,
        printer_manager: PrinterManager,
        print_jobs: UnboundedSender<PrintHandle>,
    ) -> WriterTask {
        WriterTask {
            user_id,
            disk_manager,
            printer_manager,
            print_jobs,
            state: WriterState::Idle,
            report: WriterReport {
                user_id,
                ..Default::default()
            },
        }
    }

    pub fn is_file_open(&self) -> bool {
        matches!(self.state, WriterState::Open(_))
    }

    /// Drives the writer through a whole script. Whatever happens, no disk is left checked
    /// out when this returns.
    pub async fn run<S>(mut self, commands: S) -> Result<WriterReport, WriterTaskError>
    where
        S: Stream<Item = Result<Command, ScriptError>>,
    {
        info!("User {} starting", self.user_id);
        pin_mut!(commands);

        let mut outcome = Ok(());
        while let Some(command) = commands.next().await {
            let step = match command {
                Ok(c) => self.handle(c).await,
                Err(e) => Err(e.into()),
            };
            match step {
                Ok(()) => {}
                Err(e) if e.is_disk_full() => {}
                Err(e) => {
                    error!("User {} stopped: {}", self.user_id, e);
                    outcome = Err(e);
                    break;
                }
            }
        }

        let closed = self.close().await;
        outcome?;
        closed?;

        info!(
            "User {} done, saved {} files",
            self.user_id,
            self.report.files_saved.len()
        );
        Ok(self.report)
    }

    pub async fn run_commands(self, commands: Vec<Command>) -> Result<WriterReport, WriterTaskError> {
        self.run(stream::iter(commands.into_iter().map(Ok::<Command, ScriptError>)))
            .await
    }

    pub async fn handle(&mut self, command: Command) -> Result<(), WriterTaskError> {
        match command {
            Command::BeginFile(name) => self.begin_file(&name).await,
            Command::DataLine(line) => self.write_line(&line).await,
            Command::EndFile => self.end_file().await,
            Command::PrintFile(name) => {
                self.print_file(&name);
                Ok(())
            }
        }
    }

    pub async fn begin_file(&mut self, name: &str) -> Result<(), WriterTaskError> {
        if let WriterState::Open(open) = &self.state {
            return Err(WriterTaskError::FileAlreadyOpen(
                open.name.clone(),
                name.to_string(),
            ));
        }

        let disk = self.disk_manager.request_disk().await;
        let start_sector = match self.disk_manager.get_next_free_sector(disk.id()).await {
            Ok(s) => s,
            Err(e) => {
                warn!("User {} cannot save {}: {}", self.user_id, name, e);
                self.disk_manager.release_disk(disk.id()).await?;
                self.report.files_aborted.push(name.to_string());
                self.state = WriterState::Aborted(name.to_string());
                return Err(e.into());
            }
        };
        debug!(
            "User {} saving {} to disk {} from sector {}",
            self.user_id,
            name,
            disk.id(),
            start_sector
        );

        self.state = WriterState::Open(OpenFile {
            name: name.to_string(),
            disk,
            start_sector,
            line_count: 0,
        });
        Ok(())
    }

    pub async fn write_line(&mut self, line: &str) -> Result<(), WriterTaskError> {
        let open = match &mut self.state {
            WriterState::Open(open) => open,
            WriterState::Aborted(name) => {
                trace!("User {} dropping a line of {}", self.user_id, name);
                return Ok(());
            }
            WriterState::Idle => {
                return Err(WriterTaskError::NoOpenFile(line.to_string()));
            }
        };

        let sector = open.start_sector + open.line_count;
        if sector.0 >= open.disk.capacity() {
            let id = open.disk.id();
            return self.abort_file(DiskManagerError::DiskFull(id)).await;
        }

        open.disk.write(sector, line).await?;
        open.line_count += 1;
        Ok(())
    }

    /// Publishes the open file, moves the disk's free sector past it and gives the disk back.
    pub async fn end_file(&mut self) -> Result<(), WriterTaskError> {
        match std::mem::replace(&mut self.state, WriterState::Idle) {
            WriterState::Open(open) => {
                let id = open.disk.id();
                let extent = FileExtent::new(id, open.start_sector, open.line_count);

                self.disk_manager.directory().enter(&open.name, extent).await;
                let advanced = self
                    .disk_manager
                    .set_next_free_sector(id, extent.end_sector())
                    .await;
                self.disk_manager.release_disk(id).await?;
                advanced?;

                info!("User {} saved {} to {}", self.user_id, open.name, extent);
                self.report.files_saved.push(open.name);
                Ok(())
            }
            WriterState::Aborted(name) => {
                debug!("User {} closed abandoned file {}", self.user_id, name);
                Ok(())
            }
            WriterState::Idle => Err(WriterTaskError::NoOpenFile(Command::EndFile.to_string())),
        }
    }

    /// Starts a print job for the file and carries on without waiting for it.
    pub fn print_file(&mut self, name: &str) {
        let job = PrintJob::new(
            name.to_string(),
            self.disk_manager.clone(),
            self.printer_manager.clone(),
        );
        debug!("User {} queued print job {} for {}", self.user_id, job.id(), name);

        if self.print_jobs.send(job.spawn()).is_err() {
            warn!(
                "User {} has nobody waiting on its print jobs, {} runs detached",
                self.user_id, name
            );
        }
        self.report.print_jobs += 1;
    }

    async fn abort_file(&mut self, cause: DiskManagerError) -> Result<(), WriterTaskError> {
        if let WriterState::Open(open) = std::mem::replace(&mut self.state, WriterState::Idle) {
            warn!("User {} abandoning {}: {}", self.user_id, open.name, cause);
            self.disk_manager.release_disk(open.disk.id()).await?;
            self.report.files_aborted.push(open.name.clone());
            self.state = WriterState::Aborted(open.name);
        }
        Err(cause.into())
    }

    /// Gives back a disk still held by an unterminated file, nothing is published for it.
    async fn close(&mut self) -> Result<(), WriterTaskError> {
        if let WriterState::Open(open) = std::mem::replace(&mut self.state, WriterState::Idle) {
            warn!(
                "User {} never ended {}, dropping it",
                self.user_id, open.name
            );
            self.disk_manager.release_disk(open.disk.id()).await?;
            self.report.files_aborted.push(open.name);
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum WriterTaskError {
    #[error(transparent)]
    DiskError(#[from] DiskError),
    #[error(transparent)]
    DiskManagerError(#[from] DiskManagerError),
    #[error(transparent)]
    ScriptError(#[from] ScriptError),
    #[error("Cannot start {1} while {0} is still open")]
    FileAlreadyOpen(String, String),
    #[error("No file is open for: {0}")]
    NoOpenFile(String),
}

impl WriterTaskError {
    pub fn is_disk_full(&self) -> bool {
        matches!(
            self,
            WriterTaskError::DiskManagerError(DiskManagerError::DiskFull(_))
        )
    }
}
