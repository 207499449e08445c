//! One print request: find the file, take a printer, feed it the file line by line.
//!
//! The disk holding the file is never checked out, see DiskManager::get_disk. Only the
//! printer is exclusive and it goes back to the pool on every way out of the job.
use crate::resources::{
    Disk, DiskDirectoryError, DiskError, DiskManager, DiskManagerError, FileExtent, Printer,
    PrinterError, PrinterId, PrinterManager, PrinterManagerError,
};
use futures::pin_mut;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use uuid::Uuid;

pub type PrintHandle = JoinHandle<Result<PrintReceipt, PrintJobError>>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrintReceipt {
    pub job_id: Uuid,
    pub file_name: String,
    pub printer_id: PrinterId,
    pub extent: FileExtent,
    pub lines_printed: usize,
}

#[derive(Clone, Debug)]
pub struct PrintJob {
    id: Uuid,
    file_name: String,
    disk_manager: DiskManager,
    printer_manager: PrinterManager,
}

impl PrintJob {
    pub fn new(
        file_name: String,
        disk_manager: DiskManager,
        printer_manager: PrinterManager,
    ) -> PrintJob {
        PrintJob {
            id: Uuid::new_v4(),
            file_name,
            disk_manager,
            printer_manager,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Runs the job as its own task, failures are logged here and handed back through the handle.
    pub fn spawn(self) -> PrintHandle {
        let id = self.id;
        let file_name = self.file_name.clone();
        tokio::spawn(async move {
            let result = self.run().await;
            match &result {
                Ok(receipt) => info!(
                    "Print job {} finished {} on printer {}, {} lines",
                    id, file_name, receipt.printer_id, receipt.lines_printed
                ),
                Err(e) => warn!("Print job {} for {} failed: {}", id, file_name, e),
            }
            result
        })
    }

    pub async fn run(self) -> Result<PrintReceipt, PrintJobError> {
        let extent = self.disk_manager.directory().lookup(&self.file_name).await?;
        let disk = self.disk_manager.get_disk(extent.disk_id)?;

        let printer = self.printer_manager.request_printer().await;
        debug!(
            "Print job {} printing {} from {} on printer {}",
            self.id,
            self.file_name,
            extent,
            printer.id()
        );

        let printed = Self::print_extent(disk, extent, &printer).await;
        self.printer_manager.release_printer(printer.id()).await?;
        let lines_printed = printed?;

        Ok(PrintReceipt {
            job_id: self.id,
            file_name: self.file_name,
            printer_id: printer.id(),
            extent,
            lines_printed,
        })
    }

    async fn print_extent(
        disk: Arc<Disk>,
        extent: FileExtent,
        printer: &Printer,
    ) -> Result<usize, PrintJobError> {
        let lines = disk.stream_extent(extent);
        pin_mut!(lines);

        let mut count = 0;
        while let Some(line) = lines.next().await {
            printer.print(&line?).await?;
            count += 1;
        }
        Ok(count)
    }
}

#[derive(Debug, Error)]
pub enum PrintJobError {
    #[error(transparent)]
    DiskDirectoryError(#[from] DiskDirectoryError),
    #[error(transparent)]
    DiskError(#[from] DiskError),
    #[error(transparent)]
    DiskManagerError(#[from] DiskManagerError),
    #[error(transparent)]
    PrinterError(#[from] PrinterError),
    #[error(transparent)]
    PrinterManagerError(#[from] PrinterManagerError),
}

impl PrintJobError {
    pub fn is_file_not_found(&self) -> bool {
        matches!(
            self,
            PrintJobError::DiskDirectoryError(DiskDirectoryError::FileNotFound(_))
        )
    }
}
