use super::{Printer, PrinterId, ResourcePool, ResourcePoolError};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct PrinterManager {
    pool: Arc<ResourcePool>,
    printers: Arc<Vec<Arc<Printer>>>,
}

impl PrinterManager {
    pub fn new(printer_count: usize, latency: Duration, output_dir: Option<&Path>) -> PrinterManager {
        let printers = (0..printer_count)
            .map(|i| Arc::new(Printer::new(PrinterId(i), latency, output_dir)))
            .collect();

        PrinterManager {
            pool: Arc::new(ResourcePool::new("printer", printer_count)),
            printers: Arc::new(printers),
        }
    }

    pub fn printer_count(&self) -> usize {
        self.printers.len()
    }

    /// Checks out a printer, waiting until one is free.
    pub async fn request_printer(&self) -> Arc<Printer> {
        let index = self.pool.acquire().await;
        debug!("Printer {} checked out", index);
        self.printers[index].clone()
    }

    pub async fn release_printer(&self, id: PrinterId) -> Result<(), PrinterManagerError> {
        self.pool.release(id.0).await?;
        debug!("Printer {} released", id);
        Ok(())
    }

    pub async fn free_printers(&self) -> usize {
        self.pool.free_count().await
    }

    /// For inspecting output after a run, does not check the printer out
    pub fn get_printer(&self, id: PrinterId) -> Result<Arc<Printer>, PrinterManagerError> {
        self.printers
            .get(id.0)
            .cloned()
            .ok_or(PrinterManagerError::NoSuchPrinter(id, self.printers.len()))
    }
}

#[derive(Debug, Error)]
pub enum PrinterManagerError {
    #[error(transparent)]
    ResourcePoolError(#[from] ResourcePoolError),
    #[error("No printer {0}, there are only {1}")]
    NoSuchPrinter(PrinterId, usize),
}
