//! A simulated line printer. Every printed line is kept in memory and, when the printer was
//! given an output directory, appended to its PRINTER<id> file.
use crate::constants::PRINTER_OUTPUT_PREFIX;
use bytes::{BufMut, BytesMut};
use std::{
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PrinterId(pub usize);

impl fmt::Display for PrinterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug)]
pub struct Printer {
    id: PrinterId,
    latency: Duration,
    output_path: Option<PathBuf>,
    printed: Mutex<Vec<String>>,
}

impl Printer {
    pub fn new(id: PrinterId, latency: Duration, output_dir: Option<&Path>) -> Printer {
        let output_path =
            output_dir.map(|dir| dir.join(format!("{}{}", PRINTER_OUTPUT_PREFIX, id.0)));
        Printer {
            id,
            latency,
            output_path,
            printed: Mutex::new(vec![]),
        }
    }

    pub fn id(&self) -> PrinterId {
        self.id
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Appends a line to the printer's output, the file is flushed before the print delay starts.
    pub async fn print(&self, line: &str) -> Result<(), PrinterError> {
        {
            let mut printed = self.printed.lock().await;

            if let Some(path) = &self.output_path {
                let mut buffer = BytesMut::with_capacity(line.len() + 1);
                buffer.put_slice(line.as_bytes());
                buffer.put_u8(b'\n');

                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .await?;
                file.write_all(&buffer).await?;
                file.flush().await?;
            }

            printed.push(line.to_string());
        }
        trace!("Printer {} printed a line", self.id);

        tokio::time::sleep(self.latency).await;
        Ok(())
    }

    pub async fn printed_lines(&self) -> Vec<String> {
        self.printed.lock().await.clone()
    }
}

#[derive(Debug, Error)]
pub enum PrinterError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}
