//! The two kinds of concurrent work in the system: writers that spool a user's files onto
//! disks and print jobs that stream a saved file out to a printer.

mod command;
pub use command::Command;

mod print_job;
pub use print_job::PrintHandle;
pub use print_job::PrintJob;
pub use print_job::PrintJobError;
pub use print_job::PrintReceipt;

mod writer_task;
pub use writer_task::WriterReport;
pub use writer_task::WriterTask;
pub use writer_task::WriterTaskError;
