//! The simulated hardware and the managers that hand it out.
/*
    Ownership:
        ResourcePool hands out indexes, nothing else.
        DiskManager = pool of disks + free sector cursors + directory
        PrinterManager = pool of printers

    Reads of a finished file go around the disk pool on purpose, see DiskManager::get_disk
*/

mod disk;
pub use disk::Disk;
pub use disk::DiskError;
pub use disk::DiskId;
pub use disk::SectorOffset;

mod disk_directory;
pub use disk_directory::DiskDirectory;
pub use disk_directory::DiskDirectoryError;

mod disk_manager;
pub use disk_manager::DiskManager;
pub use disk_manager::DiskManagerError;

mod file_extent;
pub use file_extent::FileExtent;

mod printer;
pub use printer::Printer;
pub use printer::PrinterError;
pub use printer::PrinterId;

mod printer_manager;
pub use printer_manager::PrinterManager;
pub use printer_manager::PrinterManagerError;

mod resource_pool;
pub use resource_pool::ResourcePool;
pub use resource_pool::ResourcePoolError;
