//! Hands out disks to writers and keeps track of where the next file on each disk may start.
//!
//! Writers must check a disk out through request_disk before appending to it, that is what
//! keeps two writers from ever claiming the same sectors. Readers of a saved file go through
//! get_disk instead and skip the pool entirely: a published extent is never written again
//! because the free sector cursor only moves forward.
use super::{
    Disk, DiskDirectory, DiskError, DiskId, ResourcePool, ResourcePoolError, SectorOffset,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Clone, Debug)]
pub struct DiskManager {
    pool: Arc<ResourcePool>,
    disks: Arc<Vec<Arc<Disk>>>,
    next_free: Arc<Mutex<Vec<SectorOffset>>>,
    directory: DiskDirectory,
}

impl DiskManager {
    pub fn new(disk_count: usize, sectors_per_disk: usize, latency: Duration) -> DiskManager {
        let disks = (0..disk_count)
            .map(|i| Arc::new(Disk::new(DiskId(i), sectors_per_disk, latency)))
            .collect();

        DiskManager {
            pool: Arc::new(ResourcePool::new("disk", disk_count)),
            disks: Arc::new(disks),
            next_free: Arc::new(Mutex::new(vec![SectorOffset(0); disk_count])),
            directory: DiskDirectory::new(),
        }
    }

    pub fn disk_count(&self) -> usize {
        self.disks.len()
    }

    /// Checks out the lowest numbered free disk, waiting if every disk is busy.
    pub async fn request_disk(&self) -> Arc<Disk> {
        let index = self.pool.acquire().await;
        debug!("Disk {} checked out", index);
        self.disks[index].clone()
    }

    pub async fn release_disk(&self, id: DiskId) -> Result<(), DiskManagerError> {
        self.pool.release(id.0).await?;
        debug!("Disk {} released", id);
        Ok(())
    }

    /// Direct access to a disk without checking it out. Only for reading extents that are
    /// already in the directory.
    pub fn get_disk(&self, id: DiskId) -> Result<Arc<Disk>, DiskManagerError> {
        self.disks
            .get(id.0)
            .cloned()
            .ok_or(DiskManagerError::NoSuchDisk(id, self.disks.len()))
    }

    pub async fn get_next_free_sector(&self, id: DiskId) -> Result<SectorOffset, DiskManagerError> {
        let disk = self.get_disk(id)?;
        let next_free = self.next_free.lock().await;
        let cursor = next_free[id.0];
        if cursor.0 >= disk.capacity() {
            return Err(DiskManagerError::DiskFull(id));
        }
        Ok(cursor)
    }

    pub async fn set_next_free_sector(
        &self,
        id: DiskId,
        value: SectorOffset,
    ) -> Result<(), DiskManagerError> {
        let disk = self.get_disk(id)?;
        if value.0 > disk.capacity() {
            return Err(DiskError::SectorOutOfRange(id, value, disk.capacity()).into());
        }

        let mut next_free = self.next_free.lock().await;
        let cursor = next_free[id.0];
        if value < cursor {
            return Err(DiskManagerError::CursorRegression(id, cursor, value));
        }
        next_free[id.0] = value;
        Ok(())
    }

    pub fn directory(&self) -> &DiskDirectory {
        &self.directory
    }

    /// The sectors below the disk's next free sector, which is every saved file in order.
    /// Lines left behind by an abandoned file sit past the cursor and are not included.
    pub async fn disk_content(&self, id: DiskId) -> Result<Vec<String>, DiskManagerError> {
        let disk = self.get_disk(id)?;
        let used = self.next_free.lock().await[id.0];
        Ok(disk.contents(used).await)
    }

    /// Dumps a disk to the log, meant for the end of a run
    pub async fn print_disk_content(&self, id: DiskId) -> Result<(), DiskManagerError> {
        let content = self.disk_content(id).await?;
        info!("----Disk {}---- {} sectors used", id, content.len());
        for (sector, line) in content.iter().enumerate() {
            info!("{:>5}: {}", sector, line);
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum DiskManagerError {
    #[error(transparent)]
    DiskError(#[from] DiskError),
    #[error(transparent)]
    ResourcePoolError(#[from] ResourcePoolError),
    #[error("Disk {0} has no free sectors left")]
    DiskFull(DiskId),
    #[error("No disk {0}, there are only {1}")]
    NoSuchDisk(DiskId, usize),
    #[error("Next free sector of disk {0} cannot move back from {1} to {2}")]
    CursorRegression(DiskId, SectorOffset, SectorOffset),
}
