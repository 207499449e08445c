//! A simulated disk, an array of sectors that each hold a single line of text.
//!
//! Sectors are addressed absolutely, files only exist as extents kept by the
//! directory. Every access costs a fixed latency that is slept outside of any lock so
//! other disks (and other readers of this disk) are not held up.
use super::FileExtent;
use async_stream::try_stream;
use futures::stream::Stream;
use std::{
    fmt,
    ops::{Add, AddAssign},
    sync::Arc,
    time::Duration,
};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DiskId(pub usize);

impl fmt::Display for DiskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SectorOffset(pub usize);

impl Add<usize> for SectorOffset {
    type Output = SectorOffset;

    fn add(self, rhs: usize) -> SectorOffset {
        SectorOffset(self.0 + rhs)
    }
}

impl AddAssign<usize> for SectorOffset {
    fn add_assign(&mut self, other: usize) {
        self.0.add_assign(other);
    }
}

impl fmt::Display for SectorOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug)]
pub struct Disk {
    id: DiskId,
    capacity: usize,
    latency: Duration,
    sectors: RwLock<Vec<String>>,
}

impl Disk {
    pub fn new(id: DiskId, capacity: usize, latency: Duration) -> Disk {
        Disk {
            id,
            capacity,
            latency,
            sectors: RwLock::new(vec![String::new(); capacity]),
        }
    }

    pub fn id(&self) -> DiskId {
        self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Overwrites the sector with the line, then pays the disk latency.
    pub async fn write(&self, sector: SectorOffset, line: &str) -> Result<(), DiskError> {
        {
            let mut sectors = self.sectors.write().await;
            let slot = sectors
                .get_mut(sector.0)
                .ok_or(DiskError::SectorOutOfRange(self.id, sector, self.capacity))?;
            slot.clear();
            slot.push_str(line);
        }
        trace!("Disk {} wrote sector {}", self.id, sector);

        tokio::time::sleep(self.latency).await;
        Ok(())
    }

    /// Returns the sector's line (empty if never written), then pays the disk latency.
    pub async fn read(&self, sector: SectorOffset) -> Result<String, DiskError> {
        let line = {
            let sectors = self.sectors.read().await;
            sectors
                .get(sector.0)
                .cloned()
                .ok_or(DiskError::SectorOutOfRange(self.id, sector, self.capacity))?
        };
        trace!("Disk {} read sector {}", self.id, sector);

        tokio::time::sleep(self.latency).await;
        Ok(line)
    }

    /// Reads every sector of an extent in order, one read (and one latency) per item.
    pub fn stream_extent(
        self: Arc<Self>,
        extent: FileExtent,
    ) -> impl Stream<Item = Result<String, DiskError>> {
        try_stream! {
            for sector in extent.sectors() {
                let line = self.read(sector).await?;
                yield line;
            }
        }
    }

    /// Snapshot of every sector below `used`, no latency is charged.
    pub async fn contents(&self, used: SectorOffset) -> Vec<String> {
        let sectors = self.sectors.read().await;
        let used = used.0.min(sectors.len());
        sectors[..used].to_vec()
    }
}

#[derive(Debug, Error)]
pub enum DiskError {
    #[error("Disk {0} has no sector {1}, capacity is {2}")]
    SectorOutOfRange(DiskId, SectorOffset, usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::pin_mut;
    use tokio_stream::StreamExt;

    fn get_test_disk(capacity: usize) -> Disk {
        Disk::new(DiskId(0), capacity, Duration::from_millis(0))
    }

    #[tokio::test]
    async fn test_read_write() -> Result<(), Box<dyn std::error::Error>> {
        let disk = get_test_disk(8);

        assert_eq!(disk.read(SectorOffset(3)).await?, "");

        disk.write(SectorOffset(3), "hello").await?;
        assert_eq!(disk.read(SectorOffset(3)).await?, "hello");

        //Writes replace, they never append
        disk.write(SectorOffset(3), "bye").await?;
        assert_eq!(disk.read(SectorOffset(3)).await?, "bye");

        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_range() -> Result<(), Box<dyn std::error::Error>> {
        let disk = get_test_disk(4);

        disk.write(SectorOffset(3), "last").await?;
        assert!(matches!(
            disk.write(SectorOffset(4), "over").await,
            Err(DiskError::SectorOutOfRange(DiskId(0), SectorOffset(4), 4))
        ));
        assert!(disk.read(SectorOffset(100)).await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_latency_applied() -> Result<(), Box<dyn std::error::Error>> {
        let disk = Disk::new(DiskId(1), 4, Duration::from_millis(30));

        let start = tokio::time::Instant::now();
        disk.write(SectorOffset(0), "a").await?;
        disk.read(SectorOffset(0)).await?;
        assert!(start.elapsed() >= Duration::from_millis(60));

        Ok(())
    }

    #[tokio::test]
    async fn test_stream_extent() -> Result<(), Box<dyn std::error::Error>> {
        let disk = Arc::new(get_test_disk(10));
        for (i, line) in ["x", "alpha", "beta", "gamma", "y"].iter().enumerate() {
            disk.write(SectorOffset(i), line).await?;
        }

        let extent = FileExtent::new(DiskId(0), SectorOffset(1), 3);
        let lines = disk.clone().stream_extent(extent);
        pin_mut!(lines);

        let mut found = vec![];
        while let Some(line) = lines.next().await {
            found.push(line?);
        }
        assert_eq!(found, vec!["alpha", "beta", "gamma"]);

        let past_end = disk.stream_extent(FileExtent::new(DiskId(0), SectorOffset(9), 2));
        pin_mut!(past_end);
        assert!(past_end.next().await.unwrap().is_ok());
        assert!(past_end.next().await.unwrap().is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_contents() -> Result<(), Box<dyn std::error::Error>> {
        let disk = get_test_disk(10);
        assert!(disk.contents(SectorOffset(0)).await.is_empty());

        disk.write(SectorOffset(0), "one").await?;
        disk.write(SectorOffset(2), "three").await?;
        assert_eq!(disk.contents(SectorOffset(3)).await, vec!["one", "", "three"]);

        //Blank sectors inside the bound are kept, anything past it is not
        assert_eq!(disk.contents(SectorOffset(4)).await, vec!["one", "", "three", ""]);
        assert_eq!(disk.contents(SectorOffset(1)).await, vec!["one"]);
        assert_eq!(disk.contents(SectorOffset(50)).await.len(), 10);

        Ok(())
    }
}
