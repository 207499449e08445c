//! Where a saved file lives: a run of contiguous sectors on one disk.
use super::{DiskId, SectorOffset};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FileExtent {
    pub disk_id: DiskId,
    pub start_sector: SectorOffset,
    pub length: usize,
}

impl FileExtent {
    pub fn new(disk_id: DiskId, start_sector: SectorOffset, length: usize) -> FileExtent {
        FileExtent {
            disk_id,
            start_sector,
            length,
        }
    }

    /// First sector past the end of the extent
    pub fn end_sector(&self) -> SectorOffset {
        self.start_sector + self.length
    }

    pub fn sectors(&self) -> impl Iterator<Item = SectorOffset> {
        (self.start_sector.0..self.end_sector().0).map(SectorOffset)
    }

    pub fn overlaps(&self, other: &FileExtent) -> bool {
        self.disk_id == other.disk_id
            && self.length > 0
            && other.length > 0
            && self.start_sector < other.end_sector()
            && other.start_sector < self.end_sector()
    }
}

impl fmt::Display for FileExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "disk {} sectors {}..{} ({} lines)",
            self.disk_id,
            self.start_sector,
            self.end_sector(),
            self.length
        )
    }
}
