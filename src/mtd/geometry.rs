//! Device geometry: page size, pages per sector, sector count.

use super::error::Error;

/// Immutable description of a device's shape.
///
/// A device is composed of pages combined into sectors. A page is the
/// largest unit a backend accepts in one write call; a sector is the
/// smallest erasable unit. The number of pages per sector is constant for
/// the whole device. Geometry is set once at device construction and never
/// mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    page_size: u32,
    pages_per_sector: u32,
    sector_count: u32,
}

impl Geometry {
    /// Creates a validated geometry.
    ///
    /// All three fields must be non-zero, and the derived sector size and
    /// total capacity must fit in `u32`; otherwise
    /// [`Error::InvalidArgument`] is returned.
    pub fn new(
        page_size: u32,
        pages_per_sector: u32,
        sector_count: u32,
    ) -> Result<Self, Error> {
        if page_size == 0 || pages_per_sector == 0 || sector_count == 0 {
            return Err(Error::InvalidArgument);
        }
        let sector_size = page_size
            .checked_mul(pages_per_sector)
            .ok_or(Error::InvalidArgument)?;
        sector_size
            .checked_mul(sector_count)
            .ok_or(Error::InvalidArgument)?;
        Ok(Self {
            page_size,
            pages_per_sector,
            sector_count,
        })
    }

    /// Size of one page in bytes.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of pages in one sector.
    pub fn pages_per_sector(&self) -> u32 {
        self.pages_per_sector
    }

    /// Number of sectors on the device.
    pub fn sector_count(&self) -> u32 {
        self.sector_count
    }

    /// Size of one sector in bytes (`page_size * pages_per_sector`).
    pub fn sector_size(&self) -> u32 {
        self.page_size * self.pages_per_sector
    }

    /// Total number of pages on the device.
    pub fn page_count(&self) -> u32 {
        self.pages_per_sector * self.sector_count
    }

    /// Total device capacity in bytes.
    pub fn capacity(&self) -> u32 {
        self.sector_size() * self.sector_count
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Geometry {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Geometry {{ page_size: {}, pages_per_sector: {}, sector_count: {} }}",
            self.page_size,
            self.pages_per_sector,
            self.sector_count
        )
    }
}
