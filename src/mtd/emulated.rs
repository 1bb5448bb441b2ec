//! RAM-backed backend for tests and board bring-up.

use super::backend::{MtdBackend, PowerState};
use super::error::Error;
use super::geometry::Geometry;

/// The byte value erased memory reads back as, unless overridden.
pub const DEFAULT_ERASED_BYTE: u8 = 0xFF;

/// An [`MtdBackend`] over a plain byte slice.
///
/// Without direct-write this models NOR-style media: a program operation can
/// only clear bits, so writes AND into the existing contents and an erase is
/// needed to set bits back. With direct-write it behaves like EEPROM or RAM
/// and writes replace the previous bytes. Useful for exercising MTD client
/// code without hardware.
#[derive(Debug)]
pub struct MemoryBackend<'a> {
    memory: &'a mut [u8],
    geometry: Geometry,
    direct_write: bool,
    erased_byte: u8,
}

impl<'a> MemoryBackend<'a> {
    /// Creates a backend over `memory`, which must be exactly
    /// `geometry.capacity()` bytes long.
    pub fn new(
        memory: &'a mut [u8],
        geometry: Geometry,
        direct_write: bool,
    ) -> Result<Self, Error> {
        if memory.len() != geometry.capacity() as usize {
            return Err(Error::InvalidArgument);
        }
        Ok(Self {
            memory,
            geometry,
            direct_write,
            erased_byte: DEFAULT_ERASED_BYTE,
        })
    }

    /// Overrides the erased-byte value (some media erase to `0x00`).
    pub fn erased_byte(mut self, value: u8) -> Self {
        self.erased_byte = value;
        self
    }

    /// Fills the whole backing slice with the erased byte.
    pub fn format(&mut self) {
        self.memory.fill(self.erased_byte);
    }

    /// The backing memory contents.
    pub fn contents(&self) -> &[u8] {
        self.memory
    }
}

impl MtdBackend for MemoryBackend<'_> {
    fn init(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn read(&mut self, dest: &mut [u8], addr: u32) -> Result<(), Error> {
        let addr = addr as usize;
        let end = addr.checked_add(dest.len()).ok_or(Error::OutOfRange)?;
        let src = self.memory.get(addr..end).ok_or(Error::OutOfRange)?;
        dest.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, src: &[u8], addr: u32) -> Result<(), Error> {
        let addr = addr as usize;
        let end = addr.checked_add(src.len()).ok_or(Error::OutOfRange)?;
        let dest = self.memory.get_mut(addr..end).ok_or(Error::OutOfRange)?;
        if self.direct_write {
            dest.copy_from_slice(src);
        } else {
            // NOR programming can only clear bits.
            for (d, s) in dest.iter_mut().zip(src) {
                *d &= *s;
            }
        }
        Ok(())
    }

    fn erase_sector(&mut self, first_sector: u32, count: u32) -> Result<(), Error> {
        let sector_size = self.geometry.sector_size() as usize;
        let start = (first_sector as usize)
            .checked_mul(sector_size)
            .ok_or(Error::OutOfRange)?;
        let len = (count as usize)
            .checked_mul(sector_size)
            .ok_or(Error::OutOfRange)?;
        let end = start.checked_add(len).ok_or(Error::OutOfRange)?;
        let span = self.memory.get_mut(start..end).ok_or(Error::OutOfRange)?;
        span.fill(self.erased_byte);
        Ok(())
    }

    fn power(&mut self, _state: PowerState) -> Result<(), Error> {
        Ok(())
    }

    fn direct_write(&self) -> bool {
        self.direct_write
    }
}
