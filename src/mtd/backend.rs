//! Backend capability contract.
//!
//! A backend driver (flash controller, SPI EEPROM, SD card, ...) implements
//! [`MtdBackend`] for the capabilities its hardware provides. Every method
//! has a default body returning [`Error::Unsupported`], so the absence of a
//! capability surfaces at call time rather than at compile time; the device
//! handle in [`super::Mtd`] only ever talks to a backend through this trait.

use super::error::Error;

/// Power states a backend can be asked to enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// Device powered and able to service requests.
    Up,
    /// Low-power state; wake-up semantics are backend-defined.
    Down,
}

#[cfg(feature = "defmt")]
impl defmt::Format for PowerState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            PowerState::Up => defmt::write!(f, "Up"),
            PowerState::Down => defmt::write!(f, "Down"),
        }
    }
}

/// The capability set a storage backend exposes to the MTD layer.
///
/// Addresses handed to [`read`](MtdBackend::read) and
/// [`write`](MtdBackend::write) are raw device byte addresses; the MTD layer
/// has already validated them against the device geometry and, for writes,
/// guaranteed that the span stays within one page.
pub trait MtdBackend {
    /// Prepares the backend for use.
    ///
    /// Called by [`Mtd::init`](super::Mtd::init) before any data operation.
    /// A backend that needs no preparation implements this as `Ok(())`.
    fn init(&mut self) -> Result<(), Error> {
        Err(Error::Unsupported)
    }

    /// Reads `dest.len()` bytes starting at byte address `addr`.
    ///
    /// No alignment is required on `addr` or the length.
    fn read(&mut self, dest: &mut [u8], addr: u32) -> Result<(), Error> {
        let _ = (dest, addr);
        Err(Error::Unsupported)
    }

    /// Writes `src.len()` bytes starting at byte address `addr`.
    ///
    /// Never called with a span that crosses a page boundary. Unless
    /// [`direct_write`](MtdBackend::direct_write) returns `true`, the effect
    /// of writing over non-erased memory is backend-defined.
    fn write(&mut self, src: &[u8], addr: u32) -> Result<(), Error> {
        let _ = (src, addr);
        Err(Error::Unsupported)
    }

    /// Erases `count` whole sectors starting at sector `first_sector`.
    ///
    /// A backend that only supports erasing one sector per call may refuse
    /// `count > 1` with [`Error::Unsupported`]; the MTD layer then retries
    /// sector by sector.
    fn erase_sector(&mut self, first_sector: u32, count: u32) -> Result<(), Error> {
        let _ = (first_sector, count);
        Err(Error::Unsupported)
    }

    /// Applies a power state transition.
    fn power(&mut self, state: PowerState) -> Result<(), Error> {
        let _ = state;
        Err(Error::Unsupported)
    }

    /// Whether this backend can overwrite previously written memory without
    /// an erase.
    ///
    /// When `true`, a write completely overrides the previous value and the
    /// erase-emulated write path degenerates to a raw write. When `false`,
    /// this makes no statement on whether overwriting non-erased memory is
    /// allowed at all; that remains backend-defined.
    fn direct_write(&self) -> bool {
        false
    }
}
