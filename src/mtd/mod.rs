//! # Memory Technology Device layer
//!
//! This module is the generic dispatch and address-translation core. It
//! takes arbitrary byte-addressed or page-addressed requests, validates them
//! against the device [`Geometry`], splits them into backend calls that
//! respect page and sector boundaries, and emulates read-modify-write for
//! media that cannot overwrite memory without erasing it first.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Application                        │
//! └─────────────────────────────────────────────────────────┘
//!        │ read / write_raw / write / erase / set_power
//!        ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Mtd device handle                   │
//! │  bounds validation → request splitting → dispatch       │
//! └─────────────────────────────────────────────────────────┘
//!        │ page- and sector-sized backend calls
//!        ▼
//! ┌─────────────────┐  ┌─────────────────┐  ┌──────────────┐
//! │  NOR/NAND flash │  │   SPI EEPROM    │  │  SD/MMC card │
//! └─────────────────┘  └─────────────────┘  └──────────────┘
//! ```
//!
//! All calls are synchronous and run to completion on the caller's thread;
//! backend calls within one logical operation are issued sequentially in
//! strictly increasing address order. Sharing one handle across threads
//! requires external synchronization.

/// Backend capability contract and power states.
pub mod backend;
/// RAM-backed reference backend for tests and bring-up.
pub mod emulated;
/// Common error types for MTD operations.
pub mod error;
/// Device geometry model.
pub mod geometry;


pub use backend::{MtdBackend, PowerState};
pub use emulated::MemoryBackend;
pub use error::Error;
pub use geometry::Geometry;

use log::{debug, error};

/// Lifecycle state of a device handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Constructed but not yet initialized.
    Uninitialized,
    /// Initialization succeeded; data operations are accepted.
    Ready,
    /// Initialization failed; data operations are rejected until a retried
    /// [`Mtd::init`] succeeds.
    Faulted,
}

/// A device handle binding one backend to its geometry.
///
/// The handle owns the backend, the immutable [`Geometry`] and the
/// initialization state. When constructed through
/// [`with_scratch`](Mtd::with_scratch) it additionally holds exclusive use
/// of a sector-sized scratch buffer, which enables the erase-emulated
/// [`write`](Mtd::write) path on media without direct-write capability.
///
/// All operations except [`init`](Mtd::init) require the handle to be
/// [`DeviceState::Ready`] and fail with [`Error::NotReady`] otherwise.
/// Multi-step operations abort on the first backend error; completed
/// sub-steps are not rolled back.
pub struct Mtd<'buf, B: MtdBackend> {
    backend: B,
    geometry: Geometry,
    state: DeviceState,
    scratch: Option<&'buf mut [u8]>,
}

impl<B: MtdBackend> core::fmt::Debug for Mtd<'_, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Mtd")
            .field("geometry", &self.geometry)
            .field("state", &self.state)
            .field("scratch", &self.scratch.as_ref().map(|s| s.len()))
            .finish_non_exhaustive()
    }
}

impl<'buf, B: MtdBackend> Mtd<'buf, B> {
    /// Creates a handle without a scratch buffer.
    ///
    /// The erase-emulated [`write`](Mtd::write) path is then only available
    /// on backends that advertise [`MtdBackend::direct_write`]; on all
    /// others it fails with [`Error::Unsupported`].
    pub fn new(backend: B, geometry: Geometry) -> Self {
        Self {
            backend,
            geometry,
            state: DeviceState::Uninitialized,
            scratch: None,
        }
    }

    /// Creates a handle that owns `scratch` for erase-emulated writes.
    ///
    /// `scratch` must be exactly one sector long
    /// (`geometry.sector_size()` bytes), otherwise
    /// [`Error::InvalidArgument`] is returned.
    pub fn with_scratch(
        backend: B,
        geometry: Geometry,
        scratch: &'buf mut [u8],
    ) -> Result<Self, Error> {
        if scratch.len() != geometry.sector_size() as usize {
            return Err(Error::InvalidArgument);
        }
        Ok(Self {
            backend,
            geometry,
            state: DeviceState::Uninitialized,
            scratch: Some(scratch),
        })
    }

    /// Current lifecycle state of the handle.
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// The device geometry.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Shared access to the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Exclusive access to the backend.
    ///
    /// Calls made directly on the backend bypass bounds validation and
    /// request splitting.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consumes the handle and returns the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Initializes the device.
    ///
    /// Idempotent once the handle is [`DeviceState::Ready`]. On backend
    /// failure the handle transitions to [`DeviceState::Faulted`] and the
    /// backend error is returned; `init` may be retried on a faulted
    /// handle.
    pub fn init(&mut self) -> Result<(), Error> {
        if self.state == DeviceState::Ready {
            return Ok(());
        }
        match self.backend.init() {
            Ok(()) => {
                self.state = DeviceState::Ready;
                Ok(())
            }
            Err(e) => {
                error!("backend init failed: {:?}", e);
                self.state = DeviceState::Faulted;
                Err(e)
            }
        }
    }

    /// Reads `dest.len()` bytes starting at byte address `addr`.
    ///
    /// No alignment is required on `addr` or the length. Requests spanning
    /// multiple pages are split into one backend read per page, so the call
    /// is correct even for backends limited to page-relative addressing.
    /// On a backend error the operation aborts; bytes filled into `dest` by
    /// completed backend calls remain valid.
    pub fn read(&mut self, dest: &mut [u8], addr: u32) -> Result<(), Error> {
        self.check_ready()?;
        self.check_range(addr, dest.len())?;
        let page_size = self.geometry.page_size();
        let mut addr = addr;
        let mut done = 0usize;
        while done < dest.len() {
            let in_page = (page_size - addr % page_size) as usize;
            let chunk = in_page.min(dest.len() - done);
            self.backend.read(&mut dest[done..done + chunk], addr)?;
            addr += chunk as u32;
            done += chunk;
        }
        Ok(())
    }

    /// Reads with pagewise addressing: `dest.len()` bytes starting `offset`
    /// bytes into page `page`.
    ///
    /// `offset` must be smaller than the page size. The request may span
    /// multiple pages; splitting is handled as in [`read`](Mtd::read).
    pub fn read_page(&mut self, dest: &mut [u8], page: u32, offset: u32) -> Result<(), Error> {
        self.check_ready()?;
        let addr = self.page_addr(page, offset)?;
        self.read(dest, addr)
    }

    /// Writes `src.len()` bytes starting at byte address `addr`, raw.
    ///
    /// The request is split so that no single backend call crosses a page
    /// boundary. No erase and no read-modify-write is performed: writing
    /// over previously written memory is only well-defined if the backend
    /// advertises [`MtdBackend::direct_write`] or the target region is
    /// known to be erased. This path does not check either condition.
    pub fn write_raw(&mut self, src: &[u8], addr: u32) -> Result<(), Error> {
        self.check_ready()?;
        self.check_range(addr, src.len())?;
        self.write_chunks(src, addr)
    }

    /// Raw write with pagewise addressing, starting `offset` bytes into
    /// page `page`.
    ///
    /// `offset` must be smaller than the page size. Splitting and overwrite
    /// semantics are those of [`write_raw`](Mtd::write_raw).
    pub fn write_page_raw(&mut self, src: &[u8], page: u32, offset: u32) -> Result<(), Error> {
        self.check_ready()?;
        let addr = self.page_addr(page, offset)?;
        self.write_raw(src, addr)
    }

    /// Writes with pagewise addressing, erasing sectors first where the
    /// media requires it.
    ///
    /// On a backend with [`MtdBackend::direct_write`] this delegates
    /// straight to the raw write path. Otherwise the handle's scratch
    /// buffer is required ([`Error::Unsupported`] if absent) and each
    /// touched sector goes through read, overlay, erase, write-back; bytes
    /// of the sector outside the request are preserved exactly.
    ///
    /// The per-sector sequence is not atomic: power loss between the erase
    /// and the write-back loses that sector's data. On failure the current
    /// sector's update is aborted and the sub-step's error returned;
    /// sectors committed before it keep their new contents.
    pub fn write(&mut self, src: &[u8], page: u32, offset: u32) -> Result<(), Error> {
        self.check_ready()?;
        let addr = self.page_addr(page, offset)?;
        self.check_range(addr, src.len())?;
        if src.is_empty() {
            return Ok(());
        }
        if self.backend.direct_write() {
            return self.write_chunks(src, addr);
        }
        if self.scratch.is_none() {
            return Err(Error::Unsupported);
        }
        self.rmw_sectors(src, addr)
    }

    /// Erases the byte range `[addr, addr + len)`.
    ///
    /// `addr` must be sector-aligned and `len` a positive multiple of the
    /// sector size, otherwise [`Error::Misaligned`] (or
    /// [`Error::InvalidArgument`] for `len == 0`). Delegates to
    /// [`erase_sector`](Mtd::erase_sector).
    pub fn erase(&mut self, addr: u32, len: u32) -> Result<(), Error> {
        self.check_ready()?;
        if len == 0 {
            return Err(Error::InvalidArgument);
        }
        let sector_size = self.geometry.sector_size();
        if addr % sector_size != 0 || len % sector_size != 0 {
            return Err(Error::Misaligned);
        }
        let end = addr.checked_add(len).ok_or(Error::OutOfRange)?;
        if end > self.geometry.capacity() {
            return Err(Error::OutOfRange);
        }
        self.erase_sector(addr / sector_size, len / sector_size)
    }

    /// Erases `count` whole sectors starting at sector `sector`.
    ///
    /// Issues a single bulk backend call; if the backend refuses a
    /// multi-sector call with [`Error::Unsupported`], falls back to one
    /// call per sector. The fallback is attempted exactly once, with no
    /// further retries.
    pub fn erase_sector(&mut self, sector: u32, count: u32) -> Result<(), Error> {
        self.check_ready()?;
        if count == 0 {
            return Err(Error::InvalidArgument);
        }
        let end = sector.checked_add(count).ok_or(Error::OutOfRange)?;
        if end > self.geometry.sector_count() {
            return Err(Error::OutOfRange);
        }
        match self.backend.erase_sector(sector, count) {
            Err(Error::Unsupported) if count > 1 => {
                debug!("bulk erase of {} sectors refused, erasing one at a time", count);
                for s in sector..sector + count {
                    self.backend.erase_sector(s, 1)?;
                }
                Ok(())
            }
            other => other,
        }
    }

    /// Forwards a power state transition to the backend.
    ///
    /// Power state is orthogonal to readiness: a `Ready` handle stays
    /// `Ready` across [`PowerState::Down`], and whether a powered-down
    /// device wakes on the next operation is a backend contract. No power
    /// state is cached by the handle.
    pub fn set_power(&mut self, state: PowerState) -> Result<(), Error> {
        self.check_ready()?;
        self.backend.power(state)
    }

    fn check_ready(&self) -> Result<(), Error> {
        if self.state == DeviceState::Ready {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    // Pure range check; no backend call is made for a rejected request.
    fn check_range(&self, addr: u32, len: usize) -> Result<(), Error> {
        let len = u32::try_from(len).map_err(|_| Error::OutOfRange)?;
        let end = addr.checked_add(len).ok_or(Error::OutOfRange)?;
        if end > self.geometry.capacity() {
            return Err(Error::OutOfRange);
        }
        Ok(())
    }

    // Resolves (page, offset) to a byte address. Both request forms map to
    // the same backend coordinates.
    fn page_addr(&self, page: u32, offset: u32) -> Result<u32, Error> {
        if offset >= self.geometry.page_size() {
            return Err(Error::OutOfRange);
        }
        let base = page
            .checked_mul(self.geometry.page_size())
            .ok_or(Error::OutOfRange)?;
        base.checked_add(offset).ok_or(Error::OutOfRange)
    }

    // Splits a validated write at page boundaries; every backend call lies
    // entirely within one page.
    fn write_chunks(&mut self, src: &[u8], mut addr: u32) -> Result<(), Error> {
        let page_size = self.geometry.page_size();
        let mut done = 0usize;
        while done < src.len() {
            let in_page = (page_size - addr % page_size) as usize;
            let chunk = in_page.min(src.len() - done);
            self.backend.write(&src[done..done + chunk], addr)?;
            addr += chunk as u32;
            done += chunk;
        }
        Ok(())
    }

    // Read-modify-erase-write over each sector touched by a validated
    // request. The full sector is staged in the scratch buffer so that
    // bytes outside the request survive the erase.
    fn rmw_sectors(&mut self, src: &[u8], mut addr: u32) -> Result<(), Error> {
        let sector_size = self.geometry.sector_size();
        let page_size = self.geometry.page_size() as usize;
        let mut done = 0usize;
        while done < src.len() {
            let base = addr - addr % sector_size;
            let sector = base / sector_size;
            let in_sector = (sector_size - (addr - base)) as usize;
            let chunk = in_sector.min(src.len() - done);

            let scratch = self.scratch.as_deref_mut().ok_or(Error::Unsupported)?;

            let mut off = 0usize;
            while off < sector_size as usize {
                self.backend
                    .read(&mut scratch[off..off + page_size], base + off as u32)?;
                off += page_size;
            }

            let start = (addr - base) as usize;
            scratch[start..start + chunk].copy_from_slice(&src[done..done + chunk]);

            if let Err(e) = self.backend.erase_sector(sector, 1) {
                error!("erase of sector {} failed mid-update: {:?}", sector, e);
                return Err(e);
            }

            let mut off = 0usize;
            while off < sector_size as usize {
                if let Err(e) = self.backend.write(&scratch[off..off + page_size], base + off as u32) {
                    error!("write-back of sector {} failed, sector left erased: {:?}", sector, e);
                    return Err(e);
                }
                off += page_size;
            }

            addr += chunk as u32;
            done += chunk;
        }
        Ok(())
    }
}
