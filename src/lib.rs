//! # libmtd - Memory Technology Device abstraction
//!
//! A hardware-agnostic storage layer that sits between applications and
//! non-volatile memory backends such as raw NOR/NAND flash, SPI EEPROMs,
//! SD cards and internal flash controllers. Each backend implements a small
//! capability set at its own native granularity; `libmtd` normalizes these
//! into one byte-addressable read/write/erase contract. This library is
//! designed for embedded systems and supports `no_std` environments.
//!
//! ## Features
//!
//! ### Request translation
//! - Bounds validation of byte-addressed and page-addressed requests
//! - Automatic splitting of reads and writes at page boundaries
//! - Sector-aligned erase with bulk-erase fallback to per-sector calls
//!
//! ### Write emulation
//! - Read-modify-write emulation for media that cannot overwrite without an
//!   erase, staged through a single sector-sized scratch buffer
//! - Direct-write media skip the erase cycle transparently
//!
//! ### Backend abstraction
//! - One [`mtd::MtdBackend`] trait covering init, read, write, sector erase
//!   and power control; unimplemented capabilities surface as
//!   [`mtd::Error::Unsupported`] at call time
//! - A RAM-backed [`mtd::MemoryBackend`] for tests and board bring-up
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libmtd = "0.1.0"
//! ```
//!
//! ### Basic read/write example
//!
//! ```rust
//! use libmtd::mtd::{Geometry, MemoryBackend, Mtd};
//!
//! // 256-byte pages, 4 pages per sector, 8 sectors: 8 KiB of NOR-like media.
//! let geometry = Geometry::new(256, 4, 8).unwrap();
//! let mut memory = [0xFF; 8192];
//! let backend = MemoryBackend::new(&mut memory, geometry, false).unwrap();
//!
//! // The scratch buffer enables erase-emulated writes on this backend.
//! let mut scratch = [0u8; 1024];
//! let mut device = Mtd::with_scratch(backend, geometry, &mut scratch).unwrap();
//!
//! device.init().unwrap();
//! device.write(b"hello", 0, 16).unwrap();
//!
//! let mut buf = [0u8; 5];
//! device.read(&mut buf, 16).unwrap();
//! assert_eq!(&buf, b"hello");
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based devices (Raspberry Pi, etc.)
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt formatting of public types for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Memory technology device layer: geometry model, backend capability
/// contract and the device handle with its read/write/erase paths.
pub mod mtd;
