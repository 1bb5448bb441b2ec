//! Common error type for MTD operations

/// A common error type for MTD operations.
///
/// This enum defines the set of errors that can occur while translating and
/// dispatching storage requests. It is designed to be simple and portable
/// for `no_std` environments; backend drivers map their hardware-specific
/// failures onto it, and the MTD layer passes backend errors through
/// unchanged.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An operation was attempted before the device was successfully
    /// initialized.
    NotReady,
    /// The backend lacks the requested capability, or rejected the specific
    /// request shape (for example a multi-sector bulk erase).
    Unsupported,
    /// The requested address range lies outside the device capacity, or the
    /// address arithmetic overflowed.
    OutOfRange,
    /// An erase request was not aligned to the sector grid, or a backend
    /// alignment constraint was violated.
    Misaligned,
    /// The backend reported a transport or media failure.
    Io,
    /// A malformed argument, such as a zero geometry field or a wrongly
    /// sized scratch buffer.
    InvalidArgument,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotReady => defmt::write!(f, "NotReady"),
            Error::Unsupported => defmt::write!(f, "Unsupported"),
            Error::OutOfRange => defmt::write!(f, "OutOfRange"),
            Error::Misaligned => defmt::write!(f, "Misaligned"),
            Error::Io => defmt::write!(f, "Io"),
            Error::InvalidArgument => defmt::write!(f, "InvalidArgument"),
        }
    }
}
