//! Converting register snapshots to and from the flattened wire blob.
//!
//! Encode and decode are pure transformations: no I/O, no arithmetic on
//! register values. Width padding and the absent-register filler are the
//! only things this module ever does to a value's bytes.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{self, Display};

use crate::catalog::Catalog;
use crate::presence::PresenceSet;

/// Placeholder byte emitted for each byte of an absent register's slot.
///
/// Absent optional registers still occupy their full-width slot in the blob
/// so that clients relying on fixed offsets don't misread subsequent
/// registers. The hex payload layer spells these bytes as `xx` (GDB's
/// "unknown value" notation) and folds incoming `xx` back to zero, so the
/// raw-blob filler is the zero byte.
pub const FILLER_BYTE: u8 = 0x00;

/// Malformed register payloads and bad register indices.
///
/// Local to one request: the dispatcher reports these as protocol errors
/// and the session stays active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormatError {
    /// Blob length does not equal the catalog's total width.
    Length {
        /// Expected blob length in bytes.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
    /// Value length does not equal the register's byte width.
    Width {
        /// Name of the register.
        register: &'static str,
        /// The register's byte width.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
    /// Register index outside `[0, register_count)`.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of registers the catalog declares.
        count: usize,
    },
}

impl Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::FormatError::*;
        match self {
            Length { expected, actual } => write!(
                f,
                "register blob is {} bytes, expected exactly {}",
                actual, expected
            ),
            Width {
                register,
                expected,
                actual,
            } => write!(
                f,
                "value for register {} is {} bytes, expected {}",
                register, actual, expected
            ),
            IndexOutOfRange { index, count } => {
                write!(f, "register index {} out of range (0..{})", index, count)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FormatError {}

/// An ephemeral register-values map keyed by protocol index.
///
/// Scoped to the registers the presence resolver marked present; exists
/// only for the duration of one marshalling operation. Values are opaque
/// wire-order byte strings, width-checked on insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    values: Vec<Option<Vec<u8>>>,
}

impl Snapshot {
    /// An empty snapshot sized for `catalog`.
    pub fn new(catalog: &Catalog) -> Snapshot {
        Snapshot {
            values: vec![None; catalog.len()],
        }
    }

    /// Record raw value bytes for the register at `index`.
    pub fn set(&mut self, catalog: &Catalog, index: usize, value: &[u8]) -> Result<(), FormatError> {
        let entry = catalog.entry(index).ok_or(FormatError::IndexOutOfRange {
            index,
            count: catalog.len(),
        })?;
        if value.len() != entry.byte_width {
            return Err(FormatError::Width {
                register: entry.name,
                expected: entry.byte_width,
                actual: value.len(),
            });
        }
        let slot = self
            .values
            .get_mut(index)
            .ok_or(FormatError::IndexOutOfRange {
                index,
                count: catalog.len(),
            })?;
        *slot = Some(value.to_vec());
        Ok(())
    }

    /// The recorded value bytes for `index`, if any.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.values.get(index).and_then(|v| v.as_deref())
    }

    /// Record an integer value, encoded per the catalog's endianness.
    pub fn set_uint(
        &mut self,
        catalog: &Catalog,
        index: usize,
        value: u64,
    ) -> Result<(), FormatError> {
        let entry = catalog.entry(index).ok_or(FormatError::IndexOutOfRange {
            index,
            count: catalog.len(),
        })?;
        let mut buf = vec![0; entry.byte_width];
        catalog.endianness().write_uint(value, &mut buf);
        self.set(catalog, index, &buf)
    }

    /// Read a recorded value back as an integer per the catalog's
    /// endianness.
    pub fn get_uint(&self, catalog: &Catalog, index: usize) -> Option<u64> {
        self.get(index).map(|v| catalog.endianness().read_uint(v))
    }

    /// Drop every recorded value.
    pub fn clear(&mut self) {
        for v in &mut self.values {
            *v = None;
        }
    }
}

/// Flatten `snapshot` into the wire blob.
///
/// Registers are emitted in ascending index order. A register that is
/// absent from `presence` (or present but with no value recorded, the
/// "valid but unavailable" case) contributes a run of [`FILLER_BYTE`] of
/// its full width. The result is therefore always exactly
/// [`Catalog::total_width`] bytes, regardless of presence.
pub fn encode(catalog: &Catalog, presence: &PresenceSet, snapshot: &Snapshot) -> Vec<u8> {
    let mut blob = Vec::with_capacity(catalog.total_width());
    for entry in catalog.entries() {
        match snapshot.get(entry.index) {
            Some(value) if presence.is_present(entry.index) => blob.extend_from_slice(value),
            _ => blob.resize(blob.len() + entry.byte_width, FILLER_BYTE),
        }
    }
    blob
}

/// Split a wire blob back into a snapshot of the present registers.
///
/// `blob` must be exactly [`Catalog::total_width`] bytes; anything else is
/// a [`FormatError::Length`], never a silently truncated or padded result.
/// Absent registers' slots are skipped, not reported as values.
pub fn decode(
    catalog: &Catalog,
    presence: &PresenceSet,
    blob: &[u8],
) -> Result<Snapshot, FormatError> {
    if blob.len() != catalog.total_width() {
        return Err(FormatError::Length {
            expected: catalog.total_width(),
            actual: blob.len(),
        });
    }

    let mut snapshot = Snapshot::new(catalog);
    for entry in catalog.entries() {
        if !presence.is_present(entry.index) {
            continue;
        }
        let bytes = &blob[entry.byte_offset..entry.byte_offset + entry.byte_width];
        snapshot.set(catalog, entry.index, bytes)?;
    }
    Ok(snapshot)
}

/// Validate a single register's value for a read-one response.
///
/// Rejects an out-of-range `index` and a `value` that is not exactly the
/// register's byte width.
pub fn encode_one(catalog: &Catalog, index: usize, value: &[u8]) -> Result<Vec<u8>, FormatError> {
    let entry = catalog.entry(index).ok_or(FormatError::IndexOutOfRange {
        index,
        count: catalog.len(),
    })?;
    if value.len() != entry.byte_width {
        return Err(FormatError::Width {
            register: entry.name,
            expected: entry.byte_width,
            actual: value.len(),
        });
    }
    Ok(value.to_vec())
}

/// Validate a single register's incoming value from a write-one command.
///
/// Same checks as [`encode_one`]; the two directions share the wire shape.
pub fn decode_one(catalog: &Catalog, index: usize, bytes: &[u8]) -> Result<Vec<u8>, FormatError> {
    encode_one(catalog, index, bytes)
}
