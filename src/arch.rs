//! Declarative architecture descriptions: named fixed-width registers, byte
//! order, and identity.
//!
//! Everything in this module is pure `const`-constructible data. A concrete
//! table (e.g. the ARC600 table in `regstub_arch`) is one
//! [`ArchDescriptor`] value; the engine never interprets register *values*,
//! only their declared shape.

use alloc::vec::Vec;

/// Presence classification of a register.
///
/// Determines whether a register's absence on the attached silicon is an
/// error or normal, expected state. The enum is closed but expected to grow
/// float/vector classes for other architectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PresenceClass {
    /// Must appear in every register snapshot. Never probed; if the register
    /// is actually missing, the first access surfaces a target error.
    MandatoryInteger,
    /// May legitimately be absent on a given silicon revision. Probed once
    /// at session attach.
    OptionalInteger,
}

/// Byte order applied uniformly to every multi-byte register encoding of an
/// architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    /// Least-significant byte first.
    Little,
    /// Most-significant byte first.
    Big,
}

impl Endianness {
    /// Write the low `buf.len()` bytes of `val` into `buf` in this byte
    /// order.
    pub fn write_uint(self, mut val: u64, buf: &mut [u8]) {
        match self {
            Endianness::Little => {
                for b in buf.iter_mut() {
                    *b = val as u8;
                    val >>= 8;
                }
            }
            Endianness::Big => {
                for b in buf.iter_mut().rev() {
                    *b = val as u8;
                    val >>= 8;
                }
            }
        }
    }

    /// Read `buf` as an unsigned integer in this byte order.
    ///
    /// Buffers wider than 8 bytes yield only their 8 least-significant
    /// bytes.
    pub fn read_uint(self, buf: &[u8]) -> u64 {
        let mut val = 0u64;
        match self {
            Endianness::Little => {
                for &b in buf.iter().rev() {
                    val = val << 8 | u64::from(b);
                }
            }
            Endianness::Big => {
                for &b in buf {
                    val = val << 8 | u64::from(b);
                }
            }
        }
        val
    }
}

/// A single named, fixed-width register. Pure data; one row of an
/// architecture's register table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegSpec {
    /// Width in bits. Positive and a whole number of bytes in every shipped
    /// table.
    pub bits: u32,
    /// Protocol-document identifier, doubling as the human-facing name.
    /// Non-empty, unique within a descriptor (case-sensitive).
    pub name: &'static str,
    /// Presence classification.
    pub class: PresenceClass,
}

impl RegSpec {
    /// A mandatory integer register.
    pub const fn int(bits: u32, name: &'static str) -> RegSpec {
        RegSpec {
            bits,
            name,
            class: PresenceClass::MandatoryInteger,
        }
    }

    /// An optional integer register, probed at attach.
    pub const fn int_opt(bits: u32, name: &'static str) -> RegSpec {
        RegSpec {
            bits,
            name,
            class: PresenceClass::OptionalInteger,
        }
    }
}

/// The debuggable register schema of one CPU family.
///
/// Register order is significant and fixed: it defines the wire-protocol
/// register indices, so reordering a shipped table is a breaking protocol
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchDescriptor {
    /// Human-facing architecture name.
    pub name: &'static str,
    /// Identifier used for protocol negotiation. May differ from `name`.
    pub arch_name: &'static str,
    /// Byte order for all multi-byte register encodings.
    pub endianness: Endianness,
    /// Advisory client-side configuration command (e.g. a `set architecture`
    /// invocation). Surfaced to the user at attach, never parsed.
    pub setup_hint: Option<&'static str>,
    /// Ordered register set. Must be non-empty.
    pub regs: &'static [RegSpec],
}

/// Process-level table of supported architectures.
///
/// Built once at startup and handed to sessions by reference; each session
/// holds an immutable reference to the architecture it attached with. This
/// replaces the usual global mutable table-of-tables.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    archs: Vec<&'static ArchDescriptor>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Registry {
        Registry { archs: Vec::new() }
    }

    /// Add an architecture. First registration of a name wins on lookup.
    pub fn register(&mut self, arch: &'static ArchDescriptor) {
        self.archs.push(arch);
    }

    /// Look up an architecture by `name` or `arch_name`.
    pub fn find(&self, name: &str) -> Option<&'static ArchDescriptor> {
        self.archs
            .iter()
            .copied()
            .find(|a| a.name == name || a.arch_name == name)
    }

    /// Iterate over the registered architectures.
    pub fn iter(&self) -> impl Iterator<Item = &'static ArchDescriptor> + '_ {
        self.archs.iter().copied()
    }
}
