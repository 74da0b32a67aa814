//! Resolving an [`ArchDescriptor`] into a fixed, indexed register layout.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt::{self, Display};

use bitflags::bitflags;

use crate::arch::{ArchDescriptor, Endianness, PresenceClass};

bitflags! {
    /// Per-register attribute flags recorded in the catalog.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RegFlags: u8 {
        /// Presence is probed at session attach; the register may
        /// legitimately be absent on the attached silicon.
        const OPTIONAL = 1 << 0;
    }
}

/// One register's resolved layout within the flattened register blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Protocol index. Equals the register's position in the source
    /// descriptor, and never shifts: optional registers reserve their slot
    /// whether or not they turn out to be present.
    pub index: usize,
    /// Register name.
    pub name: &'static str,
    /// Byte offset into the flattened blob.
    pub byte_offset: usize,
    /// Width in bytes.
    pub byte_width: usize,
    /// Attribute flags.
    pub flags: RegFlags,
}

impl CatalogEntry {
    /// Whether this register's presence is probed at attach time.
    pub fn is_optional(&self) -> bool {
        self.flags.contains(RegFlags::OPTIONAL)
    }
}

/// Errors which prevent a catalog from being built.
///
/// All of these are configuration errors: the architecture descriptor itself
/// is bad, and the architecture is unusable until its table is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The descriptor declares no registers.
    Empty,
    /// A register has an empty name.
    Unnamed {
        /// Position of the offending row in the descriptor.
        index: usize,
    },
    /// Two registers share a name (case-sensitive comparison).
    DuplicateName(&'static str),
    /// A register's width is zero or not a whole number of bytes.
    BadWidth {
        /// Name of the offending register.
        name: &'static str,
        /// Declared width in bits.
        bits: u32,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::ConfigError::*;
        match self {
            Empty => write!(f, "architecture descriptor declares no registers"),
            Unnamed { index } => write!(f, "register at index {} has an empty name", index),
            DuplicateName(name) => write!(f, "duplicate register name: {}", name),
            BadWidth { name, bits } => {
                write!(f, "register {} has unusable width: {} bits", name, bits)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// The resolved, offset-assigned layout of one architecture's registers.
///
/// Built once when a session attaches to a target of a known architecture,
/// and immutable thereafter. The blob layout it describes (offsets, widths,
/// order) is a wire contract shared with the external debugger client.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    desc: &'static ArchDescriptor,
    entries: Vec<CatalogEntry>,
    total_width: usize,
}

impl Catalog {
    /// Resolve `desc` into an indexed layout.
    ///
    /// Byte offsets are assigned by walking the declared order and
    /// accumulating widths. Presence class never affects the walk: optional
    /// registers reserve their index and offset so the layout stays
    /// architecture-stable even when a register is later found absent.
    pub fn build(desc: &'static ArchDescriptor) -> Result<Catalog, ConfigError> {
        if desc.regs.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut seen = BTreeSet::new();
        let mut entries = Vec::with_capacity(desc.regs.len());
        let mut offset = 0;

        for (index, reg) in desc.regs.iter().enumerate() {
            if reg.name.is_empty() {
                return Err(ConfigError::Unnamed { index });
            }
            if reg.bits == 0 || reg.bits % 8 != 0 {
                return Err(ConfigError::BadWidth {
                    name: reg.name,
                    bits: reg.bits,
                });
            }
            if !seen.insert(reg.name) {
                return Err(ConfigError::DuplicateName(reg.name));
            }

            let byte_width = (reg.bits / 8) as usize;
            let flags = match reg.class {
                PresenceClass::OptionalInteger => RegFlags::OPTIONAL,
                _ => RegFlags::empty(),
            };

            entries.push(CatalogEntry {
                index,
                name: reg.name,
                byte_offset: offset,
                byte_width,
                flags,
            });
            offset += byte_width;
        }

        Ok(Catalog {
            desc,
            entries,
            total_width: offset,
        })
    }

    /// Human-facing architecture name.
    pub fn name(&self) -> &'static str {
        self.desc.name
    }

    /// Protocol-negotiation architecture identifier.
    pub fn arch_name(&self) -> &'static str {
        self.desc.arch_name
    }

    /// Byte order for every multi-byte register encoding.
    pub fn endianness(&self) -> Endianness {
        self.desc.endianness
    }

    /// Advisory client-side setup command, if the table carries one.
    pub fn setup_hint(&self) -> Option<&'static str> {
        self.desc.setup_hint
    }

    /// Number of declared registers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a successfully built catalog.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at protocol index `index`.
    pub fn entry(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// The entry named `name` (case-sensitive).
    pub fn entry_by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// All entries, in protocol-index order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Width of the flattened register blob: the sum of every declared
    /// register's byte width, present on the attached silicon or not.
    /// Absent registers encode as full-width filler runs, so this never
    /// varies per session.
    pub fn total_width(&self) -> usize {
        self.total_width
    }
}
