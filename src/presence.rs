//! Attach-time resolution of which optional registers the silicon exposes.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{self, Debug, Display};

use log::{debug, info};

use crate::catalog::Catalog;
use crate::target::{DebugTarget, ProbeOutcome};

/// Frozen record of which registers are available on the attached target.
///
/// Resolved once per session by [`resolve_presence`] and never revisited;
/// a session that needs different presence must reattach. Immutable, so
/// in-flight requests may read it concurrently without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceSet {
    words: Vec<u64>,
    len: usize,
}

impl PresenceSet {
    /// A set covering `len` registers, all marked present.
    pub(crate) fn all_present(len: usize) -> PresenceSet {
        PresenceSet {
            words: vec![!0u64; (len + 63) / 64],
            len,
        }
    }

    fn mark_absent(&mut self, index: usize) {
        self.words[index / 64] &= !(1u64 << (index % 64));
    }

    /// Whether the register at `index` was available at attach time.
    ///
    /// Out-of-range indices report absent.
    pub fn is_present(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.words[index / 64] >> (index % 64) & 1 != 0
    }

    /// Number of registers the set covers (the catalog's register count).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the set covers no registers.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of registers marked absent.
    pub fn absent_count(&self) -> usize {
        (0..self.len).filter(|&i| !self.is_present(i)).count()
    }
}

/// A presence probe failed with something other than "not implemented".
///
/// Fatal to the session attach: the session never reaches `Active`.
/// Treating a transient probe fault as absence would silently corrupt wire
/// offsets for the rest of the session, so the attach fails fast instead.
#[derive(Debug)]
#[non_exhaustive]
pub enum AttachError<E> {
    /// Probing `register` failed with a target error.
    Probe {
        /// Name of the register being probed.
        register: &'static str,
        /// The underlying target error.
        source: E,
    },
}

impl<E: Debug> Display for AttachError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::AttachError::*;
        match self {
            Probe { register, source } => {
                write!(f, "probe of register {} failed: {:?}", register, source)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: Debug> std::error::Error for AttachError<E> {}

/// Determine, per optional register, whether the attached silicon exposes
/// it, and freeze the result for the session.
///
/// Mandatory registers are never probed; they are assumed present. A probe
/// answering [`ProbeOutcome::Unimplemented`] marks the register absent:
/// normal, expected state. Any probe error aborts the attach with an
/// [`AttachError`].
pub fn resolve_presence<T: DebugTarget>(
    catalog: &Catalog,
    target: &mut T,
) -> Result<PresenceSet, AttachError<T::Error>> {
    let mut present = PresenceSet::all_present(catalog.len());

    for entry in catalog.entries() {
        if !entry.is_optional() {
            continue;
        }
        match target.probe_register(entry.index) {
            Ok(ProbeOutcome::Present) => debug!("probe {}: present", entry.name),
            Ok(ProbeOutcome::Unimplemented) => {
                debug!("probe {}: not implemented", entry.name);
                present.mark_absent(entry.index);
            }
            Err(source) => {
                return Err(AttachError::Probe {
                    register: entry.name,
                    source,
                });
            }
        }
    }

    info!(
        "{}: {} registers declared, {} absent on attached target",
        catalog.name(),
        catalog.len(),
        present.absent_count()
    );

    Ok(present)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{ArchDescriptor, Endianness, RegSpec};

    static REGS: &[RegSpec] = &[
        RegSpec::int(32, "always"),
        RegSpec::int_opt(32, "sometimes"),
        RegSpec::int_opt(32, "rarely"),
        RegSpec::int(32, "tail"),
    ];

    static MIXED: ArchDescriptor = ArchDescriptor {
        name: "mixed",
        arch_name: "mixed",
        endianness: Endianness::Little,
        setup_hint: None,
        regs: REGS,
    };

    struct ScriptedTarget {
        unimplemented: Vec<usize>,
        fail_on: Option<usize>,
        probed: Vec<usize>,
    }

    impl ScriptedTarget {
        fn new(unimplemented: &[usize]) -> ScriptedTarget {
            ScriptedTarget {
                unimplemented: unimplemented.to_vec(),
                fail_on: None,
                probed: Vec::new(),
            }
        }
    }

    impl DebugTarget for ScriptedTarget {
        type Error = &'static str;

        fn probe_register(&mut self, index: usize) -> Result<ProbeOutcome, Self::Error> {
            self.probed.push(index);
            if self.fail_on == Some(index) {
                return Err("bus fault");
            }
            if self.unimplemented.contains(&index) {
                Ok(ProbeOutcome::Unimplemented)
            } else {
                Ok(ProbeOutcome::Present)
            }
        }

        fn read_register(&mut self, _index: usize, _buf: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn write_register(&mut self, _index: usize, _val: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn unimplemented_probe_marks_absent() {
        let catalog = Catalog::build(&MIXED).unwrap();
        let mut target = ScriptedTarget::new(&[2]);
        let presence = resolve_presence(&catalog, &mut target).unwrap();

        assert!(presence.is_present(0));
        assert!(presence.is_present(1));
        assert!(!presence.is_present(2));
        assert!(presence.is_present(3));
        assert_eq!(presence.absent_count(), 1);
    }

    #[test]
    fn only_optional_registers_are_probed() {
        let catalog = Catalog::build(&MIXED).unwrap();
        let mut target = ScriptedTarget::new(&[]);
        resolve_presence(&catalog, &mut target).unwrap();

        assert_eq!(target.probed, [1, 2]);
    }

    #[test]
    fn probe_io_error_is_not_absence() {
        let catalog = Catalog::build(&MIXED).unwrap();
        let mut target = ScriptedTarget::new(&[]);
        target.fail_on = Some(2);

        match resolve_presence(&catalog, &mut target) {
            Err(AttachError::Probe { register, source }) => {
                assert_eq!(register, "rarely");
                assert_eq!(source, "bus fault");
            }
            Ok(_) => panic!("attach should have failed"),
        }
    }

    #[test]
    fn out_of_range_index_reports_absent() {
        let presence = PresenceSet::all_present(4);
        assert!(presence.is_present(3));
        assert!(!presence.is_present(4));
        assert!(!presence.is_present(1000));
    }

    #[test]
    fn word_boundary_indices() {
        let mut presence = PresenceSet::all_present(130);
        presence.mark_absent(63);
        presence.mark_absent(64);
        presence.mark_absent(129);

        assert!(!presence.is_present(63));
        assert!(!presence.is_present(64));
        assert!(presence.is_present(65));
        assert!(!presence.is_present(129));
        assert_eq!(presence.absent_count(), 3);
    }
}
