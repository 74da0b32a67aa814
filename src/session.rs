//! Per-attach session: the state machine gluing catalog, presence, and
//! marshalling together for the protocol dispatcher.
//!
//! A session walks `Unattached -> CatalogBuilt -> PresenceResolved ->
//! Active -> Closed`, never skipping a state. Constructing the [`Session`]
//! is the `Unattached -> CatalogBuilt` edge; [`Session::attach`] freezes presence;
//! [`Session::activate`] is the dispatcher's go-live (after it has shipped
//! the target description and initial stop reply). Register marshalling is
//! permitted only while `Active`.
//!
//! The catalog and presence set are built once and immutable afterward, so
//! the register paths take `&self` and may serve concurrent in-flight
//! requests. The target handle is the only shared mutable resource; it is
//! passed in `&mut` per call and serialized at that boundary.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{self, Debug, Display};

use log::{info, trace, warn};

use crate::arch::ArchDescriptor;
use crate::catalog::{Catalog, ConfigError};
use crate::marshal::{self, FormatError, Snapshot, FILLER_BYTE};
use crate::presence::{self, AttachError, PresenceSet};
use crate::target::DebugTarget;
use crate::tdesc;

/// Lifecycle states of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Catalog resolved; presence not yet probed.
    CatalogBuilt,
    /// Presence frozen; waiting for the dispatcher to go live.
    PresenceResolved,
    /// Register marshalling permitted.
    Active,
    /// Terminal.
    Closed,
}

/// Usage error: an operation was issued in the wrong session state.
///
/// Fatal to the request, never to the session: the state is left
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateError {
    /// The state the operation requires.
    pub expected: SessionState,
    /// The state the session is actually in.
    pub actual: SessionState,
}

impl Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "operation requires the {:?} state, but the session is {:?}",
            self.expected, self.actual
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StateError {}

/// Errors surfaced to the dispatcher for a single session request.
#[derive(Debug)]
#[non_exhaustive]
pub enum SessionError<E> {
    /// Operation issued in the wrong session state.
    State(StateError),
    /// Presence resolution failed during [`Session::attach`].
    Attach(AttachError<E>),
    /// Malformed request payload or bad register index.
    Format(FormatError),
    /// The target handle failed a register access.
    Target(E),
}

impl<E> From<StateError> for SessionError<E> {
    fn from(e: StateError) -> Self {
        SessionError::State(e)
    }
}

impl<E> From<FormatError> for SessionError<E> {
    fn from(e: FormatError) -> Self {
        SessionError::Format(e)
    }
}

impl<E: Debug> Display for SessionError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::SessionError::*;
        match self {
            State(e) => write!(f, "{}", e),
            Attach(e) => write!(f, "session attach failed: {}", e),
            Format(e) => write!(f, "{}", e),
            Target(e) => write!(f, "target error: {:?}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: Debug> std::error::Error for SessionError<E> {}

/// One attached debug session over a known architecture.
#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    presence: Option<PresenceSet>,
    state: SessionState,
}

impl Session {
    /// Build the catalog for `desc`.
    ///
    /// This is the `Unattached -> CatalogBuilt` edge; a bad descriptor makes
    /// the architecture unusable and no session is created.
    pub fn new(desc: &'static ArchDescriptor) -> Result<Session, ConfigError> {
        let catalog = Catalog::build(desc)?;
        info!(
            "session: catalog built for {} ({} registers, {} byte blob)",
            catalog.name(),
            catalog.len(),
            catalog.total_width()
        );
        Ok(Session {
            catalog,
            presence: None,
            state: SessionState::CatalogBuilt,
        })
    }

    /// Probe optional registers on `target` and freeze the session's
    /// presence set.
    ///
    /// Presence is never revisited mid-session; a session that needs
    /// different presence must reattach from scratch.
    pub fn attach<T: DebugTarget>(&mut self, target: &mut T) -> Result<(), SessionError<T::Error>> {
        self.expect_state(SessionState::CatalogBuilt)?;

        let presence =
            presence::resolve_presence(&self.catalog, target).map_err(SessionError::Attach)?;
        if let Some(hint) = self.catalog.setup_hint() {
            info!("session: debugger setup hint: {}", hint);
        }

        self.presence = Some(presence);
        self.state = SessionState::PresenceResolved;
        Ok(())
    }

    /// Go live. The dispatcher calls this once it is ready to route
    /// register commands at the session.
    pub fn activate(&mut self) -> Result<(), StateError> {
        self.expect_state(SessionState::PresenceResolved)?;
        self.state = SessionState::Active;
        info!("session: {} active", self.catalog.name());
        Ok(())
    }

    /// Close the session. Terminal: every subsequent register access fails
    /// with a state error.
    pub fn close(&mut self) {
        info!("session: closed ({})", self.catalog.name());
        self.state = SessionState::Closed;
    }

    /// Handle a read-all-registers request.
    ///
    /// Reads every present register through `target` and flattens the
    /// result. Absent registers come back as filler runs, so the blob is
    /// always [`Catalog::total_width`] bytes.
    pub fn read_all<T: DebugTarget>(
        &self,
        target: &mut T,
    ) -> Result<Vec<u8>, SessionError<T::Error>> {
        let presence = self.require_active()?;

        let mut snapshot = Snapshot::new(&self.catalog);
        for entry in self.catalog.entries() {
            if !presence.is_present(entry.index) {
                continue;
            }
            let mut buf = vec![0; entry.byte_width];
            target
                .read_register(entry.index, &mut buf)
                .map_err(SessionError::Target)?;
            snapshot.set(&self.catalog, entry.index, &buf)?;
        }

        let blob = marshal::encode(&self.catalog, presence, &snapshot);
        trace!("read_all: {} bytes", blob.len());
        Ok(blob)
    }

    /// Handle a write-all-registers request.
    ///
    /// Decodes `blob` (exact-length checked) and writes every present
    /// register back through `target`; absent registers' filler slots are
    /// ignored.
    pub fn write_all<T: DebugTarget>(
        &self,
        target: &mut T,
        blob: &[u8],
    ) -> Result<(), SessionError<T::Error>> {
        let presence = self.require_active()?;

        let snapshot = marshal::decode(&self.catalog, presence, blob)?;
        for entry in self.catalog.entries() {
            if let Some(value) = snapshot.get(entry.index) {
                target
                    .write_register(entry.index, value)
                    .map_err(SessionError::Target)?;
            }
        }

        trace!("write_all: {} bytes", blob.len());
        Ok(())
    }

    /// Handle a read-one-register request.
    ///
    /// An absent register yields a full-width filler run instead of
    /// touching the target, keeping single-register reads consistent with
    /// the blob encoding.
    pub fn read_one<T: DebugTarget>(
        &self,
        target: &mut T,
        index: usize,
    ) -> Result<Vec<u8>, SessionError<T::Error>> {
        let presence = self.require_active()?;

        let entry = self
            .catalog
            .entry(index)
            .ok_or(FormatError::IndexOutOfRange {
                index,
                count: self.catalog.len(),
            })?;

        let mut buf = vec![FILLER_BYTE; entry.byte_width];
        if presence.is_present(index) {
            target
                .read_register(index, &mut buf)
                .map_err(SessionError::Target)?;
        }
        marshal::encode_one(&self.catalog, index, &buf).map_err(SessionError::Format)
    }

    /// Handle a write-one-register request.
    ///
    /// The value is width-checked first. Writes to absent registers are
    /// dropped, mirroring the read-side filler.
    pub fn write_one<T: DebugTarget>(
        &self,
        target: &mut T,
        index: usize,
        value: &[u8],
    ) -> Result<(), SessionError<T::Error>> {
        let presence = self.require_active()?;

        let value = marshal::decode_one(&self.catalog, index, value)?;
        if presence.is_present(index) {
            target
                .write_register(index, &value)
                .map_err(SessionError::Target)?;
        } else {
            trace!("write_one: dropping write to absent register {}", index);
        }
        Ok(())
    }

    /// The target-description document for this session's architecture.
    ///
    /// Available from `CatalogBuilt` onward: the document describes the
    /// schema, not the attached instance, so it does not depend on
    /// presence.
    pub fn target_description(&self) -> String {
        tdesc::generate_description(&self.catalog)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The session's catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The frozen presence set, once attached.
    pub fn presence(&self) -> Option<&PresenceSet> {
        self.presence.as_ref()
    }

    fn expect_state(&self, expected: SessionState) -> Result<(), StateError> {
        if self.state != expected {
            warn!(
                "session: operation requires {:?}, session is {:?}",
                expected, self.state
            );
            return Err(StateError {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    fn require_active(&self) -> Result<&PresenceSet, StateError> {
        match (self.state, self.presence.as_ref()) {
            (SessionState::Active, Some(presence)) => Ok(presence),
            _ => {
                warn!(
                    "session: register access requires Active, session is {:?}",
                    self.state
                );
                Err(StateError {
                    expected: SessionState::Active,
                    actual: self.state,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{Endianness, RegSpec};
    use crate::target::ProbeOutcome;

    static REGS: &[RegSpec] = &[
        RegSpec::int(32, "pc"),
        RegSpec::int_opt(32, "aux"),
        RegSpec::int(32, "sp"),
    ];

    static TINY: ArchDescriptor = ArchDescriptor {
        name: "tiny",
        arch_name: "tiny",
        endianness: Endianness::Little,
        setup_hint: Some("set architecture tiny"),
        regs: REGS,
    };

    struct FakeTarget {
        regs: [u32; 3],
        aux_implemented: bool,
    }

    impl FakeTarget {
        fn new() -> FakeTarget {
            FakeTarget {
                regs: [0x1000, 0x2000, 0x3000],
                aux_implemented: true,
            }
        }
    }

    impl DebugTarget for FakeTarget {
        type Error = &'static str;

        fn probe_register(&mut self, index: usize) -> Result<ProbeOutcome, Self::Error> {
            if index == 1 && !self.aux_implemented {
                Ok(ProbeOutcome::Unimplemented)
            } else {
                Ok(ProbeOutcome::Present)
            }
        }

        fn read_register(&mut self, index: usize, buf: &mut [u8]) -> Result<(), Self::Error> {
            let val = self.regs.get(index).ok_or("bad index")?;
            buf.copy_from_slice(&val.to_le_bytes());
            Ok(())
        }

        fn write_register(&mut self, index: usize, val: &[u8]) -> Result<(), Self::Error> {
            let mut bytes = [0; 4];
            bytes.copy_from_slice(val);
            *self.regs.get_mut(index).ok_or("bad index")? = u32::from_le_bytes(bytes);
            Ok(())
        }
    }

    fn active_session(target: &mut FakeTarget) -> Session {
        let mut session = Session::new(&TINY).unwrap();
        session.attach(target).unwrap();
        session.activate().unwrap();
        session
    }

    #[test]
    fn lifecycle_walks_every_state() {
        let mut target = FakeTarget::new();
        let mut session = Session::new(&TINY).unwrap();
        assert_eq!(session.state(), SessionState::CatalogBuilt);

        session.attach(&mut target).unwrap();
        assert_eq!(session.state(), SessionState::PresenceResolved);

        session.activate().unwrap();
        assert_eq!(session.state(), SessionState::Active);

        session.close();
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn marshalling_before_active_is_a_usage_error() {
        let mut target = FakeTarget::new();
        let mut session = Session::new(&TINY).unwrap();

        match session.read_all(&mut target) {
            Err(SessionError::State(e)) => {
                assert_eq!(e.expected, SessionState::Active);
                assert_eq!(e.actual, SessionState::CatalogBuilt);
            }
            _ => panic!("expected a state error"),
        }

        // the failed request does not disturb the session
        assert_eq!(session.state(), SessionState::CatalogBuilt);
        session.attach(&mut target).unwrap();
        session.activate().unwrap();
        assert!(session.read_all(&mut target).is_ok());
    }

    #[test]
    fn attach_twice_is_a_usage_error() {
        let mut target = FakeTarget::new();
        let mut session = Session::new(&TINY).unwrap();
        session.attach(&mut target).unwrap();

        match session.attach(&mut target) {
            Err(SessionError::State(e)) => {
                assert_eq!(e.expected, SessionState::CatalogBuilt);
            }
            _ => panic!("expected a state error"),
        }
    }

    #[test]
    fn read_all_round_trips_through_write_all() {
        let mut target = FakeTarget::new();
        let session = active_session(&mut target);

        let mut blob = session.read_all(&mut target).unwrap();
        assert_eq!(blob.len(), 12);
        assert_eq!(&blob[0..4], &0x1000u32.to_le_bytes());

        blob[0..4].copy_from_slice(&0xbeefu32.to_le_bytes());
        session.write_all(&mut target, &blob).unwrap();
        assert_eq!(target.regs[0], 0xbeef);
    }

    #[test]
    fn absent_register_reads_as_filler_and_drops_writes() {
        let mut target = FakeTarget::new();
        target.aux_implemented = false;
        let session = active_session(&mut target);

        let blob = session.read_all(&mut target).unwrap();
        assert_eq!(&blob[4..8], [FILLER_BYTE; 4]);
        // neighbours unaffected
        assert_eq!(&blob[8..12], &0x3000u32.to_le_bytes());

        let one = session.read_one(&mut target, 1).unwrap();
        assert_eq!(one, [FILLER_BYTE; 4]);

        let before = target.regs[1];
        session.write_one(&mut target, 1, &[1, 2, 3, 4]).unwrap();
        assert_eq!(target.regs[1], before);
    }

    #[test]
    fn single_register_paths_check_bounds() {
        let mut target = FakeTarget::new();
        let session = active_session(&mut target);

        match session.read_one(&mut target, 99) {
            Err(SessionError::Format(FormatError::IndexOutOfRange { index: 99, .. })) => {}
            _ => panic!("expected an index error"),
        }
        match session.write_one(&mut target, 0, &[0; 2]) {
            Err(SessionError::Format(FormatError::Width { .. })) => {}
            _ => panic!("expected a width error"),
        }
    }

    #[test]
    fn target_error_propagates() {
        struct Broken;
        impl DebugTarget for Broken {
            type Error = &'static str;
            fn probe_register(&mut self, _: usize) -> Result<ProbeOutcome, Self::Error> {
                Ok(ProbeOutcome::Present)
            }
            fn read_register(&mut self, _: usize, _: &mut [u8]) -> Result<(), Self::Error> {
                Err("wedged")
            }
            fn write_register(&mut self, _: usize, _: &[u8]) -> Result<(), Self::Error> {
                Err("wedged")
            }
        }

        let mut target = Broken;
        let mut session = Session::new(&TINY).unwrap();
        session.attach(&mut target).unwrap();
        session.activate().unwrap();

        match session.read_all(&mut target) {
            Err(SessionError::Target("wedged")) => {}
            _ => panic!("expected a target error"),
        }
    }

    #[test]
    fn description_available_before_active() {
        let session = Session::new(&TINY).unwrap();
        let doc = session.target_description();
        assert!(doc.contains("<architecture>tiny</architecture>"));
    }
}
