//! The live hardware/simulation handle the engine drives.

/// Answer to a presence probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The register is implemented and readable on the attached silicon.
    Present,
    /// The target signals "register not implemented". Normal for optional
    /// registers; recorded as absence, not an error.
    Unimplemented,
}

/// A handle to the attached hardware or simulation target.
///
/// This is the one shared mutable resource the engine touches. Every method
/// takes `&mut self`: callers serialize access at this boundary (per
/// physical register read/write), never inside the marshaller. Calls may
/// block on hardware; they are expected to be bounded and time-boxed by the
/// transport layer driving the session.
///
/// Register values cross this boundary as raw bytes in wire order. The
/// engine performs no arithmetic on them.
pub trait DebugTarget {
    /// A target-specific error type. Any error returned from a probe or a
    /// register access is surfaced to the caller unchanged.
    type Error;

    /// Probe whether the register at `index` exists on the attached
    /// silicon.
    ///
    /// Only registers declared optional are ever probed, and each at most
    /// once per session. Returning an `Err` here aborts the session attach;
    /// a transient fault must not be reported as
    /// [`ProbeOutcome::Unimplemented`], since misclassification would
    /// corrupt wire offsets for the rest of the session.
    fn probe_register(&mut self, index: usize) -> Result<ProbeOutcome, Self::Error>;

    /// Read the register at `index` into `buf`.
    ///
    /// `buf` is exactly the register's byte width.
    fn read_register(&mut self, index: usize, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `val` to the register at `index`.
    ///
    /// `val` is guaranteed to be exactly the register's byte width.
    fn write_register(&mut self, index: usize, val: &[u8]) -> Result<(), Self::Error>;
}
