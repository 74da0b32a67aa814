//! An architecture-agnostic register marshalling and negotiation engine for
//! remote-debugging stubs.
//!
//! `regstub` is the piece of a debug stub that sits between a declarative
//! per-architecture register table and the byte-exact wire format a remote
//! debugger expects. Given an [`ArchDescriptor`](arch::ArchDescriptor), it
//!
//! - resolves a fixed, indexed [`Catalog`](catalog::Catalog) of register
//!   offsets (protocol indices are architecture-stable, even for registers
//!   that turn out to be absent on the attached silicon),
//! - probes the live target once at attach time to freeze a
//!   [`PresenceSet`](presence::PresenceSet) of which optional registers
//!   actually exist,
//! - encodes/decodes register snapshots to/from the flattened wire blob
//!   ([`marshal`]), padding absent registers with filler so offsets never
//!   shift,
//! - and renders a target-description document for the debugger client
//!   ([`tdesc`]).
//!
//! Packet framing, command dispatch, and execution control live elsewhere:
//! this crate only ever sees already-framed register payloads via the
//! [`Session`](session::Session) entry points, and reaches hardware through
//! the [`DebugTarget`](target::DebugTarget) trait.
//!
//! Concrete architecture tables are distributed separately in the
//! `regstub_arch` crate, so table edits don't churn the core.
//!
//! ## Features
//!
//! - `std` (default):
//!   - Implements `std::error::Error` for the crate's error types.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod arch;
pub mod catalog;
pub mod marshal;
pub mod presence;
pub mod session;
pub mod target;
pub mod tdesc;
pub mod wire;

pub use session::Session;
