//! Concrete [`ArchDescriptor`](regstub::arch::ArchDescriptor) tables for
//! `regstub`.
//!
//! Tables live in their own crate so that adding or amending an
//! architecture never forces a release of the core engine. Each module is
//! one CPU family's register schema, expressed as `const` data: the row
//! order in a table is that architecture's wire contract and must never be
//! changed once shipped, since debugger clients hard-code the resulting
//! offsets.
//!
//! If an architecture is missing from this crate, that does _not_ mean it
//! can't be used with `regstub`: a descriptor is plain data, and it's
//! straightforward to declare one next to your target implementation.
//! Please consider upstreaming tables you write yourself.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

pub mod arc600;
