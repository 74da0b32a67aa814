//! Hex spelling of register payloads.
//!
//! Packet framing (`$`/`#`, checksums, acks) belongs to the transport;
//! these helpers only spell register blobs the way the wire expects. Each
//! byte of an absent register is written as `xx` (the protocol's "unknown
//! value" notation) and incoming `xx` pairs fold back to the filler byte,
//! so offsets stay stable in both directions.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};

use crate::catalog::Catalog;
use crate::marshal::FormatError;
use crate::presence::PresenceSet;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Errors from decoding an incoming hex payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HexDecodeError {
    /// Payload contains a byte that is not a hex digit (or `x`).
    NotAscii,
    /// Payload length is odd.
    OddLength,
}

impl Display for HexDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::HexDecodeError::*;
        match self {
            NotAscii => write!(f, "payload contains a non-hex byte"),
            OddLength => write!(f, "payload length is odd"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HexDecodeError {}

fn ascii2byte(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        // "unknown value" notation; folds to the filler byte
        b'x' | b'X' => Some(0),
        _ => None,
    }
}

fn push_byte_hex(out: &mut String, b: u8) {
    out.push(HEX_DIGITS[(b >> 4) as usize] as char);
    out.push(HEX_DIGITS[(b & 0xf) as usize] as char);
}

/// Hex-encode a full register blob, spelling absent registers as `xx` runs.
///
/// `blob` must be exactly [`Catalog::total_width`] bytes (the output of
/// [`marshal::encode`](crate::marshal::encode)). Present registers' bytes
/// are emitted as lowercase hex.
pub fn encode_blob_hex(
    catalog: &Catalog,
    presence: &PresenceSet,
    blob: &[u8],
) -> Result<String, FormatError> {
    if blob.len() != catalog.total_width() {
        return Err(FormatError::Length {
            expected: catalog.total_width(),
            actual: blob.len(),
        });
    }

    let mut out = String::with_capacity(blob.len() * 2);
    for entry in catalog.entries() {
        if presence.is_present(entry.index) {
            for &b in &blob[entry.byte_offset..entry.byte_offset + entry.byte_width] {
                push_byte_hex(&mut out, b);
            }
        } else {
            for _ in 0..entry.byte_width {
                out.push_str("xx");
            }
        }
    }
    Ok(out)
}

/// Hex-encode one register's value for a read-one response.
///
/// An absent register yields an `xx` run of its full width, mirroring the
/// blob encoding; `value` is ignored in that case.
pub fn encode_reg_hex(
    catalog: &Catalog,
    presence: &PresenceSet,
    index: usize,
    value: &[u8],
) -> Result<String, FormatError> {
    let entry = catalog.entry(index).ok_or(FormatError::IndexOutOfRange {
        index,
        count: catalog.len(),
    })?;

    let mut out = String::with_capacity(entry.byte_width * 2);
    if !presence.is_present(index) {
        for _ in 0..entry.byte_width {
            out.push_str("xx");
        }
        return Ok(out);
    }

    if value.len() != entry.byte_width {
        return Err(FormatError::Width {
            register: entry.name,
            expected: entry.byte_width,
            actual: value.len(),
        });
    }
    for &b in value {
        push_byte_hex(&mut out, b);
    }
    Ok(out)
}

/// Decode an incoming hex payload into raw bytes.
///
/// `xx` pairs fold to [`FILLER_BYTE`](crate::marshal::FILLER_BYTE). The
/// byte count is *not* checked against any catalog here; length
/// validation belongs to [`marshal::decode`](crate::marshal::decode).
pub fn decode_blob_hex(payload: &str) -> Result<Vec<u8>, HexDecodeError> {
    let payload = payload.as_bytes();
    if payload.len() % 2 != 0 {
        return Err(HexDecodeError::OddLength);
    }

    let mut out = Vec::with_capacity(payload.len() / 2);
    for pair in payload.chunks_exact(2) {
        let hi = ascii2byte(pair[0]).ok_or(HexDecodeError::NotAscii)?;
        let lo = ascii2byte(pair[1]).ok_or(HexDecodeError::NotAscii)?;
        out.push(hi << 4 | lo);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{ArchDescriptor, Endianness, RegSpec};
    use crate::marshal::{self, Snapshot};
    use crate::presence::resolve_presence;
    use crate::target::{DebugTarget, ProbeOutcome};

    static REGS: &[RegSpec] = &[RegSpec::int(32, "pc"), RegSpec::int_opt(16, "aux")];

    static TINY: ArchDescriptor = ArchDescriptor {
        name: "tiny",
        arch_name: "tiny",
        endianness: Endianness::Little,
        setup_hint: None,
        regs: REGS,
    };

    struct NoAux;
    impl DebugTarget for NoAux {
        type Error = ();
        fn probe_register(&mut self, _: usize) -> Result<ProbeOutcome, ()> {
            Ok(ProbeOutcome::Unimplemented)
        }
        fn read_register(&mut self, _: usize, _: &mut [u8]) -> Result<(), ()> {
            Ok(())
        }
        fn write_register(&mut self, _: usize, _: &[u8]) -> Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn absent_registers_spell_as_xx() {
        let catalog = Catalog::build(&TINY).unwrap();
        let mut target = NoAux;
        let presence = resolve_presence(&catalog, &mut target).unwrap();

        let mut snapshot = Snapshot::new(&catalog);
        snapshot.set(&catalog, 0, &[0xde, 0xad, 0xbe, 0xef]).unwrap();

        let blob = marshal::encode(&catalog, &presence, &snapshot);
        let hex = encode_blob_hex(&catalog, &presence, &blob).unwrap();
        assert_eq!(hex, "deadbeefxxxx");
    }

    #[test]
    fn xx_folds_to_filler_on_decode() {
        assert_eq!(
            decode_blob_hex("deadbeefxxxx").unwrap(),
            [0xde, 0xad, 0xbe, 0xef, 0x00, 0x00]
        );
        assert_eq!(decode_blob_hex("XXff").unwrap(), [0x00, 0xff]);
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert_eq!(decode_blob_hex("abc"), Err(HexDecodeError::OddLength));
        assert_eq!(decode_blob_hex("zz"), Err(HexDecodeError::NotAscii));
    }

    #[test]
    fn single_register_hex() {
        let catalog = Catalog::build(&TINY).unwrap();
        let mut target = NoAux;
        let presence = resolve_presence(&catalog, &mut target).unwrap();

        assert_eq!(
            encode_reg_hex(&catalog, &presence, 0, &[0x12, 0x34, 0x56, 0x78]).unwrap(),
            "12345678"
        );
        assert_eq!(encode_reg_hex(&catalog, &presence, 1, &[]).unwrap(), "xxxx");
        assert_eq!(
            encode_reg_hex(&catalog, &presence, 5, &[]),
            Err(FormatError::IndexOutOfRange { index: 5, count: 2 })
        );
    }
}
