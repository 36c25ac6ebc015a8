use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use sha2::{Digest, Sha256};
use std::io;

use super::Block;

/// JSON formatter producing the "sorted keys, default separators" layout:
/// `", "` between items, `": "` after keys and `\uXXXX` for anything
/// outside printable ASCII. Key order comes from the struct declarations.
/// Numbers keep the digits they were parsed with (`arbitrary_precision`).
struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() && ch != '\x7f' {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize `value` into the canonical JSON text used for hashing.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> String {
    let mut buf = Vec::with_capacity(256);
    let mut ser = Serializer::with_formatter(&mut buf, CanonicalFormatter);
    value
        .serialize(&mut ser)
        .expect("plain data always serializes to json");
    // The formatter only ever emits ASCII.
    String::from_utf8(buf).expect("canonical json is ascii")
}

/// SHA-256 of `data`, lowercase hex (64 chars).
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Digest of a whole block, the value stored in the next block's
/// `previous_hash`.
pub fn hash_block(block: &Block) -> String {
    sha256_hex(canonical_json(block).as_bytes())
}

/// Digest checked by the proof-of-work puzzle.
pub fn hash_proof_guess(last_proof: u64, proof: u64, last_hash: &str) -> String {
    sha256_hex(format!("{last_proof}{proof}{last_hash}").as_bytes())
}
