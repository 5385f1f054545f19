//! The compressed container.
//!
//! ```text
//! offset  size   field
//! 0       2      marker, "HF"
//! 2       4      leaf count N, big endian
//! 6       N * 5  N x { symbol: u8, count: u32 big endian }
//! 6 + 5N  ...    encoded bits, MSB first, zero padded to a byte
//! ```
//!
//! The number of meaningful payload bits is not stored. It is recomputed
//! from the symbol table, which determines the tree and so every code length.

use bitvec::prelude::*;

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;

pub const MAGIC: [u8; 2] = *b"HF";

const LEAF_COUNT_LEN: usize = 4;

/// Bytes per symbol table entry: the symbol, then its count.
pub const ENTRY_LEN: usize = 1 + 4;

/// Length of everything before the payload.
pub fn header_len(leaf_count: usize) -> usize {
    MAGIC.len() + LEAF_COUNT_LEN + leaf_count * ENTRY_LEN
}

/// Exact length of a container holding `leaf_count` symbols and `bit_len`
/// encoded bits.
pub fn compressed_len(leaf_count: usize, bit_len: usize) -> usize {
    header_len(leaf_count) + bit_len.div_ceil(8)
}

/// Writes `table` and `bits` into a new container, allocated once at its
/// final size.
pub fn serialize(bits: &BitSlice<u8, Msb0>, table: &FrequencyTable) -> Vec<u8> {
    let header = header_len(table.len());
    let total = compressed_len(table.len(), bits.len());

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&MAGIC);
    // at most 256 distinct byte values
    out.extend_from_slice(&(table.len() as u32).to_be_bytes());
    for (symbol, count) in table.entries() {
        out.push(symbol);
        out.extend_from_slice(&count.to_be_bytes());
    }
    debug_assert_eq!(out.len(), header);

    out.resize(total, 0);
    out[header..].view_bits_mut::<Msb0>()[..bits.len()].copy_from_bitslice(bits);

    out
}

/// Splits a container into its symbol table and the payload that follows
/// it. Every length is checked against the buffer before it is read. The
/// payload is returned whole, padding included.
pub fn deserialize(bytes: &[u8]) -> Result<(FrequencyTable, &BitSlice<u8, Msb0>)> {
    if bytes.get(..MAGIC.len()) != Some(&MAGIC[..]) {
        return Err(Error::InvalidContainer {
            expected: MAGIC,
            found: bytes.iter().take(MAGIC.len()).copied().collect(),
        });
    }
    let rest = &bytes[MAGIC.len()..];

    let (count, rest) = rest
        .split_first_chunk::<LEAF_COUNT_LEN>()
        .ok_or_else(|| Error::malformed("truncated before the leaf count"))?;
    let leaf_count = u32::from_be_bytes(*count) as usize;
    if leaf_count == 0 {
        return Err(Error::malformed("symbol table is empty"));
    }

    let table_len = leaf_count
        .checked_mul(ENTRY_LEN)
        .filter(|&len| len <= rest.len())
        .ok_or_else(|| {
            Error::malformed(format!(
                "{leaf_count} symbol entries do not fit in the remaining {} bytes",
                rest.len()
            ))
        })?;
    let (entries, payload) = rest.split_at(table_len);

    let mut table = FrequencyTable::new();
    for entry in entries.chunks_exact(ENTRY_LEN) {
        let count = u32::from_be_bytes([entry[1], entry[2], entry[3], entry[4]]);
        table.add_entry(entry[0], count);
    }

    Ok((table, payload.view_bits::<Msb0>()))
}

/// Trims `payload` to its first `bit_len` bits, checking it holds exactly
/// the bytes those bits pack into.
pub fn payload_bits(payload: &BitSlice<u8, Msb0>, bit_len: u64) -> Result<&BitSlice<u8, Msb0>> {
    let expected = bit_len.div_ceil(8);
    let actual = (payload.len() / 8) as u64;
    if expected != actual {
        return Err(Error::malformed(format!(
            "payload is {actual} bytes, symbol table implies {expected}"
        )));
    }

    // bit_len <= payload.len() here, so it fits in usize
    Ok(&payload[..bit_len as usize])
}

/// Summary of a container, as reported by [`inspect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub leaf_count: usize,
    pub header_len: usize,
    pub payload_len: usize,
    pub bit_len: u64,
    pub original_len: u64,
}

/// Parses and validates a container. The payload is decoded to check it
/// against the symbol table, then discarded.
pub fn inspect(bytes: &[u8]) -> Result<ContainerInfo> {
    let (table, payload) = deserialize(bytes)?;
    let (encoder, decoder) = HuffmanTree::from_frequencies(&table)?.into_encoder_decoder_pair();
    let bit_len = encoder.codes().encoded_len(&table)?;
    decoder.decode_exact(payload_bits(payload, bit_len)?, crate::symbol_count(&table)?)?;

    let header_len = bytes.len() - payload.len() / 8;
    Ok(ContainerInfo {
        leaf_count: (header_len - MAGIC.len() - LEAF_COUNT_LEN) / ENTRY_LEN,
        header_len,
        payload_len: payload.len() / 8,
        bit_len,
        original_len: table.total(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(u8, u32)]) -> FrequencyTable {
        let mut t = FrequencyTable::new();
        for &(s, c) in pairs {
            t.add_entry(s, c);
        }
        t
    }

    #[test]
    fn size_arithmetic() {
        assert_eq!(header_len(0), 6);
        assert_eq!(header_len(51), 261);
        assert_eq!(compressed_len(3, 0), 21);
        assert_eq!(compressed_len(3, 1), 22);
        assert_eq!(compressed_len(3, 8), 22);
        assert_eq!(compressed_len(3, 9), 23);
    }

    #[test]
    fn serialize_layout() {
        let t = table(&[(b'a', 3), (b'b', 2), (b'c', 1)]);
        let bits = bits![u8, Msb0; 0, 0, 0, 1, 1, 1, 1, 1, 0];
        let out = serialize(bits, &t);

        assert_eq!(
            out,
            vec![
                b'H', b'F', //
                0, 0, 0, 3, //
                b'a', 0, 0, 0, 3, //
                b'b', 0, 0, 0, 2, //
                b'c', 0, 0, 0, 1, //
                0b0001_1111, 0b0000_0000,
            ]
        );
    }

    #[test]
    fn deserialize_reads_table_and_payload() {
        let t = table(&[(1, 70000), (200, 5)]);
        let out = serialize(bits![u8, Msb0; 1, 0, 1], &t);

        let (parsed, payload) = deserialize(&out).unwrap();
        assert_eq!(parsed, t);
        assert_eq!(payload.len(), 8);
        assert_eq!(payload, bits![u8, Msb0; 1, 0, 1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn rejects_bad_marker() {
        let err = deserialize(b"XY\0\0\0\x01a\0\0\0\x01\0").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidContainer { expected: MAGIC, found: b"XY".to_vec() }
        );
    }

    #[test]
    fn rejects_buffer_shorter_than_marker() {
        assert!(matches!(deserialize(b"H"), Err(Error::InvalidContainer { .. })));
        assert!(matches!(deserialize(b""), Err(Error::InvalidContainer { .. })));
    }

    #[test]
    fn rejects_truncated_leaf_count() {
        assert!(matches!(deserialize(b"HF\0\0"), Err(Error::MalformedContainer(_))));
    }

    #[test]
    fn rejects_empty_symbol_table() {
        assert!(matches!(deserialize(b"HF\0\0\0\0"), Err(Error::MalformedContainer(_))));
    }

    #[test]
    fn rejects_leaf_count_past_end() {
        // claims 2 entries, carries 1
        let bytes = b"HF\0\0\0\x02a\0\0\0\x01";
        assert!(matches!(deserialize(bytes), Err(Error::MalformedContainer(_))));

        let huge = b"HF\xff\xff\xff\xffa\0\0\0\x01";
        assert!(matches!(deserialize(huge), Err(Error::MalformedContainer(_))));
    }

    #[test]
    fn duplicate_entries_keep_first() {
        let bytes = b"HF\0\0\0\x02a\0\0\0\x04a\0\0\0\x09\0";
        let (parsed, _) = deserialize(bytes).unwrap();
        assert_eq!(parsed.count(b'a'), Some(4));
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn payload_bits_checks_length() {
        let payload = bits![u8, Msb0; 1, 0, 1, 1, 0, 0, 0, 0];
        assert_eq!(payload_bits(payload, 4).unwrap(), bits![u8, Msb0; 1, 0, 1, 1]);
        assert_eq!(payload_bits(payload, 8).unwrap().len(), 8);
        assert!(payload_bits(payload, 9).is_err());
        assert!(payload_bits(payload, 0).is_err());
    }

    #[test]
    fn inspect_reports_sizes() {
        let t = table(&[(b'a', 3), (b'b', 2), (b'c', 1)]);
        let out = serialize(bits![u8, Msb0; 0, 0, 0, 1, 1, 1, 1, 1, 0], &t);

        let info = inspect(&out).unwrap();
        assert_eq!(
            info,
            ContainerInfo {
                leaf_count: 3,
                header_len: 21,
                payload_len: 2,
                bit_len: 9,
                original_len: 6,
            }
        );
    }
}
