//! Static Huffman compression of byte buffers into a self describing
//! container.
//!
//! ```
//! let packed = huffpack::compress(b"aaabbc")?;
//! assert_eq!(huffpack::decompress(&packed)?, b"aaabbc");
//! # Ok::<(), huffpack::Error>(())
//! ```

pub mod codec;
pub mod container;
pub mod error;
pub mod frequency;
pub mod tree;

pub use codec::{Decoder, Encoder};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use tree::{CodeTable, HuffmanTree, Node};

use tracing::debug;

/// Compresses `data` into a container holding its symbol table and encoding.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }

    let table = FrequencyTable::from_bytes(data)?;
    let tree = HuffmanTree::from_frequencies(&table)?;
    let encoder = Encoder::new(tree.codes());

    let bits = encoder.encode(data)?;
    let out = container::serialize(&bits, &table);

    debug!(
        input_len = data.len(),
        leaf_count = table.len(),
        bit_len = bits.len(),
        output_len = out.len(),
        "compressed"
    );

    Ok(out)
}

/// Restores the bytes a container was made from.
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    let (table, payload) = container::deserialize(bytes)?;
    let (encoder, decoder) = HuffmanTree::from_frequencies(&table)?.into_encoder_decoder_pair();

    let bit_len = encoder.codes().encoded_len(&table)?;
    let bits = container::payload_bits(payload, bit_len)?;
    let out = decoder.decode_exact(bits, symbol_count(&table)?)?;

    debug!(
        input_len = bytes.len(),
        leaf_count = table.len(),
        bit_len,
        output_len = out.len(),
        "decompressed"
    );

    Ok(out)
}

/// Number of symbols the table declares, as an output length.
pub(crate) fn symbol_count(table: &FrequencyTable) -> Result<usize> {
    usize::try_from(table.total())
        .map_err(|_| Error::malformed("symbol table declares more symbols than fit in memory"))
}
