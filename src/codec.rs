use bitvec::prelude::*;

use crate::error::{Error, Result};
use crate::tree::{CodeTable, HuffmanTree, Node};

#[derive(Debug, Clone)]
pub struct Encoder {
    codes: CodeTable,
}

impl Encoder {
    pub fn new(codes: CodeTable) -> Self {
        Self { codes }
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    /// Concatenates the code of every byte of `data`, in order.
    pub fn encode(&self, data: &[u8]) -> Result<BitVec<u8, Msb0>> {
        let mut out = BitVec::with_capacity(data.len());
        for &s in data {
            let code = self.codes.get(s).ok_or(Error::UnknownSymbol(s))?;
            out.extend_from_bitslice(code);
        }

        Ok(out)
    }
}

#[derive(Debug, Clone)]
pub struct Decoder {
    tree: HuffmanTree,
}

impl Decoder {
    pub fn new(tree: HuffmanTree) -> Self {
        Self { tree }
    }

    /// Walks the tree one bit at a time, emitting a symbol at every leaf.
    ///
    /// `input` must hold exactly the encoded bits: a code left unfinished
    /// when the input runs out is an error. With a single leaf tree every
    /// bit stands for one symbol.
    pub fn decode(&self, input: &BitSlice<u8, Msb0>) -> Result<Vec<u8>> {
        self.decode_into(input, Vec::new())
    }

    /// Like [`Decoder::decode`], but `input` must hold exactly `symbols`
    /// codes.
    pub fn decode_exact(&self, input: &BitSlice<u8, Msb0>, symbols: usize) -> Result<Vec<u8>> {
        // every code is at least one bit long
        if symbols > input.len() {
            return Err(Error::malformed(format!(
                "{} bits cannot hold {symbols} symbols",
                input.len()
            )));
        }

        let out = self.decode_into(input, Vec::with_capacity(symbols))?;
        if out.len() != symbols {
            return Err(Error::malformed(format!(
                "bit stream holds {} symbols, symbol table declares {symbols}",
                out.len()
            )));
        }

        Ok(out)
    }

    fn decode_into(&self, input: &BitSlice<u8, Msb0>, mut out: Vec<u8>) -> Result<Vec<u8>> {
        let root = self.tree.root();

        if let Node::Leaf { symbol, .. } = root {
            out.resize(input.len(), *symbol);
            return Ok(out);
        }

        let mut cursor = root;
        for b in input.iter().by_vals() {
            if let Node::Internal { left, right } = cursor {
                cursor = if b { &**right } else { &**left };
            }

            if let Node::Leaf { symbol, .. } = cursor {
                out.push(*symbol);
                cursor = root;
            }
        }

        if !std::ptr::eq(cursor, root) {
            return Err(Error::malformed("bit stream ends in the middle of a code"));
        }

        Ok(out)
    }
}
