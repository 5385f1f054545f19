use bitvec::prelude::*;
use derivative::Derivative;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use tracing::trace;

use crate::codec::{Decoder, Encoder};
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;

/// A single prefix code, most significant (first emitted) bit first.
pub type Code = BitBox<u8, Msb0>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf { symbol: u8, weight: u32 },
    Internal { left: Box<Node>, right: Box<Node> },
}

impl Node {
    fn leaf(symbol: u8, weight: u32) -> Self {
        Node::Leaf { symbol, weight }
    }

    fn from_children(left: Node, right: Node) -> Self {
        Node::Internal {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Leaf weight, or the sum of the leaves below an internal node.
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } => u64::from(*weight),
            Node::Internal { left, right } => left.weight() + right.weight(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A node waiting in the build queue. Ordered by weight, then by the order
/// it was queued in, never by its contents.
#[derive(Debug, Derivative)]
#[derivative(PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    weight: u64,
    seq: usize,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    node: Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two lightest nodes.
    ///
    /// Leaves are queued in ascending symbol order and equal weights leave
    /// the queue in the order they entered it, so the same table always
    /// yields the same tree. The first node removed becomes the left child.
    pub fn from_frequencies(table: &FrequencyTable) -> Result<Self> {
        let mut pq: BinaryHeap<_> = table
            .entries()
            .enumerate()
            .map(|(seq, (symbol, count))| {
                Reverse(Pending {
                    weight: u64::from(count),
                    seq,
                    node: Node::leaf(symbol, count),
                })
            })
            .collect();

        let mut seq = pq.len();
        loop {
            let Reverse(left) = pq.pop().ok_or(Error::EmptyInput)?;
            let Some(Reverse(right)) = pq.pop() else {
                return Ok(Self { root: left.node });
            };

            trace!(
                left = left.weight,
                right = right.weight,
                remaining = pq.len(),
                "merging nodes"
            );

            pq.push(Reverse(Pending {
                weight: left.weight + right.weight,
                seq,
                node: Node::from_children(left.node, right.node),
            }));
            seq += 1;
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Assigns every leaf its path from the root, `0` for left and `1` for
    /// right. A tree that is a single leaf gets the one bit code `0`.
    pub fn codes(&self) -> CodeTable {
        fn traverse(node: &Node, path: &mut BitVec<u8, Msb0>, codes: &mut BTreeMap<u8, Code>) {
            match node {
                Node::Leaf { symbol, .. } => {
                    codes.insert(*symbol, path.clone().into_boxed_bitslice());
                }
                Node::Internal { left, right } => {
                    path.push(false);
                    traverse(left, path, codes);
                    path.pop();

                    path.push(true);
                    traverse(right, path, codes);
                    path.pop();
                }
            }
        }

        let mut path = BitVec::new();
        if self.root.is_leaf() {
            path.push(false);
        }

        let mut codes = BTreeMap::new();
        traverse(&self.root, &mut path, &mut codes);

        CodeTable { codes }
    }

    pub fn into_encoder_decoder_pair(self) -> (Encoder, Decoder) {
        let enc = Encoder::new(self.codes());
        (enc, Decoder::new(self))
    }
}

/// Symbol to code mapping derived from a [`HuffmanTree`]. Prefix free.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    pub fn get(&self, symbol: u8) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(&symbol).map(|c| c.as_bitslice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSlice<u8, Msb0>)> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c.as_bitslice()))
    }

    /// Exact number of bits the input described by `table` encodes to.
    pub fn encoded_len(&self, table: &FrequencyTable) -> Result<u64> {
        table.entries().try_fold(0u64, |acc, (symbol, count)| {
            let code = self.get(symbol).ok_or(Error::UnknownSymbol(symbol))?;
            Ok(acc + u64::from(count) * code.len() as u64)
        })
    }
}
