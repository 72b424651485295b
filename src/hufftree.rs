use std::io::{Read, Write};

use log::{Level, debug, log_enabled, trace};

use crate::bit_io::{BitSink, BitSource};
use crate::code_table::{Code, CodeTable};
use crate::error::{GrinError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;
use crate::symbol::{MAGIC, MAGIC_BITS, SYMBOL_BITS, SYMBOL_COUNT, Symbol, TREE_TERMINATOR};

/// Index of a node inside a tree's arena.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: Symbol,
    },
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl HuffNode {
    /// Frequency sum during construction; zero for deserialized trees.
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }
}

// Heap ordering: lowest weight first, then the older node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    weight: u64,
    node: NodeId,
}

/// A Huffman prefix code over the 9-bit alphabet.
///
/// Nodes live in an arena; the root is always an internal node, so every
/// symbol's code is at least one bit long.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<HuffNode>,
    root: NodeId,
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HuffmanTree::build(&FrequencyTable::from_bytes(bytes))
    }

    /// Greedy merge of the two lightest nodes until one remains.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        if frequencies.get(Symbol::EOS) == 0 {
            return Err(GrinError::Usage(
                "frequency table has no end-of-stream entry".to_string(),
            ));
        }

        let mut nodes: Vec<HuffNode> = frequencies
            .iter()
            .map(|(symbol, weight)| HuffNode::Leaf { weight, symbol })
            .collect();

        // Only end-of-stream: pair it with an unused zero-weight leaf so the
        // root is internal and the end-of-stream code is one bit.
        if nodes.len() == 1 {
            nodes.push(HuffNode::Leaf {
                weight: 0,
                symbol: Symbol::from(0u8),
            });
        }

        let pending = nodes
            .iter()
            .enumerate()
            .map(|(node, n)| Pending {
                weight: n.weight(),
                node,
            })
            .collect();
        let mut heap = MinHeap::build(pending);

        while heap.heap_size() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;

            let weight = x.weight.checked_add(y.weight).ok_or_else(|| {
                GrinError::Usage("frequency counts overflow".to_string())
            })?;
            let node = nodes.len();
            nodes.push(HuffNode::Internal {
                weight,
                left: x.node,
                right: y.node,
            });
            heap.insert(Pending { weight, node });
        }
        let root = heap.extract_min()?.node;

        let tree = HuffmanTree { nodes, root };
        debug!(
            "built tree: {} leaves, root weight {}",
            tree.leaf_count(),
            tree.nodes[root].weight()
        );
        tree.log_structure();
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &HuffNode {
        &self.nodes[id]
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Walks the tree depth-first, recording the root-to-leaf path of every symbol.
    pub fn code_table(&self) -> CodeTable {
        let mut table = CodeTable::empty();
        let mut stack = vec![(self.root, Code::default())];
        while let Some((id, code)) = stack.pop() {
            match self.nodes[id] {
                HuffNode::Leaf { symbol, .. } => table.insert(symbol, code),
                HuffNode::Internal { left, right, .. } => {
                    stack.push((right, code.child(true)));
                    stack.push((left, code.child(false)));
                }
            }
        }
        table
    }

    /// Preorder shape: `1` for an internal node, `0` plus a 9-bit symbol for a
    /// leaf, then the 9-bit tree terminator.
    pub fn serialize<W: Write>(&self, sink: &mut BitSink<W>) -> Result<()> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.nodes[id] {
                HuffNode::Leaf { symbol, .. } => {
                    sink.write_bit(false)?;
                    sink.write_bits(u32::from(symbol.value()), SYMBOL_BITS)?;
                }
                HuffNode::Internal { left, right, .. } => {
                    sink.write_bit(true)?;
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        sink.write_bits(u32::from(TREE_TERMINATOR), SYMBOL_BITS)?;
        Ok(())
    }

    /// Rebuilds a tree written by [`serialize`](Self::serialize) and consumes
    /// its terminator. Node weights are not stored, so they come back as zero.
    pub fn deserialize<R: Read>(source: &mut BitSource<R>) -> Result<Self> {
        let mut nodes: Vec<HuffNode> = Vec::new();
        // Internal nodes still missing a child. A child slot pointing back at
        // its own node is unfilled.
        let mut open: Vec<NodeId> = Vec::new();
        let mut seen = [false; SYMBOL_COUNT];

        loop {
            let bit = source
                .read_bit()?
                .ok_or(GrinError::Malformed("stream ended inside the tree"))?;
            let id = nodes.len();

            if bit {
                // 257 distinct leaves allow at most 256 internal nodes.
                if nodes.len() >= 2 * SYMBOL_COUNT - 1 {
                    return Err(GrinError::Malformed("tree has too many nodes"));
                }
                nodes.push(HuffNode::Internal {
                    weight: 0,
                    left: id,
                    right: id,
                });
            } else {
                let raw = source
                    .read_bits(SYMBOL_BITS)?
                    .ok_or(GrinError::Malformed("stream ended inside a leaf symbol"))?;
                let symbol = u16::try_from(raw)
                    .ok()
                    .and_then(Symbol::new)
                    .ok_or(GrinError::Malformed("leaf symbol out of range"))?;
                if id == 0 {
                    return Err(GrinError::Malformed("tree root is a leaf"));
                }
                if std::mem::replace(&mut seen[symbol.index()], true) {
                    return Err(GrinError::Malformed("symbol appears twice in tree"));
                }
                nodes.push(HuffNode::Leaf { weight: 0, symbol });
            }

            if let Some(&parent) = open.last() {
                if let HuffNode::Internal { left, right, .. } = &mut nodes[parent] {
                    if *left == parent {
                        *left = id;
                    } else {
                        *right = id;
                        open.pop();
                    }
                }
            }
            if bit {
                open.push(id);
            }
            if open.is_empty() {
                break;
            }
        }

        match source.read_bits(SYMBOL_BITS)? {
            Some(v) if v == u32::from(TREE_TERMINATOR) => {}
            Some(_) => return Err(GrinError::Malformed("bad tree terminator")),
            None => return Err(GrinError::Malformed("stream ended before tree terminator")),
        }

        let tree = HuffmanTree { nodes, root: 0 };
        debug!("read tree: {} leaves", tree.leaf_count());
        tree.log_structure();
        Ok(tree)
    }

    /// Writes a whole container: magic, tree, then every byte of `source`
    /// followed by the end-of-stream code. Returns the number of bytes encoded.
    ///
    /// The tree must have been built from the same bytes `source` yields.
    pub fn encode<R: Read, W: Write>(
        &self,
        source: &mut BitSource<R>,
        sink: &mut BitSink<W>,
    ) -> Result<u64> {
        sink.write_bits(MAGIC, MAGIC_BITS)?;
        self.serialize(sink)?;

        let table = self.code_table();
        let mut count = 0u64;
        while let Some(byte) = source.read_byte()? {
            let code = table.get(Symbol::from(byte)).ok_or_else(|| {
                GrinError::Usage(format!("byte {byte:#04x} has no code in this tree"))
            })?;
            sink.write_all_bits(code.bits())?;
            count += 1;
        }

        let eos = table
            .get(Symbol::EOS)
            .ok_or_else(|| GrinError::Usage("tree has no end-of-stream leaf".to_string()))?;
        sink.write_all_bits(eos.bits())?;

        debug!("encoded {} bytes into {} bits", count, sink.bit_count());
        Ok(count)
    }

    /// Walks payload bits from the root, emitting a byte at each literal leaf,
    /// until the end-of-stream leaf. Returns the number of bytes written.
    pub fn decode<R: Read, W: Write>(
        &self,
        source: &mut BitSource<R>,
        out: &mut W,
    ) -> Result<u64> {
        let mut written = 0u64;
        let mut current = self.root;
        loop {
            let HuffNode::Internal { left, right, .. } = self.nodes[current] else {
                return Err(GrinError::Malformed("tree root is a leaf"));
            };
            let bit = source.read_bit()?.ok_or(GrinError::Malformed(
                "payload ended before end-of-stream code",
            ))?;
            current = if bit { right } else { left };

            if let HuffNode::Leaf { symbol, .. } = self.nodes[current] {
                match symbol.as_byte() {
                    Some(byte) => {
                        out.write_all(&[byte])?;
                        written += 1;
                        current = self.root;
                    }
                    None => break,
                }
            }
        }
        debug!("decoded {} bytes", written);
        Ok(written)
    }

    fn log_structure(&self) {
        if !log_enabled!(Level::Trace) {
            return;
        }
        let mut stack = vec![(self.root, 0usize, "root")];
        while let Some((id, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match self.nodes[id] {
                HuffNode::Leaf { symbol, weight } => {
                    trace!("{indent}{label}-> Leaf: {symbol} [weight: {weight}]");
                }
                HuffNode::Internal {
                    weight,
                    left,
                    right,
                } => {
                    trace!("{indent}{label}-> Internal [weight: {weight}]");
                    stack.push((right, depth + 1, "R"));
                    stack.push((left, depth + 1, "L"));
                }
            }
        }
    }
}

impl PartialEq for HuffmanTree {
    /// Trees are equal when they assign the same codes; weights are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.code_table() == other.code_table()
    }
}

impl Eq for HuffmanTree {}
