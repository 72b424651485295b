//! # grin
//!
//! A Huffman file compressor over a 9-bit alphabet: the 256 byte values plus
//! an end-of-stream marker that terminates every payload.
//!
//! ## Quick Start
//!
//! ```no_run
//! use grin::HuffmanCodec;
//! use std::fs::File;
//!
//! // Compress a file
//! let input = File::open("input.txt")?;
//! let output = File::create("compressed.grin")?;
//! HuffmanCodec::encode_from_file(input, output)?;
//!
//! // Decompress a file
//! let compressed = File::open("compressed.grin")?;
//! let decompressed = File::create("output.txt")?;
//! HuffmanCodec::decode_from_file(compressed, decompressed)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Container layout
//!
//! | Field | Width |
//! |---|---|
//! | magic (`1846`) | 32 bits |
//! | preorder tree | variable |
//! | tree terminator (`257`) | 9 bits |
//! | payload codes | variable |
//! | end-of-stream code | code length |

pub mod bit_io;
pub mod code_table;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod symbol;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use error::{GrinError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::HuffmanCodec;
pub use hufftree::HuffmanTree;
pub use symbol::Symbol;
