//! The 9-bit alphabet and wire constants.

use std::fmt;

/// Identifies a `.grin` container.
pub const MAGIC: u32 = 1846;
pub const MAGIC_BITS: u32 = 32;

/// Width of a symbol on the wire.
pub const SYMBOL_BITS: u32 = 9;
/// 256 byte values plus the end-of-stream marker.
pub const SYMBOL_COUNT: usize = 257;
/// Written after a serialized tree; never a real symbol.
pub const TREE_TERMINATOR: u16 = 257;

/// A byte value (0..=255) or the end-of-stream marker (256).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u16);

impl Symbol {
    pub const EOS: Symbol = Symbol(256);

    /// Accepts raw 9-bit values read off the wire; anything above 256 is rejected.
    pub fn new(value: u16) -> Option<Self> {
        (usize::from(value) < SYMBOL_COUNT).then_some(Symbol(value))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn is_eos(self) -> bool {
        self == Symbol::EOS
    }

    /// The literal byte, or `None` for the end-of-stream marker.
    pub fn as_byte(self) -> Option<u8> {
        u8::try_from(self.0).ok()
    }

    pub fn all() -> impl Iterator<Item = Symbol> {
        (0..SYMBOL_COUNT as u16).map(Symbol)
    }
}

impl From<u8> for Symbol {
    fn from(byte: u8) -> Self {
        Symbol(u16::from(byte))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_byte() {
            Some(b) if b.is_ascii_graphic() => write!(f, "'{}'", b as char),
            Some(b) => write!(f, "{b:#04x}"),
            None => f.write_str("EOS"),
        }
    }
}
