use std::fmt;

use crate::symbol::{SYMBOL_COUNT, Symbol};

/// Path from the root to a leaf: `false` descends left, `true` descends right.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }

    pub(crate) fn child(&self, bit: bool) -> Code {
        let mut bits = Vec::with_capacity(self.0.len() + 1);
        bits.extend_from_slice(&self.0);
        bits.push(bit);
        Code(bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol → code, derived from a tree. Slots for absent symbols are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Code>; SYMBOL_COUNT],
}

impl CodeTable {
    pub(crate) fn empty() -> Self {
        CodeTable {
            codes: std::array::from_fn(|_| None),
        }
    }

    pub(crate) fn insert(&mut self, symbol: Symbol, code: Code) {
        self.codes[symbol.index()] = Some(code);
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes[symbol.index()].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> {
        Symbol::all().filter_map(|s| self.get(s).map(|code| (s, code)))
    }

    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when no code is empty and none is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&Code> = self.codes.iter().flatten().collect();
        codes.iter().all(|c| !c.is_empty())
            && codes.iter().enumerate().all(|(i, a)| {
                codes
                    .iter()
                    .enumerate()
                    .all(|(j, b)| i == j || !a.is_prefix_of(b))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(bits: &str) -> Code {
        Code(
            bits.chars()
                .map(|c| match c {
                    '0' => false,
                    '1' => true,
                    other => panic!("not a bit: {other:?}"),
                })
                .collect(),
        )
    }

    #[test]
    fn test_code_display() {
        let path = code("0110");
        assert_eq!(path.len(), 4);
        assert_eq!(path.to_string(), "0110");
        assert_eq!(path.child(true).to_string(), "01101");
    }

    #[test]
    fn test_prefix_detection() {
        let mut table = CodeTable::empty();
        table.insert(Symbol::from(b'a'), code("0"));
        table.insert(Symbol::from(b'b'), code("10"));
        table.insert(Symbol::EOS, code("11"));
        assert!(table.is_prefix_free());
        assert_eq!(table.len(), 3);

        table.insert(Symbol::from(b'c'), code("101"));
        assert!(!table.is_prefix_free());
    }

    #[test]
    fn test_empty_code_is_not_prefix_free() {
        let mut table = CodeTable::empty();
        table.insert(Symbol::EOS, Code::default());
        assert!(!table.is_prefix_free());
    }

    #[test]
    fn test_iter_order() {
        let mut table = CodeTable::empty();
        table.insert(Symbol::EOS, code("1"));
        table.insert(Symbol::from(3u8), code("0"));
        let symbols: Vec<Symbol> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec![Symbol::from(3u8), Symbol::EOS]);
    }
}
