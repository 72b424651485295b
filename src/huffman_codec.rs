use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};

use log::{debug, info};

use crate::bit_io::{BitSink, BitSource};
use crate::error::{GrinError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::HuffmanTree;
use crate::symbol::{MAGIC, MAGIC_BITS};

/// One encode or decode call's worth of state: the tree in use.
pub struct HuffmanCodec {
    tree: HuffmanTree,
}

impl HuffmanCodec {
    pub fn new(tree: HuffmanTree) -> Self {
        HuffmanCodec { tree }
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    /// Counts every byte of `input` and builds a tree for it. Leaves `input`
    /// exhausted.
    pub fn from_source<R: Read>(input: R) -> Result<Self> {
        let mut source = BitSource::new(input);
        let frequencies = FrequencyTable::from_source(&mut source)?;
        Ok(Self::new(HuffmanTree::build(&frequencies)?))
    }

    /// Reads the container magic and the serialized tree, leaving `source` at
    /// the first payload bit.
    pub fn read_header<R: Read>(source: &mut BitSource<R>) -> Result<Self> {
        let found = source
            .read_bits(MAGIC_BITS)?
            .ok_or(GrinError::Malformed("stream too short for magic number"))?;
        if found != MAGIC {
            return Err(GrinError::BadMagic { found });
        }
        Ok(Self::new(HuffmanTree::deserialize(source)?))
    }

    pub fn encode<R: Read, W: Write>(
        &self,
        source: &mut BitSource<R>,
        sink: &mut BitSink<W>,
    ) -> Result<u64> {
        self.tree.encode(source, sink)
    }

    pub fn decode<R: Read, W: Write>(
        &self,
        source: &mut BitSource<R>,
        out: &mut W,
    ) -> Result<u64> {
        self.tree.decode(source, out)
    }

    /// Two passes over `input`: count, rewind, encode. Returns `output` after
    /// the final byte has been padded and flushed.
    pub fn encode_stream<R: Read + Seek, W: Write>(mut input: R, output: W) -> Result<W> {
        let codec = Self::from_source(&mut input)?;
        input.rewind()?;

        let mut source = BitSource::new(&mut input);
        let mut sink = BitSink::new(output);
        codec.encode(&mut source, &mut sink)?;
        Ok(sink.close()?)
    }

    pub fn decode_stream<R: Read, W: Write>(input: R, mut output: W) -> Result<W> {
        let mut source = BitSource::new(input);
        let codec = Self::read_header(&mut source)?;
        codec.decode(&mut source, &mut output)?;
        output.flush()?;
        Ok(output)
    }

    pub fn encode_from_file(input: File, output: File) -> Result<()> {
        let written = Self::encode_stream(BufReader::new(input), BufWriter::new(output))?;
        let file = written.into_inner().map_err(|e| e.into_error())?;
        info!("encoded container is {} bytes", file.metadata()?.len());
        Ok(())
    }

    pub fn decode_from_file(input: File, output: File) -> Result<()> {
        let written = Self::decode_stream(BufReader::new(input), BufWriter::new(output))?;
        let file = written.into_inner().map_err(|e| e.into_error())?;
        info!("decoded output is {} bytes", file.metadata()?.len());
        Ok(())
    }

    pub fn encode_bytes(data: &[u8]) -> Result<Vec<u8>> {
        let encoded = Self::encode_stream(Cursor::new(data), Vec::new())?;
        debug!("{} bytes -> {} bytes", data.len(), encoded.len());
        Ok(encoded)
    }

    pub fn decode_bytes(data: &[u8]) -> Result<Vec<u8>> {
        Self::decode_stream(data, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::symbol::Symbol;

    fn roundtrip(data: &[u8]) {
        let encoded = HuffmanCodec::encode_bytes(data).unwrap();
        let decoded = HuffmanCodec::decode_bytes(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_roundtrip_text() {
        roundtrip(b"The quick brown fox jumps over the lazy dog.");
        roundtrip(b"a");
        roundtrip(b"abracadabra abracadabra");
    }

    #[test]
    fn test_roundtrip_random() {
        let mut rng = SmallRng::seed_from_u64(0x6772696e);
        for _ in 0..25 {
            let len = rng.random_range(0..5000);
            let alphabet = rng.random_range(1..=256u16);
            let data: Vec<u8> = (0..len)
                .map(|_| rng.random_range(0..alphabet) as u8)
                .collect();
            roundtrip(&data);
        }
    }

    #[test]
    fn test_empty_input() {
        let encoded = HuffmanCodec::encode_bytes(&[]).unwrap();
        // 32 magic + 30 tree bits + 1-bit end-of-stream code, padded.
        assert_eq!(encoded.len(), 8);
        assert_eq!(&encoded[..4], &MAGIC.to_be_bytes());
        assert_eq!(HuffmanCodec::decode_bytes(&encoded).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_repeated_byte() {
        let data = vec![0x41u8; 1000];
        let encoded = HuffmanCodec::encode_bytes(&data).unwrap();
        // 32 + 30 + 1000 + 1 bits
        assert_eq!(encoded.len(), 1063usize.div_ceil(8));

        let mut source = BitSource::new(&encoded[..]);
        let codec = HuffmanCodec::read_header(&mut source).unwrap();
        assert_eq!(codec.tree().leaf_count(), 2);

        let mut out = Vec::new();
        assert_eq!(codec.decode(&mut source, &mut out).unwrap(), 1000);
        assert_eq!(out, data);
    }

    #[test]
    fn test_full_alphabet_in_order() {
        let data: Vec<u8> = (0..=255u8).collect();
        let encoded = HuffmanCodec::encode_bytes(&data).unwrap();
        assert_eq!(HuffmanCodec::decode_bytes(&encoded).unwrap(), data);

        let mut source = BitSource::new(&encoded[..]);
        let codec = HuffmanCodec::read_header(&mut source).unwrap();
        let table = codec.tree().code_table();
        assert_eq!(table.len(), 257);
        assert!(table.is_prefix_free());
        assert!(table.get(Symbol::EOS).is_some());
    }

    #[test]
    fn test_bad_magic() {
        let mut encoded = HuffmanCodec::encode_bytes(b"hello").unwrap();
        encoded[0] ^= 0x80;
        let err = HuffmanCodec::decode_bytes(&encoded).unwrap_err();
        assert!(matches!(err, GrinError::BadMagic { .. }));

        // Nothing after the magic: rejected before any tree bits are wanted.
        let err = HuffmanCodec::decode_bytes(&[0x89, 0x50, 0x4e, 0x47]).unwrap_err();
        assert!(matches!(err, GrinError::BadMagic { found: 0x89504e47 }));
    }

    #[test]
    fn test_short_magic_is_malformed() {
        let err = HuffmanCodec::decode_bytes(&[0x00, 0x00]).unwrap_err();
        assert!(matches!(err, GrinError::Malformed(_)));
    }

    #[test]
    fn test_truncated_container() {
        let data = b"a longer message so the payload spans many bytes".repeat(4);
        let encoded = HuffmanCodec::encode_bytes(&data).unwrap();
        for cut in [4, 6, encoded.len() / 2, encoded.len() - 2] {
            let err = HuffmanCodec::decode_bytes(&encoded[..cut]).unwrap_err();
            assert!(matches!(err, GrinError::Malformed(_)), "cut at {cut}");
        }
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut encoded = HuffmanCodec::encode_bytes(b"tail").unwrap();
        encoded.extend_from_slice(&[0xde, 0xad]);
        assert_eq!(HuffmanCodec::decode_bytes(&encoded).unwrap(), b"tail");
    }

    #[test]
    fn test_stream_drivers_rewind_input() {
        let data = b"seekable input is read twice".to_vec();
        let encoded = HuffmanCodec::encode_stream(Cursor::new(data.clone()), Vec::new()).unwrap();
        let decoded = HuffmanCodec::decode_stream(Cursor::new(encoded), Vec::new()).unwrap();
        assert_eq!(decoded, data);
    }
}
