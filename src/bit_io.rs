//! Bit-granular channel over byte streams.
//!
//! Bits are packed MSB-first. Reads report exhaustion with `None` instead of
//! an error so callers can tell "no more data" apart from a failing reader.

use std::io::{self, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

pub struct BitSource<R: Read> {
    inner: BitReader<R, BigEndian>,
}

impl<R: Read> BitSource<R> {
    pub fn new(reader: R) -> Self {
        BitSource {
            inner: BitReader::endian(reader, BigEndian),
        }
    }

    /// Next bit, or `None` once the underlying reader is exhausted.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        exhausted_as_none(self.inner.read_bit())
    }

    /// Next `n` bits (at most 32) as an unsigned value, or `None` if fewer
    /// than `n` bits remain.
    pub fn read_bits(&mut self, n: u32) -> io::Result<Option<u32>> {
        debug_assert!(n <= 32);
        exhausted_as_none(self.inner.read::<u32>(n))
    }

    /// Next whole byte, or `None` at end of data.
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.read_bits(8)?.map(|b| b as u8))
    }
}

fn exhausted_as_none<T>(result: io::Result<T>) -> io::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}

pub struct BitSink<W: Write> {
    inner: BitWriter<W, BigEndian>,
    bit_count: u64,
}

impl<W: Write> BitSink<W> {
    pub fn new(writer: W) -> Self {
        BitSink {
            inner: BitWriter::endian(writer, BigEndian),
            bit_count: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.inner.write_bit(bit)?;
        self.bit_count += 1;
        Ok(())
    }

    /// Writes the low `n` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u32, n: u32) -> io::Result<()> {
        self.inner.write(n, value)?;
        self.bit_count += u64::from(n);
        Ok(())
    }

    pub fn write_all_bits(&mut self, bits: &[bool]) -> io::Result<()> {
        for &bit in bits {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Bits written so far, not counting close-time padding.
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    /// Pads the final byte with zero bits, flushes, and hands back the writer.
    pub fn close(mut self) -> io::Result<W> {
        self.inner.byte_align()?;
        let mut writer = self.inner.into_writer();
        writer.flush()?;
        Ok(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_pack_msb_first() {
        let mut sink = BitSink::new(Vec::new());
        sink.write_bit(true).unwrap();
        sink.write_bits(0b01, 2).unwrap();
        sink.write_bits(0x1ff, 9).unwrap();
        assert_eq!(sink.bit_count(), 12);
        let bytes = sink.close().unwrap();
        assert_eq!(bytes, vec![0b1011_1111, 0b1111_0000]);
    }

    #[test]
    fn test_read_reports_exhaustion() {
        let data = [0b1010_0000u8];
        let mut source = BitSource::new(&data[..]);
        assert_eq!(source.read_bit().unwrap(), Some(true));
        assert_eq!(source.read_bits(3).unwrap(), Some(0b010));
        assert_eq!(source.read_bits(4).unwrap(), Some(0));
        assert_eq!(source.read_bit().unwrap(), None);
        assert_eq!(source.read_byte().unwrap(), None);
    }

    #[test]
    fn test_short_multi_bit_read_is_none() {
        let data = [0xabu8];
        let mut source = BitSource::new(&data[..]);
        assert_eq!(source.read_bits(9).unwrap(), None);
    }

    #[test]
    fn test_bytes_through_channel() {
        let mut sink = BitSink::new(Vec::new());
        for b in b"grin" {
            sink.write_bits(u32::from(*b), 8).unwrap();
        }
        let bytes = sink.close().unwrap();
        assert_eq!(bytes, b"grin");

        let mut source = BitSource::new(&bytes[..]);
        let mut out = Vec::new();
        while let Some(b) = source.read_byte().unwrap() {
            out.push(b);
        }
        assert_eq!(out, b"grin");
    }

    #[test]
    fn test_close_on_aligned_stream_adds_nothing() {
        let sink = BitSink::new(Vec::new());
        assert!(sink.close().unwrap().is_empty());
    }
}
