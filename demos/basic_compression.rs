use grin::HuffmanCodec;
use std::fs::File;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";

    std::fs::write("sample.txt", sample_text)?;
    println!("Created sample file: {} bytes", sample_text.len());

    let input = File::open("sample.txt")?;
    let output = File::create("sample.grin")?;
    HuffmanCodec::encode_from_file(input, output)?;

    let compressed_size = std::fs::metadata("sample.grin")?.len();
    let compression_ratio = compressed_size as f64 / sample_text.len() as f64;
    println!(
        "Compressed to: {} bytes ({:.1}% of original)",
        compressed_size,
        compression_ratio * 100.0
    );

    let compressed = File::open("sample.grin")?;
    let decompressed = File::create("decompressed.txt")?;
    HuffmanCodec::decode_from_file(compressed, decompressed)?;

    let decompressed_text = std::fs::read_to_string("decompressed.txt")?;
    if sample_text != decompressed_text {
        return Err("Decompression verification failed".into());
    }
    println!("Decompression successful! Data matches exactly.");

    std::fs::remove_file("sample.txt")?;
    std::fs::remove_file("sample.grin")?;
    std::fs::remove_file("decompressed.txt")?;

    Ok(())
}
