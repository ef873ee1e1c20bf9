#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use fs_core::compression::{BlockCodec, CompressionError, Lz4BlockCodec};

    fn roundtrip(input: &[u8]) -> Vec<u8> {
        let mut codec = Lz4BlockCodec::new();
        let compressed = codec.compress_block(input).expect("compression ok");
        let mut out = vec![0u8; input.len() + 64];
        let n = codec.decompress_block(&compressed, &mut out).expect("decompression ok");
        out.truncate(n);
        out
    }

    #[test]
    fn lz4_roundtrip_repetitive() {
        let input = vec![b'A'; 10_000];
        let compressed = Lz4BlockCodec::new().compress_block(&input).unwrap();
        assert!(compressed.len() < input.len() / 10, "repeated bytes should shrink a lot");
        assert_eq!(roundtrip(&input), input);
    }

    #[test]
    fn lz4_roundtrip_incompressible() {
        let mut input = vec![0u8; 40_000];
        StdRng::seed_from_u64(7).fill(&mut input[..]);
        assert_eq!(roundtrip(&input), input);
    }

    #[test]
    fn compress_bound_covers_worst_case() {
        let mut input = vec![0u8; 4096];
        StdRng::seed_from_u64(11).fill(&mut input[..]);
        let compressed = Lz4BlockCodec::new().compress_block(&input).unwrap();
        assert!(compressed.len() <= Lz4BlockCodec::compress_bound(input.len()));
    }

    #[test]
    fn empty_input_stays_empty() {
        let mut codec = Lz4BlockCodec::new();
        assert!(codec.compress_block(&[]).unwrap().is_empty());
        let mut out = [0u8; 8];
        assert_eq!(codec.decompress_block(&[], &mut out).unwrap(), 0);
    }

    #[test]
    fn output_is_raw_block_without_size_prefix() {
        let input = b"hello hello hello hello hello";
        let block = Lz4BlockCodec::new().compress_block(input).unwrap();
        // Plain block decoder, size supplied out of band
        let decoded = lz4_flex::block::decompress(&block, input.len()).unwrap();
        assert_eq!(&decoded[..], &input[..]);
    }

    #[test]
    fn bogus_input_yields_codec_error() {
        // token: 1 literal + match; offset 5 points before the start of output
        let bogus = [0x10, b'a', 0x05, 0x00];
        let mut out = vec![0u8; 64];
        let result = Lz4BlockCodec::new().decompress_block(&bogus, &mut out);
        assert!(matches!(result, Err(CompressionError::CodecProcessFailed { .. })), "got {result:?}");
    }

    #[test]
    fn too_small_output_is_reported() {
        let input = vec![b'z'; 1000];
        let compressed = Lz4BlockCodec::new().compress_block(&input).unwrap();
        let mut out = vec![0u8; 100];
        let result = Lz4BlockCodec::new().decompress_block(&compressed, &mut out);
        assert!(result.is_err());
    }
}
