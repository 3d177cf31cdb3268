/// Functions for computing content fingerprints of raw bytes
use crate::error::Result;
use crate::types::ByteSource;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use std::io::{self, BufReader, Read, Write};

use super::types::{ContentFingerprint, HashAlgorithm};

/// Read buffer size for incremental hashing
const CHUNK_SIZE: usize = 8192; // 8KB buffer

/// Compute the content fingerprint of everything `reader` yields.
///
/// The reader is consumed in fixed-size chunks, so memory use does not
/// depend on the size of the input.
pub fn compute_content_fingerprint<R: Read>(
    reader: R,
    algorithm: HashAlgorithm,
) -> Result<ContentFingerprint> {
    match algorithm {
        HashAlgorithm::Md5 => digest_reader::<Md5, _>(reader),
        HashAlgorithm::Sha1 => digest_reader::<Sha1, _>(reader),
        HashAlgorithm::Sha256 => digest_reader::<Sha256, _>(reader),
        HashAlgorithm::Blake3 => blake3_reader(reader),
    }
}

/// Open `source` and fingerprint its bytes
pub fn content_fingerprint_from_source<S: ByteSource + ?Sized>(
    source: &S,
    algorithm: HashAlgorithm,
) -> Result<ContentFingerprint> {
    let reader = source.open()?;
    compute_content_fingerprint(reader, algorithm)
}

/// Stream `reader` into `hasher` through a `CHUNK_SIZE` buffer
fn feed<R: Read, W: Write>(reader: R, hasher: &mut W) -> Result<()> {
    let mut chunks = BufReader::with_capacity(CHUNK_SIZE, reader);
    io::copy(&mut chunks, hasher)?;
    Ok(())
}

fn digest_reader<D: Digest + Write, R: Read>(reader: R) -> Result<ContentFingerprint> {
    let mut hasher = D::new();
    feed(reader, &mut hasher)?;
    Ok(ContentFingerprint::from_digest(&hasher.finalize()))
}

fn blake3_reader<R: Read>(reader: R) -> Result<ContentFingerprint> {
    let mut hasher = blake3::Hasher::new();
    feed(reader, &mut hasher)?;
    Ok(ContentFingerprint::from_digest(hasher.finalize().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io;

    /// Yields a few bytes, then fails
    struct TruncatedReader {
        remaining: usize,
    }

    impl Read for TruncatedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"));
            }
            let n = self.remaining.min(buf.len());
            buf[..n].fill(0xAA);
            self.remaining -= n;
            Ok(n)
        }
    }

    /// Interrupts every other read
    struct InterruptingReader<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for InterruptingReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let data: Vec<u8> = (0..(CHUNK_SIZE * 2 + 5)).map(|i| (i % 7) as u8).collect();
        for algorithm in [HashAlgorithm::Md5, HashAlgorithm::Blake3] {
            let reader = InterruptingReader {
                data: &data,
                interrupt: false,
            };
            let streamed = compute_content_fingerprint(reader, algorithm).unwrap();
            let direct = compute_content_fingerprint(&data[..], algorithm).unwrap();
            assert_eq!(streamed, direct);
        }
    }

    #[test]
    fn test_known_digests() {
        let input: &[u8] = b"abc";
        let md5 = compute_content_fingerprint(input, HashAlgorithm::Md5).unwrap();
        let sha1 = compute_content_fingerprint(input, HashAlgorithm::Sha1).unwrap();
        let sha256 = compute_content_fingerprint(input, HashAlgorithm::Sha256).unwrap();

        assert_eq!(md5.as_str(), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(sha1.as_str(), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(
            sha256.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_blake3_matches_one_shot_hash() {
        let input: &[u8] = b"abc";
        let fp = compute_content_fingerprint(input, HashAlgorithm::Blake3).unwrap();
        assert_eq!(fp.as_str(), blake3::hash(input).to_hex().as_str());
    }

    #[test]
    fn test_fingerprint_length_per_algorithm() {
        for algorithm in [
            HashAlgorithm::Md5,
            HashAlgorithm::Sha1,
            HashAlgorithm::Sha256,
            HashAlgorithm::Blake3,
        ] {
            let fp = compute_content_fingerprint(&b"x"[..], algorithm).unwrap();
            assert_eq!(fp.as_str().len(), algorithm.hex_len());
        }
    }

    #[test]
    fn test_chunked_read_matches_single_buffer() {
        // Spans several chunks with a partial tail
        let data: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        let streamed = content_fingerprint_from_source(&data, HashAlgorithm::Sha256).unwrap();

        let expected = ContentFingerprint::from_digest(&Sha256::digest(&data));
        assert_eq!(streamed, expected);
    }

    #[test]
    fn test_single_byte_change_changes_fingerprint() {
        let a = vec![0u8; 1024];
        let mut b = a.clone();
        b[512] = 1;

        let fa = content_fingerprint_from_source(&a, HashAlgorithm::Md5).unwrap();
        let fb = content_fingerprint_from_source(&b, HashAlgorithm::Md5).unwrap();
        assert_ne!(fa, fb);
    }

    #[test]
    fn test_truncated_stream_is_io_error() {
        let reader = TruncatedReader { remaining: 100 };
        let result = compute_content_fingerprint(reader, HashAlgorithm::Sha1);
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
