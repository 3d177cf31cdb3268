/// Fingerprint types produced by the processing module
///
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Digest used for content fingerprints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha1,
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    /// Number of hex digits in a fingerprint produced by this algorithm
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Sha256 | HashAlgorithm::Blake3 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Md5 => write!(f, "md5"),
            HashAlgorithm::Sha1 => write!(f, "sha1"),
            HashAlgorithm::Sha256 => write!(f, "sha256"),
            HashAlgorithm::Blake3 => write!(f, "blake3"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(Error::Configuration(format!(
                "Unknown hash algorithm '{}', expected md5, sha1, sha256 or blake3",
                other
            ))),
        }
    }
}

/// Lowercase hex digest of the full byte content of one item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentFingerprint(String);

impl ContentFingerprint {
    pub(crate) fn from_digest(bytes: &[u8]) -> Self {
        ContentFingerprint(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A perceptual hash of `bit_len` bits.
///
/// Bit `i` is the i-th low-frequency coefficient in row-major order, stored
/// at `words[i / 64]`, position `i % 64`. The hex form reads the bits as one
/// big-endian number (bit 0 most significant), left-padded to whole digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PerceptualFingerprint {
    words: Vec<u64>,
    bit_len: usize,
}

impl PerceptualFingerprint {
    /// Pack a row-major bit sequence
    pub fn from_bits(bits: &[bool]) -> Self {
        let mut words = vec![0u64; bits.len().div_ceil(64)];
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                words[i / 64] |= 1u64 << (i % 64);
            }
        }
        Self {
            words,
            bit_len: bits.len(),
        }
    }

    /// Parse the hex form back into a fingerprint of `bit_len` bits
    pub fn from_hex(hex: &str, bit_len: usize) -> Result<Self> {
        let digits = bit_len.div_ceil(4);
        if hex.len() != digits {
            return Err(Error::Configuration(format!(
                "Expected {} hex digits for a {}-bit fingerprint, got {}",
                digits,
                bit_len,
                hex.len()
            )));
        }

        let padding = digits * 4 - bit_len;
        let mut bits = Vec::with_capacity(digits * 4);
        for c in hex.chars() {
            let value = c.to_digit(16).ok_or_else(|| {
                Error::Configuration(format!("Invalid hex digit '{}' in fingerprint", c))
            })?;
            for shift in (0..4).rev() {
                bits.push((value >> shift) & 1 == 1);
            }
        }

        if bits[..padding].iter().any(|&b| b) {
            return Err(Error::Configuration(format!(
                "Fingerprint '{}' has more than {} significant bits",
                hex, bit_len
            )));
        }

        Ok(Self::from_bits(&bits[padding..]))
    }

    /// Number of bits in the fingerprint
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Value of bit `index` (row-major position)
    pub fn bit(&self, index: usize) -> bool {
        index < self.bit_len && (self.words[index / 64] >> (index % 64)) & 1 == 1
    }

    pub(crate) fn words(&self) -> &[u64] {
        &self.words
    }

    /// Calculate the Hamming distance to another fingerprint
    pub fn distance(&self, other: &PerceptualFingerprint) -> u32 {
        super::distance::hamming_distance(self, other)
    }

    /// Check if two images are perceptually similar based on a threshold
    pub fn is_similar(&self, other: &PerceptualFingerprint, threshold: u32) -> bool {
        self.distance(other) <= threshold
    }

    /// Hex form, `ceil(bit_len / 4)` lowercase digits
    pub fn to_hex(&self) -> String {
        let digits = self.bit_len.div_ceil(4);
        let padding = digits * 4 - self.bit_len;

        let mut hex = String::with_capacity(digits);
        for digit in 0..digits {
            let mut value = 0u32;
            for offset in 0..4 {
                let padded_index = digit * 4 + offset;
                let set = padded_index >= padding && self.bit(padded_index - padding);
                value = (value << 1) | set as u32;
            }
            // value < 16 so the conversion cannot fail
            hex.push(std::char::from_digit(value, 16).unwrap_or('0'));
        }
        hex
    }
}

impl fmt::Display for PerceptualFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PerceptualFingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PerceptualFingerprint {
    /// Only square grids are serialized, so the bit length is recovered from
    /// the digit count as the largest square that fits.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        let bit_len = (crate::MIN_HASH_SIZE..=crate::MAX_HASH_SIZE)
            .map(|size| (size * size) as usize)
            .find(|bits| bits.div_ceil(4) == hex.len())
            .ok_or_else(|| {
                serde::de::Error::custom(format!("no hash size produces {} hex digits", hex.len()))
            })?;
        PerceptualFingerprint::from_hex(&hex, bit_len).map_err(serde::de::Error::custom)
    }
}
