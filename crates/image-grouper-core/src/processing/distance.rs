use super::types::PerceptualFingerprint;

/// Bit-level Hamming distance between two perceptual fingerprints.
///
/// Fingerprints of different bit lengths come from mismatched hash sizes and
/// cannot be compared position by position. In that case the longer bit
/// length is returned as the maximal distance.
pub fn hamming_distance(a: &PerceptualFingerprint, b: &PerceptualFingerprint) -> u32 {
    if a.bit_len() != b.bit_len() {
        return a.bit_len().max(b.bit_len()) as u32;
    }

    a.words()
        .iter()
        .zip(b.words())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum()
}
