/// Bytes per 16-bit PCM sample.
pub const BYTES_PER_SAMPLE: usize = 2;

/// Scales a float sample to 16-bit PCM, truncating toward zero.
/// Input outside [-1, 1] clips to the nearest bound; NaN becomes silence.
pub fn sample_to_i16(sample: f64) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// Appends interleaved samples to `out` as little-endian 16-bit PCM.
pub fn encode_le(samples: &[f64], out: &mut Vec<u8>) {
    out.reserve(samples.len() * BYTES_PER_SAMPLE);
    for &s in samples {
        out.extend_from_slice(&sample_to_i16(s).to_le_bytes());
    }
}

/// Reads little-endian 16-bit PCM back into samples. A trailing odd byte is ignored.
pub fn decode_le(pcm: &[u8]) -> Vec<i16> {
    pcm.chunks_exact(BYTES_PER_SAMPLE)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scale_maps_to_32767() {
        assert_eq!(sample_to_i16(1.0), 32767);
        assert_eq!(sample_to_i16(-1.0), -32767);
        assert_eq!(sample_to_i16(0.0), 0);
    }

    #[test]
    fn truncates_instead_of_rounding() {
        // 0.5 * 32767 = 16383.5
        assert_eq!(sample_to_i16(0.5), 16383);
        assert_eq!(sample_to_i16(-0.5), -16383);
        assert_eq!(sample_to_i16(0.00002), 0);
    }

    #[test]
    fn out_of_range_clips() {
        assert_eq!(sample_to_i16(1.5), 32767);
        assert_eq!(sample_to_i16(-3.0), -32767);
        assert_eq!(sample_to_i16(f64::INFINITY), 32767);
        assert_eq!(sample_to_i16(f64::NAN), 0);
    }

    #[test]
    fn encodes_little_endian_interleaved() {
        let mut out = Vec::new();
        encode_le(&[1.0, -1.0, 0.0], &mut out);
        assert_eq!(out, vec![0xff, 0x7f, 0x01, 0x80, 0x00, 0x00]);
        assert_eq!(decode_le(&out), vec![32767, -32767, 0]);
    }
}
