use anyhow::Context;
use rodio::source::SamplesConverter;
use rodio::{Decoder, Source};
use std::io::Cursor;

/// Output is always interleaved L/R.
pub const OUTPUT_CHANNELS: u16 = 2;

/// Interleaved float samples with a fixed format.
pub trait SampleStream {
    fn sample_rate(&self) -> u32;
    fn channels(&self) -> u16;
    /// Fills `buf` with interleaved samples in [-1, 1] and returns how many
    /// were written. Zero means the stream is exhausted. A read may return
    /// fewer samples than requested, including a partial frame.
    fn read(&mut self, buf: &mut [f64]) -> usize;
}

/// Decoded speech, upmixed to stereo when the source is mono.
pub struct Mp3Stream {
    source: SamplesConverter<Decoder<Cursor<Vec<u8>>>, f32>,
    sample_rate: u32,
    source_channels: u16,
    // right-channel copy of the last mono sample
    pending: Option<f64>,
}

impl Mp3Stream {
    /// Decodes a fully buffered MP3 body.
    pub fn decode(data: Vec<u8>) -> anyhow::Result<Self> {
        let decoder = Decoder::new(Cursor::new(data)).context("error decoding MP3")?;
        let sample_rate = decoder.sample_rate();
        let source_channels = decoder.channels();
        if !(1..=OUTPUT_CHANNELS).contains(&source_channels) || sample_rate == 0 {
            anyhow::bail!(
                "unsupported decoded format ({} Hz, {} ch)",
                sample_rate,
                source_channels
            );
        }
        Ok(Self {
            source: decoder.convert_samples(),
            sample_rate,
            source_channels,
            pending: None,
        })
    }

    fn next_sample(&mut self) -> Option<f64> {
        if let Some(right) = self.pending.take() {
            return Some(right);
        }
        let s = self.source.next()? as f64;
        if self.source_channels == 1 {
            self.pending = Some(s);
        }
        Some(s)
    }
}

impl SampleStream for Mp3Stream {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        OUTPUT_CHANNELS
    }

    fn read(&mut self, buf: &mut [f64]) -> usize {
        let mut n = 0;
        for slot in buf.iter_mut() {
            match self.next_sample() {
                Some(s) => {
                    *slot = s;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }
}

/// 16-bit WAV of a square wave; rodio's decoder probes it like any other body.
#[cfg(test)]
pub(crate) fn square_wave_wav(sample_rate: u32, channels: u16, frames: usize) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..frames {
            let v: i16 = if (i / 50) % 2 == 0 { 8000 } else { -8000 };
            for _ in 0..channels {
                writer.write_sample(v).unwrap();
            }
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(stream: &mut Mp3Stream) -> Vec<f64> {
        let mut out = Vec::new();
        let mut buf = [0f64; 1000];
        loop {
            let n = stream.read(&mut buf);
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        out
    }

    #[test]
    fn mono_source_is_upmixed_to_stereo() {
        let mut stream = Mp3Stream::decode(square_wave_wav(22050, 1, 1234)).unwrap();
        assert_eq!(stream.sample_rate(), 22050);
        assert_eq!(stream.channels(), 2);

        let samples = drain(&mut stream);
        assert_eq!(samples.len(), 1234 * 2);
        for frame in samples.chunks_exact(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert!(samples[0] > 0.2);
        assert!(samples[100] < -0.2);
    }

    #[test]
    fn stereo_source_passes_through() {
        let mut stream = Mp3Stream::decode(square_wave_wav(24000, 2, 777)).unwrap();
        assert_eq!(stream.sample_rate(), 24000);
        assert_eq!(stream.channels(), 2);
        assert_eq!(drain(&mut stream).len(), 777 * 2);
    }

    #[test]
    fn upmix_survives_odd_sized_reads() {
        let mut stream = Mp3Stream::decode(square_wave_wav(8000, 1, 10)).unwrap();
        let mut buf = [0f64; 3];
        let mut total = 0;
        loop {
            let n = stream.read(&mut buf);
            if n == 0 {
                break;
            }
            total += n;
        }
        assert_eq!(total, 20);
    }

    #[test]
    fn rejects_non_audio_body() {
        let body = b"<html><body>internal error</body></html>".to_vec();
        assert!(Mp3Stream::decode(body).is_err());
    }

    #[test]
    fn rejects_empty_body() {
        assert!(Mp3Stream::decode(Vec::new()).is_err());
    }
}
