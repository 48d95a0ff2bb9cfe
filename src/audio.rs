use crate::pcm::decode_le;
use crate::playback::PcmSink;
use anyhow::Context;
use hound::WavReader;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};
use std::path::Path;
use tracing::debug;

/// Default output device. The stream must stay alive for as long as the sink plays.
pub struct Speaker {
    _stream: OutputStream,
    sink: Sink,
    sample_rate: u32,
    channels: u16,
}

impl Speaker {
    pub fn open(sample_rate: u32, channels: u16) -> anyhow::Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("error initializing audio output")?;
        let sink = Sink::try_new(&handle).context("error creating audio player")?;
        debug!("Opened default audio output at {} Hz, {} ch", sample_rate, channels);
        Ok(Self {
            _stream: stream,
            sink,
            sample_rate,
            channels,
        })
    }
}

impl PcmSink for Speaker {
    fn write_pcm(&mut self, pcm: &[u8]) -> anyhow::Result<()> {
        let samples = decode_le(pcm);
        self.sink
            .append(SamplesBuffer::new(self.channels, self.sample_rate, samples));
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.sink.sleep_until_end();
        Ok(())
    }
}

/// Length of a written WAV, read back from its header.
pub fn wav_duration_seconds(path: &Path) -> anyhow::Result<f64> {
    let reader = WavReader::open(path)
        .with_context(|| format!("error reading back {}", path.display()))?;
    let spec = reader.spec();
    let frames = reader.duration();
    Ok(frames as f64 / spec.sample_rate as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::WavWriter;
    use std::fs::File;

    #[test]
    fn duration_of_written_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one_second.wav");

        let mut writer = WavWriter::new(File::create(&path).unwrap(), 8000, 2).unwrap();
        writer.write_packet(&vec![0u8; 8000 * 2 * 2]).unwrap();
        writer.finalize().unwrap();
        drop(writer);

        let secs = wav_duration_seconds(&path).unwrap();
        assert!((secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn duration_of_missing_file_is_error() {
        assert!(wav_duration_seconds(Path::new("/nonexistent/ttsplay.wav")).is_err());
    }
}
