use crate::audio::Speaker;
use crate::decode::{Mp3Stream, SampleStream};
use crate::pcm::{BYTES_PER_SAMPLE, encode_le};
use crate::wav::WavWriter;
use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::PathBuf;
use tracing::{debug, info};

pub const FRAMES_PER_CHUNK: usize = 4096;

/// Destination for 16-bit little-endian interleaved PCM.
pub trait PcmSink {
    fn write_pcm(&mut self, pcm: &[u8]) -> anyhow::Result<()>;

    /// Called once after the last chunk.
    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<W: Write + Seek> PcmSink for WavWriter<W> {
    fn write_pcm(&mut self, pcm: &[u8]) -> anyhow::Result<()> {
        self.write_packet(pcm)
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.finalize()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStats {
    pub frames: u64,
    pub bytes: u64,
}

pub struct PlaybackOptions {
    pub play: bool,
    pub output: Option<PathBuf>,
}

/// Drains `stream` in fixed-size chunks, handing every chunk to each sink in
/// turn. Sinks are finished only if the whole stream was written.
pub fn pump(
    stream: &mut dyn SampleStream,
    sinks: &mut [Box<dyn PcmSink>],
) -> anyhow::Result<PlaybackStats> {
    let channels = stream.channels() as usize;
    if channels == 0 {
        anyhow::bail!("sample stream has no channels");
    }

    let mut samples = vec![0f64; FRAMES_PER_CHUNK * channels];
    let mut pcm = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);
    let mut stats = PlaybackStats::default();

    // samples[..filled] holds data not yet written; always less than one frame between reads
    let mut filled = 0;
    loop {
        let n = stream.read(&mut samples[filled..]);
        if n == 0 {
            break;
        }
        filled += n;
        let whole = filled - filled % channels;
        if whole == 0 {
            continue;
        }

        pcm.clear();
        encode_le(&samples[..whole], &mut pcm);
        for sink in sinks.iter_mut() {
            sink.write_pcm(&pcm)?;
        }

        stats.frames += (whole / channels) as u64;
        stats.bytes += pcm.len() as u64;
        debug!("Wrote chunk of {} frames ({} total)", whole / channels, stats.frames);

        samples.copy_within(whole..filled, 0);
        filled -= whole;
    }
    if filled > 0 {
        debug!("Dropping {} trailing samples of a partial frame", filled);
    }

    for sink in sinks.iter_mut() {
        sink.finish()?;
    }
    Ok(stats)
}

/// Decodes an MP3 body and sends it to the speaker and/or a WAV file.
pub fn play_mp3(mp3: Vec<u8>, options: &PlaybackOptions) -> anyhow::Result<PlaybackStats> {
    let mut stream = Mp3Stream::decode(mp3)?;
    let (sample_rate, channels) = (stream.sample_rate(), stream.channels());
    info!("Decoded MP3: {} Hz, {} channel(s)", sample_rate, channels);

    let mut sinks: Vec<Box<dyn PcmSink>> = Vec::new();
    if options.play {
        sinks.push(Box::new(Speaker::open(sample_rate, channels)?));
    }
    if let Some(path) = &options.output {
        let file = File::create(path)
            .with_context(|| format!("error creating output file {}", path.display()))?;
        sinks.push(Box::new(WavWriter::new(
            BufWriter::new(file),
            sample_rate,
            channels,
        )?));
    }

    pump(&mut stream, &mut sinks).context("playback error")
}
