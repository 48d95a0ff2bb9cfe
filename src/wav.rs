use anyhow::Context;
use std::io::{Seek, SeekFrom, Write};

pub const HEADER_LEN: usize = 44;
const BITS_PER_SAMPLE: u16 = 16;
const RIFF_SIZE_OFFSET: u64 = 4;
const DATA_SIZE_OFFSET: u64 = 40;

/// Writes a 16-bit PCM header with both size fields left at zero.
pub fn write_wav_header<W: Write>(
    w: &mut W,
    sample_rate: u32,
    channels: u16,
) -> anyhow::Result<()> {
    let block_align = channels * (BITS_PER_SAMPLE / 8);
    let byte_rate = sample_rate * block_align as u32;

    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(b"RIFF");
    // 4..8 riff size, patched later
    header[8..12].copy_from_slice(b"WAVE");
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes()); // fmt chunk size
    header[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    header[36..40].copy_from_slice(b"data");
    // 40..44 data size, patched later

    w.write_all(&header).context("error writing WAV header")?;
    Ok(())
}

/// Fills in the RIFF and data chunk sizes once the payload length is known.
pub fn patch_wav_header<W: Write + Seek>(w: &mut W, data_len: u32) -> anyhow::Result<()> {
    let riff_size = data_len
        .checked_add(36)
        .context("WAV payload too large")?;

    w.seek(SeekFrom::Start(RIFF_SIZE_OFFSET))?;
    w.write_all(&riff_size.to_le_bytes())?;
    w.seek(SeekFrom::Start(DATA_SIZE_OFFSET))?;
    w.write_all(&data_len.to_le_bytes())?;
    w.seek(SeekFrom::End(0))?;
    w.flush()?;
    Ok(())
}

/// Streams PCM after a placeholder header and patches the sizes on `finalize`.
pub struct WavWriter<W: Write + Seek> {
    writer: W,
    written_bytes: u64,
}

impl<W: Write + Seek> WavWriter<W> {
    pub fn new(mut writer: W, sample_rate: u32, channels: u16) -> anyhow::Result<Self> {
        write_wav_header(&mut writer, sample_rate, channels)?;
        Ok(Self {
            writer,
            written_bytes: 0,
        })
    }

    pub fn write_packet(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(data)?;
        self.written_bytes += data.len() as u64;
        Ok(())
    }

    pub fn finalize(&mut self) -> anyhow::Result<()> {
        let data_len = u32::try_from(self.written_bytes).with_context(|| {
            format!("WAV payload of {} bytes exceeds format limit", self.written_bytes)
        })?;
        patch_wav_header(&mut self.writer, data_len).context("error updating WAV header")
    }
}
