//! Minimal RIFF/WAVE container for the raw PCM returned by the speech model.
//!
//! The model emits headerless 16-bit little-endian mono PCM at 24 kHz. We
//! prepend the canonical 44-byte header so the bytes play in any player.

use anyhow::Context;
use serde::Serialize;
use std::io::Cursor;

pub const HEADER_LEN: usize = 44;
pub const SAMPLE_RATE: u32 = 24_000;
pub const CHANNELS: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;

const FORMAT_PCM: u16 = 1;
const BLOCK_ALIGN: u16 = CHANNELS * (BITS_PER_SAMPLE / 8);
const BYTE_RATE: u32 = SAMPLE_RATE * BLOCK_ALIGN as u32;

pub fn wav_header(data_len: u32) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&data_len.saturating_add(36).to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&FORMAT_PCM.to_le_bytes());
    header[22..24].copy_from_slice(&CHANNELS.to_le_bytes());
    header[24..28].copy_from_slice(&SAMPLE_RATE.to_le_bytes());
    header[28..32].copy_from_slice(&BYTE_RATE.to_le_bytes());
    header[32..34].copy_from_slice(&BLOCK_ALIGN.to_le_bytes());
    header[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_len.to_le_bytes());
    header
}

/// Prepends the WAV header to raw PCM bytes.
pub fn wrap_pcm(pcm: &[u8]) -> Vec<u8> {
    // RIFF sizes are u32; model payloads are a few MB at most
    let data_len = u32::try_from(pcm.len()).unwrap_or(u32::MAX - 36);
    let mut wav = Vec::with_capacity(HEADER_LEN + pcm.len());
    wav.extend_from_slice(&wav_header(data_len));
    wav.extend_from_slice(pcm);
    wav
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WavInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub samples: u32,
    pub duration_secs: f64,
}

pub fn describe(wav: &[u8]) -> anyhow::Result<WavInfo> {
    let reader = hound::WavReader::new(Cursor::new(wav)).context("parse wav container")?;
    let spec = reader.spec();
    let samples = reader.duration();
    let duration_secs = if spec.sample_rate == 0 {
        0.0
    } else {
        samples as f64 / spec.sample_rate as f64
    };
    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        samples,
        duration_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn header_matches_canonical_layout() {
        let header = wav_header(1000);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(u32_at(&header, 4), 1036);
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");
        assert_eq!(u32_at(&header, 16), 16);
        assert_eq!(u16_at(&header, 20), 1);
        assert_eq!(u16_at(&header, 22), 1);
        assert_eq!(u32_at(&header, 24), 24_000);
        assert_eq!(u32_at(&header, 28), 48_000);
        assert_eq!(u16_at(&header, 32), 2);
        assert_eq!(u16_at(&header, 34), 16);
        assert_eq!(&header[36..40], b"data");
        assert_eq!(u32_at(&header, 40), 1000);
    }

    #[test]
    fn sizes_track_payload_length() {
        for len in [0usize, 1, 2, 3, 480, 48_000, 100_001] {
            let pcm = vec![0x7fu8; len];
            let wav = wrap_pcm(&pcm);
            assert_eq!(wav.len(), HEADER_LEN + len);
            assert_eq!(u32_at(&wav, 4), 36 + len as u32);
            assert_eq!(u32_at(&wav, 40), len as u32);
            assert_eq!(&wav[HEADER_LEN..], pcm.as_slice());
        }
    }

    #[test]
    fn empty_payload_still_has_header() {
        let wav = wrap_pcm(&[]);
        assert_eq!(wav.len(), HEADER_LEN);
        assert_eq!(u32_at(&wav, 4), 36);
    }

    #[test]
    fn hound_reads_wrapped_pcm() {
        let samples: Vec<i16> = (0..2400).map(|i| ((i % 200) as i16 - 100) * 50).collect();
        let pcm: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let wav = wrap_pcm(&pcm);

        let mut reader = hound::WavReader::new(Cursor::new(&wav)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);

        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn describe_reports_duration() {
        let pcm = vec![0u8; 48_000];
        let info = describe(&wrap_pcm(&pcm)).unwrap();
        assert_eq!(info.channels, 1);
        assert_eq!(info.sample_rate, 24_000);
        assert_eq!(info.samples, 24_000);
        assert!((info.duration_secs - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn describe_rejects_garbage() {
        assert!(describe(b"not a wav file").is_err());
    }
}
