//! WAV encoding and decoding
//!
//! Integer PCM of any depth up to 32 bits is rescaled to 16 bits; float PCM
//! is clamped to [-1, 1] and scaled.

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use super::segment::{AudioFormat, AudioSegment};

fn to_i16_from_int(sample: i32, bits: u16) -> i16 {
    match bits {
        0..=16 => (sample << (16 - bits)) as i16,
        _ => (sample >> (bits - 16)) as i16,
    }
}

fn to_i16_from_float(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16
}

/// Decode WAV data from any reader
pub fn decode_wav<R: Read>(reader: R) -> Result<AudioSegment, hound::Error> {
    let reader = hound::WavReader::new(reader)?;
    let spec = reader.spec();
    let format = AudioFormat::new(spec.sample_rate, spec.channels);

    let samples = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| to_i16_from_int(v, spec.bits_per_sample)))
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(to_i16_from_float))
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(AudioSegment::from_samples(format, samples))
}

pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<AudioSegment, hound::Error> {
    let file = std::fs::File::open(path)?;
    decode_wav(std::io::BufReader::new(file))
}

fn wav_spec(format: AudioFormat) -> hound::WavSpec {
    hound::WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Encode as 16-bit PCM WAV into any seekable writer
pub fn encode_wav<W: Write + Seek>(segment: &AudioSegment, writer: W) -> Result<(), hound::Error> {
    let mut wav = hound::WavWriter::new(writer, wav_spec(segment.format()))?;
    for &sample in segment.samples() {
        wav.write_sample(sample)?;
    }
    wav.finalize()
}

pub fn write_wav<P: AsRef<Path>>(segment: &AudioSegment, path: P) -> Result<(), hound::Error> {
    let mut wav = hound::WavWriter::create(path, wav_spec(segment.format()))?;
    for &sample in segment.samples() {
        wav.write_sample(sample)?;
    }
    wav.finalize()
}

/// Complete WAV file image in memory
pub fn wav_bytes(segment: &AudioSegment) -> Result<Vec<u8>, hound::Error> {
    let mut cursor = Cursor::new(Vec::new());
    encode_wav(segment, &mut cursor)?;
    Ok(cursor.into_inner())
}
