//! PCM audio segments and WAV I/O

pub mod segment;
pub mod wav;

pub use segment::{AudioFormat, AudioSegment};
pub use wav::{decode_wav, encode_wav, read_wav, wav_bytes, write_wav};
