//! WAV reading and writing on top of `hound`.

use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::core::types::{AudioBuffer, Sample};
use crate::error::SineModelError;

/// Reads a WAV file from a byte slice.
///
/// Integer PCM of any bit depth is scaled to `[-1.0, 1.0)`; 32-bit float
/// samples are taken as they are.
pub fn read_wav(data: &[u8]) -> Result<AudioBuffer, SineModelError> {
    let reader = WavReader::new(Cursor::new(data))?;
    decode(reader)
}

/// Reads a WAV file from disk.
pub fn read_wav_file(path: impl AsRef<Path>) -> Result<AudioBuffer, SineModelError> {
    let path = path.as_ref();
    let reader = WavReader::open(path).map_err(|e| match e {
        hound::Error::IoError(io) => {
            SineModelError::IoError(format!("{}: {}", path.display(), io))
        }
        other => SineModelError::from(other),
    })?;
    decode(reader)
}

fn decode<R: std::io::Read>(reader: WavReader<R>) -> Result<AudioBuffer, SineModelError> {
    let spec = reader.spec();
    let data: Vec<Sample> = match spec.sample_format {
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(SineModelError::InvalidFormat(format!(
                    "unsupported bit depth: {}",
                    spec.bits_per_sample
                )));
            }
            let scale = (1u64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| (v as f64 / scale) as Sample))
                .collect::<Result<_, _>>()?
        }
        SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
    };
    AudioBuffer::new(data, spec.sample_rate, spec.channels)
}

fn spec_for(buffer: &AudioBuffer, bits_per_sample: u16, sample_format: SampleFormat) -> WavSpec {
    WavSpec {
        channels: buffer.channels,
        sample_rate: buffer.sample_rate,
        bits_per_sample,
        sample_format,
    }
}

/// Encodes an audio buffer as a 16-bit PCM WAV file. Samples are clamped to `[-1.0, 1.0]`.
pub fn write_wav_16bit(buffer: &AudioBuffer) -> Result<Vec<u8>, SineModelError> {
    let mut out = Vec::new();
    {
        let spec = spec_for(buffer, 16, SampleFormat::Int);
        let mut writer = WavWriter::new(Cursor::new(&mut out), spec)?;
        for &sample in &buffer.data {
            writer.write_sample(to_i16(sample))?;
        }
        writer.finalize()?;
    }
    Ok(out)
}

/// Encodes an audio buffer as a 32-bit float WAV file.
pub fn write_wav_float(buffer: &AudioBuffer) -> Result<Vec<u8>, SineModelError> {
    let mut out = Vec::new();
    {
        let spec = spec_for(buffer, 32, SampleFormat::Float);
        let mut writer = WavWriter::new(Cursor::new(&mut out), spec)?;
        for &sample in &buffer.data {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(out)
}

/// Writes a WAV file to disk (16-bit PCM).
pub fn write_wav_file_16bit(
    path: impl AsRef<Path>,
    buffer: &AudioBuffer,
) -> Result<(), SineModelError> {
    let data = write_wav_16bit(buffer)?;
    write_bytes(path.as_ref(), &data)
}

/// Writes a WAV file to disk (32-bit float).
pub fn write_wav_file_float(
    path: impl AsRef<Path>,
    buffer: &AudioBuffer,
) -> Result<(), SineModelError> {
    let data = write_wav_float(buffer)?;
    write_bytes(path.as_ref(), &data)
}

fn write_bytes(path: &Path, data: &[u8]) -> Result<(), SineModelError> {
    std::fs::write(path, data)
        .map_err(|e| SineModelError::IoError(format!("{}: {}", path.display(), e)))
}

#[inline]
fn to_i16(sample: Sample) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}
