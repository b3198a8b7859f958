//! WAV decoding into [`SampleBuffer`] and encoding back into a container.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::audio::SampleBuffer;
use crate::config::ExportFormat;
use crate::error::{FilterError, Result};

/// Decode a complete WAV stream
///
/// Integer PCM is scaled to `[-1, 1)` by `2^(bits - 1)`; float samples are
/// taken as-is. The channel layout of the file is kept.
pub fn decode_wav<R: Read>(reader: R) -> Result<SampleBuffer> {
    let reader = WavReader::new(reader).map_err(|e| FilterError::Decode(e.to_string()))?;
    let spec = reader.spec();
    let samples = read_samples(reader, &spec)?;

    log::debug!(
        "Decoded {} samples: {} ch, {} Hz, {} bit {:?}",
        samples.len(),
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample,
        spec.sample_format
    );

    if samples.is_empty() {
        return Err(FilterError::Decode("file contains no samples".into()));
    }

    SampleBuffer::new(samples, spec.channels, spec.sample_rate)
        .map_err(|e| FilterError::Decode(e.to_string()))
}

/// Decode a WAV file held in memory (e.g. an upload)
pub fn decode_wav_bytes(bytes: &[u8]) -> Result<SampleBuffer> {
    decode_wav(Cursor::new(bytes))
}

pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<SampleBuffer> {
    let file = File::open(path.as_ref())?;
    let buffer = decode_wav(BufReader::new(file))?;
    log::info!(
        "Loaded {}: {} frames, {} ch, {} Hz",
        path.as_ref().display(),
        buffer.frames(),
        buffer.channels(),
        buffer.sample_rate()
    );
    Ok(buffer)
}

fn read_samples<R: Read>(mut reader: WavReader<R>, spec: &WavSpec) -> Result<Vec<f32>> {
    let decode_err = |e: hound::Error| FilterError::Decode(e.to_string());
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map_err(decode_err))
            .collect(),
        (SampleFormat::Int, bits @ 1..=32) => {
            let max_val = 2_f64.powi(bits as i32 - 1);
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v as f64 / max_val) as f32).map_err(decode_err))
                .collect()
        }
        (format, bits) => Err(FilterError::Decode(format!(
            "unsupported sample format: {} bit {:?}",
            bits, format
        ))),
    }
}

/// Write `buffer` as a WAV container into any seekable sink
pub fn write_wav<W: Write + Seek>(
    sink: W,
    buffer: &SampleBuffer,
    format: ExportFormat,
) -> Result<()> {
    let spec = format.spec(buffer.channels(), buffer.sample_rate());
    let mut writer = WavWriter::new(sink, spec).map_err(|e| FilterError::Encode(e.to_string()))?;

    let result = match format {
        ExportFormat::Pcm16 => buffer.samples().iter().try_for_each(|&sample| {
            let scaled = (sample * 32768.0).round().clamp(-32768.0, 32767.0) as i16;
            writer.write_sample(scaled)
        }),
        ExportFormat::Float32 => buffer
            .samples()
            .iter()
            .try_for_each(|&sample| writer.write_sample(sample)),
    };
    result.map_err(|e| FilterError::Encode(e.to_string()))?;

    writer
        .finalize()
        .map_err(|e| FilterError::Encode(e.to_string()))
}

/// Encode `buffer` into an in-memory WAV container ready for playback or download
pub fn encode_wav(buffer: &SampleBuffer, format: ExportFormat) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_wav(&mut cursor, buffer, format)?;
    Ok(cursor.into_inner())
}

pub fn save_wav<P: AsRef<Path>>(path: P, buffer: &SampleBuffer, format: ExportFormat) -> Result<()> {
    let file = std::io::BufWriter::new(File::create(path.as_ref())?);
    write_wav(file, buffer, format)?;
    log::info!(
        "Wrote {} ({} frames, {:?})",
        path.as_ref().display(),
        buffer.frames(),
        format
    );
    Ok(())
}
