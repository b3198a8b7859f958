use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::SampleBuffer;
use crate::error::{FilterError, Result};

/// Read position into the buffer currently being played
#[derive(Debug, Default)]
struct PlaybackCursor {
    samples: Vec<f32>,
    channels: usize,
    frame: usize,
}

impl PlaybackCursor {
    fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }

    /// Fill one interleaved output block. Output channels beyond the source
    /// wrap around, so mono plays on every speaker.
    fn fill(&mut self, out: &mut [f32], out_channels: usize) {
        for frame in out.chunks_mut(out_channels) {
            if self.frame >= self.frames() {
                frame.fill(0.0);
                continue;
            }
            let base = self.frame * self.channels;
            for (ch, sample) in frame.iter_mut().enumerate() {
                *sample = self.samples[base + ch % self.channels];
            }
            self.frame += 1;
        }
    }
}

/// The buffer's own rate when one of the device's f32 ranges covers it,
/// otherwise the device default
fn output_rate(supported: &[(u32, u32)], wanted: u32, fallback: u32) -> u32 {
    if supported.iter().any(|&(lo, hi)| (lo..=hi).contains(&wanted)) {
        wanted
    } else {
        fallback
    }
}

/// Linear interpolation of interleaved samples from one rate to another
fn resample_linear(samples: &[f32], channels: usize, from: u32, to: u32) -> Vec<f32> {
    if channels == 0 || from == 0 || to == 0 || from == to {
        return samples.to_vec();
    }
    let frames = samples.len() / channels;
    if frames == 0 {
        return Vec::new();
    }

    let out_frames = ((frames as u64 * to as u64) / from as u64).max(1) as usize;
    let step = from as f64 / to as f64;
    let mut out = Vec::with_capacity(out_frames * channels);
    for i in 0..out_frames {
        let pos = i as f64 * step;
        let idx = (pos as usize).min(frames - 1);
        let next = (idx + 1).min(frames - 1);
        let frac = (pos - idx as f64).clamp(0.0, 1.0) as f32;
        for ch in 0..channels {
            let a = samples[idx * channels + ch];
            let b = samples[next * channels + ch];
            out.push(a + (b - a) * frac);
        }
    }
    out
}

/// Plays one [`SampleBuffer`] at a time on the default output device
pub struct Player {
    stream: Option<cpal::Stream>,
    cursor: Arc<Mutex<PlaybackCursor>>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            stream: None,
            cursor: Arc::new(Mutex::new(PlaybackCursor::default())),
        }
    }

    /// Start playing `buffer` from the beginning, replacing anything already playing
    pub fn play(&mut self, buffer: &SampleBuffer) -> Result<()> {
        self.stop();

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| FilterError::AudioDevice("No output device found".into()))?;

        match device.description() {
            Ok(desc) => log::info!("Output device: {:?}", desc),
            Err(_) => log::info!("Output device: Unknown"),
        }

        let default_config = device
            .default_output_config()
            .map_err(|e| FilterError::AudioDevice(format!("{}", e)))?;
        let out_channels = default_config.channels();

        let supported: Vec<(u32, u32)> = device
            .supported_output_configs()
            .map(|configs| {
                configs
                    .filter(|c| {
                        c.channels() == out_channels && c.sample_format() == cpal::SampleFormat::F32
                    })
                    .map(|c| (c.min_sample_rate(), c.max_sample_rate()))
                    .collect()
            })
            .unwrap_or_default();
        let out_rate = output_rate(&supported, buffer.sample_rate(), default_config.sample_rate());

        let samples = if out_rate == buffer.sample_rate() {
            buffer.samples().to_vec()
        } else {
            log::info!(
                "Device does not offer {} Hz, resampling to {} Hz",
                buffer.sample_rate(),
                out_rate
            );
            resample_linear(
                buffer.samples(),
                buffer.channels() as usize,
                buffer.sample_rate(),
                out_rate,
            )
        };

        {
            let mut cursor = self
                .cursor
                .lock()
                .map_err(|_| FilterError::AudioStream("playback state poisoned".into()))?;
            cursor.samples = samples;
            cursor.channels = buffer.channels() as usize;
            cursor.frame = 0;
        }

        let stream_config = cpal::StreamConfig {
            channels: out_channels,
            sample_rate: out_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        let cursor = Arc::clone(&self.cursor);
        let stride = out_channels as usize;
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| match cursor.lock() {
                    Ok(mut cursor) => cursor.fill(data, stride),
                    Err(_) => data.fill(0.0),
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| FilterError::AudioStream(format!("{}", e)))?;

        stream
            .play()
            .map_err(|e| FilterError::AudioStream(format!("{}", e)))?;

        log::debug!(
            "Playing {} frames at {} Hz on {} output channels",
            buffer.frames(),
            out_rate,
            out_channels
        );
        self.stream = Some(stream);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.pause();
        }
    }

    /// Fraction of the current buffer already played, while a stream is open
    pub fn progress(&self) -> Option<f32> {
        self.stream.as_ref()?;
        let cursor = self.cursor.lock().ok()?;
        let frames = cursor.frames();
        if frames == 0 {
            return None;
        }
        Some(cursor.frame as f32 / frames as f32)
    }

    pub fn is_playing(&self) -> bool {
        self.progress().is_some_and(|p| p < 1.0)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
    }
}
