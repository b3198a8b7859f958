//! Before/after summary of one filter pass.

use rolling_stats::Stats;
use serde::Serialize;

use crate::audio::SampleBuffer;
use crate::config::MaskMode;
use crate::error::Result;
use crate::signal_processing::{SpectralLowpass, dominant_frequency};

#[derive(Debug, Clone, Serialize)]
pub struct SignalStats {
    pub rms: f32,
    pub peak: f32,
    pub mean: f32,
    pub std_dev: f32,
    pub min: f32,
    pub max: f32,
    pub dominant_hz: Option<f64>,
}

impl SignalStats {
    pub fn from_samples(samples: &[f32], sample_rate: u32) -> Self {
        let mut stats: Stats<f32> = Stats::new();
        let mut sum_sq = 0.0_f64;
        for &s in samples {
            stats.update(s);
            sum_sq += (s as f64) * (s as f64);
        }

        let rms = if samples.is_empty() {
            0.0
        } else {
            (sum_sq / samples.len() as f64).sqrt() as f32
        };

        Self {
            rms,
            peak: stats.min.abs().max(stats.max.abs()),
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
            dominant_hz: dominant_frequency(samples, sample_rate),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelReport {
    pub channel: usize,
    pub original: SignalStats,
    pub filtered: SignalStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterReport {
    pub file: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: usize,
    pub duration_secs: f64,
    pub cutoff_hz: f64,
    pub cutoff_bin: usize,
    pub mask_mode: MaskMode,
    pub channel_reports: Vec<ChannelReport>,
}

impl FilterReport {
    pub fn new(
        file: impl Into<String>,
        original: &SampleBuffer,
        filtered: &SampleBuffer,
        filter: &SpectralLowpass,
    ) -> Result<Self> {
        let rate = original.sample_rate();
        let channel_reports = original
            .split_channels()
            .iter()
            .zip(filtered.split_channels().iter())
            .enumerate()
            .map(|(channel, (before, after))| ChannelReport {
                channel,
                original: SignalStats::from_samples(before, rate),
                filtered: SignalStats::from_samples(after, rate),
            })
            .collect();

        Ok(Self {
            file: file.into(),
            sample_rate: rate,
            channels: original.channels(),
            frames: original.frames(),
            duration_secs: original.duration_secs(),
            cutoff_hz: filter.cutoff_hz(),
            cutoff_bin: filter.cutoff_bin_for(original)?,
            mask_mode: filter.mode(),
            channel_reports,
        })
    }
}
