//! Chart data for the time and frequency views.
//!
//! Both builders are pure: they read a [`SampleBuffer`] and return a
//! [`Chart`] holding every point at full resolution. Front ends decide how to
//! draw it; the GUI feeds the series to egui_plot and the CLI dumps them as CSV.

use std::io::Write;

use crate::audio::SampleBuffer;
use crate::config::PlotConfig;
use crate::signal_processing::{fft_frequencies, forward_fft, magnitudes};

/// One named line of `[x, y]` points
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Visible x range. Points outside it stay in `series`.
    pub x_range: Option<(f64, f64)>,
    pub series: Vec<Series>,
}

impl Chart {
    /// Points of `series` that fall inside the visible x range
    pub fn visible_points(&self, series: &Series) -> Vec<[f64; 2]> {
        match self.x_range {
            Some((lo, hi)) => series
                .points
                .iter()
                .copied()
                .filter(|p| p[0] >= lo && p[0] <= hi)
                .collect(),
            None => series.points.clone(),
        }
    }

    /// Smallest and largest y over all series, if there are any points
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p[1]))
            .fold(None, |acc, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
    }

    /// Write every point as `series,x,y` rows
    pub fn write_csv<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        writeln!(out, "series,{},{}", self.x_label, self.y_label)?;
        for series in &self.series {
            for [x, y] in &series.points {
                writeln!(out, "{},{},{}", series.name, x, y)?;
            }
        }
        Ok(())
    }
}

fn series_name(buffer: &SampleBuffer, channel: usize) -> String {
    if buffer.channels() == 1 {
        "Amplitude".to_string()
    } else {
        format!("Channel {}", channel + 1)
    }
}

/// Amplitude against elapsed time
///
/// x runs evenly from 0 to `frames / sample_rate` inclusive, y is the raw sample.
pub fn time_domain_chart(buffer: &SampleBuffer) -> Chart {
    let frames = buffer.frames();
    let duration = buffer.duration_secs();
    let step = if frames > 1 {
        duration / (frames - 1) as f64
    } else {
        0.0
    };

    let series = (0..buffer.channels() as usize)
        .map(|c| Series {
            name: series_name(buffer, c),
            points: buffer
                .channel(c)
                .iter()
                .enumerate()
                .map(|(i, &s)| [i as f64 * step, s as f64])
                .collect(),
        })
        .collect();

    Chart {
        title: "Time Domain".to_string(),
        x_label: "Time (s)".to_string(),
        y_label: "Amplitude".to_string(),
        x_range: None,
        series,
    }
}

/// Magnitude spectrum against frequency
///
/// Points follow DFT bin order, so negative frequencies appear after the
/// positive half. Only `[freq_display_min_hz, freq_display_max_hz]` is visible.
pub fn frequency_domain_chart(buffer: &SampleBuffer, config: &PlotConfig) -> Chart {
    let freqs = fft_frequencies(buffer.frames(), buffer.sample_rate());

    let series = (0..buffer.channels() as usize)
        .map(|c| {
            let mags = magnitudes(&forward_fft(&buffer.channel(c)));
            Series {
                name: series_name(buffer, c),
                points: freqs
                    .iter()
                    .zip(&mags)
                    .map(|(&f, &m)| [f, m as f64])
                    .collect(),
            }
        })
        .collect();

    Chart {
        title: "Frequency Domain".to_string(),
        x_label: "Frequency (Hz)".to_string(),
        y_label: "Amplitude".to_string(),
        x_range: Some((config.freq_display_min_hz, config.freq_display_max_hz)),
        series,
    }
}
