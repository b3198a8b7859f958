use crate::audio::SampleBuffer;
use crate::config::MaskMode;
use crate::error::{FilterError, Result};

use super::spectrum::{forward_fft, inverse_fft};

/// Index of the first bin removed by the mask: `floor(cutoff * n / rate)`,
/// clamped to `[0, n]`.
///
/// A cutoff at or below zero gives 0 (everything removed), a cutoff at or above
/// the sample rate gives `n` (nothing removed).
pub fn cutoff_bin(n: usize, sample_rate: u32, cutoff_hz: f64) -> Result<usize> {
    if sample_rate == 0 {
        return Err(FilterError::InvalidParameter(
            "sample rate must be positive".into(),
        ));
    }
    if cutoff_hz.is_nan() {
        return Err(FilterError::InvalidParameter("cutoff is NaN".into()));
    }

    let k = (cutoff_hz * n as f64 / sample_rate as f64).floor();
    if k <= 0.0 {
        Ok(0)
    } else if k >= n as f64 {
        Ok(n)
    } else {
        Ok(k as usize)
    }
}

/// Binary keep/zero mask over `n` bins
pub fn lowpass_mask(n: usize, k: usize, mode: MaskMode) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let keep = match mode {
                MaskMode::BinIndex => i < k,
                // bin n - i mirrors bin i for real input
                MaskMode::Symmetric => i < k || (k > 0 && i > n - k),
            };
            if keep { 1.0 } else { 0.0 }
        })
        .collect()
}

/// Low-pass one channel by masking its full-length spectrum
///
/// The transition is a hard step, so sharp content near the cutoff rings.
/// Output has the same length as `samples`; only the real part of the
/// inverse transform is kept.
pub fn lowpass(
    samples: &[f32],
    sample_rate: u32,
    cutoff_hz: f64,
    mode: MaskMode,
) -> Result<Vec<f32>> {
    let n = samples.len();
    let k = cutoff_bin(n, sample_rate, cutoff_hz)?;

    if k == 0 && n > 0 {
        log::warn!("Cutoff {} Hz removes every bin; output is silent", cutoff_hz);
    }
    log::debug!(
        "Low-pass {} samples at {} Hz: cutoff {} Hz -> bin {} ({:?})",
        n,
        sample_rate,
        cutoff_hz,
        k,
        mode
    );

    let mask = lowpass_mask(n, k, mode);
    let mut spectrum = forward_fft(samples);
    for (bin, gain) in spectrum.iter_mut().zip(&mask) {
        *bin *= *gain;
    }

    Ok(inverse_fft(spectrum).into_iter().map(|c| c.re).collect())
}

/// FFT mask low-pass applied to each channel of a buffer independently
#[derive(Debug, Clone, Copy)]
pub struct SpectralLowpass {
    cutoff_hz: f64,
    mode: MaskMode,
}

impl SpectralLowpass {
    pub fn new(cutoff_hz: f64, mode: MaskMode) -> Result<Self> {
        if cutoff_hz.is_nan() {
            return Err(FilterError::InvalidParameter("cutoff is NaN".into()));
        }
        Ok(Self { cutoff_hz, mode })
    }

    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }

    pub fn mode(&self) -> MaskMode {
        self.mode
    }

    /// Bin index where the mask starts zeroing for a buffer of `frames` frames
    pub fn cutoff_bin_for(&self, buffer: &SampleBuffer) -> Result<usize> {
        cutoff_bin(buffer.frames(), buffer.sample_rate(), self.cutoff_hz)
    }

    pub fn apply(&self, buffer: &SampleBuffer) -> Result<SampleBuffer> {
        buffer.map_channels(|channel| {
            lowpass(channel, buffer.sample_rate(), self.cutoff_hz, self.mode)
        })
    }
}

/// Convenience wrapper for a single filter pass
pub fn filter_buffer(
    buffer: &SampleBuffer,
    cutoff_hz: f64,
    mode: MaskMode,
) -> Result<SampleBuffer> {
    SpectralLowpass::new(cutoff_hz, mode)?.apply(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cutoff_bin_floor() {
        assert_eq!(cutoff_bin(8000, 8000, 1000.0).unwrap(), 1000);
        assert_eq!(cutoff_bin(1000, 44100, 300.0).unwrap(), 6);
        assert_eq!(cutoff_bin(10, 8000, 799.0).unwrap(), 0);
    }

    #[test]
    fn test_cutoff_bin_clamps() {
        assert_eq!(cutoff_bin(100, 8000, 0.0).unwrap(), 0);
        assert_eq!(cutoff_bin(100, 8000, -500.0).unwrap(), 0);
        assert_eq!(cutoff_bin(100, 8000, 8000.0).unwrap(), 100);
        assert_eq!(cutoff_bin(100, 8000, f64::INFINITY).unwrap(), 100);
    }

    #[test]
    fn test_cutoff_bin_rejects_bad_parameters() {
        assert!(matches!(
            cutoff_bin(100, 0, 1000.0),
            Err(FilterError::InvalidParameter(_))
        ));
        assert!(cutoff_bin(100, 8000, f64::NAN).is_err());
        assert!(SpectralLowpass::new(f64::NAN, MaskMode::BinIndex).is_err());
    }

    #[test]
    fn test_bin_index_mask_zeroes_upper_tail() {
        let mask = lowpass_mask(8, 3, MaskMode::BinIndex);
        assert_eq!(mask, vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

        // k past the middle still zeroes the tail of the mirrored half
        let mask = lowpass_mask(8, 6, MaskMode::BinIndex);
        assert_eq!(mask, vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_symmetric_mask_mirrors_band() {
        let mask = lowpass_mask(8, 3, MaskMode::Symmetric);
        assert_eq!(mask, vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0]);
        assert_eq!(lowpass_mask(8, 0, MaskMode::Symmetric), vec![0.0; 8]);
        assert_eq!(lowpass_mask(8, 5, MaskMode::Symmetric), vec![1.0; 8]);
    }

    #[test]
    fn test_dc_passes_bin_index_mask() {
        let out = lowpass(&[0.25; 32], 8000, 300.0, MaskMode::BinIndex).unwrap();
        for s in out {
            assert_abs_diff_eq!(s, 0.25, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_single_sample_buffer() {
        let out = lowpass(&[0.5], 8000, 1000.0, MaskMode::BinIndex).unwrap();
        assert_eq!(out.len(), 1);
        assert_abs_diff_eq!(out[0], 0.0, epsilon = 1e-6);

        let out = lowpass(&[0.5], 8000, 8000.0, MaskMode::BinIndex).unwrap();
        assert_abs_diff_eq!(out[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_apply_filters_each_channel() {
        let frames = 64;
        let left = vec![0.5_f32; frames];
        let right: Vec<f32> = (0..frames)
            .map(|i| if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        let buffer = SampleBuffer::from_channels(&[left, right], 8000).unwrap();

        // 1000 Hz at 8 kHz keeps bins below 8; the alternating channel lives at bin 32
        let filtered = filter_buffer(&buffer, 1000.0, MaskMode::BinIndex).unwrap();
        assert_eq!(filtered.channels(), 2);
        assert_eq!(filtered.frames(), frames);
        for s in filtered.channel(0) {
            assert_abs_diff_eq!(s, 0.5, epsilon = 1e-5);
        }
        for s in filtered.channel(1) {
            assert_abs_diff_eq!(s, 0.0, epsilon = 1e-5);
        }
    }
}
