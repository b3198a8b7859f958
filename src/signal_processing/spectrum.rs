//! Whole-buffer FFT helpers
//!
//! Every transform covers the full input in one pass; there is no
//! blockwise or windowed analysis here.

use num_complex::Complex32;
use rustfft::FftPlanner;

/// Forward DFT of a real signal
pub fn forward_fft(samples: &[f32]) -> Vec<Complex32> {
    let mut spectrum: Vec<Complex32> = samples.iter().map(|&s| Complex32::new(s, 0.0)).collect();
    if spectrum.is_empty() {
        return spectrum;
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(spectrum.len());
    fft.process(&mut spectrum);
    spectrum
}

/// Inverse DFT, normalized by `1/n` so that `inverse_fft(forward_fft(x)) == x`
pub fn inverse_fft(mut spectrum: Vec<Complex32>) -> Vec<Complex32> {
    let n = spectrum.len();
    if n == 0 {
        return spectrum;
    }

    let mut planner = FftPlanner::new();
    let ifft = planner.plan_fft_inverse(n);
    ifft.process(&mut spectrum);

    let scale = 1.0 / n as f32;
    for bin in spectrum.iter_mut() {
        *bin *= scale;
    }
    spectrum
}

pub fn magnitudes(spectrum: &[Complex32]) -> Vec<f32> {
    spectrum.iter().map(|c| c.norm()).collect()
}

/// Center frequency of every bin in standard DFT order
///
/// `freq[i] = i * rate / n` for the lower half; the upper half wraps to
/// negative frequencies, e.g. n = 8 gives `[0, 1, 2, 3, -4, -3, -2, -1] * rate / 8`.
pub fn fft_frequencies(n: usize, sample_rate: u32) -> Vec<f64> {
    let spacing = sample_rate as f64 / n as f64;
    let positive = n.div_ceil(2);
    (0..n)
        .map(|i| {
            if i < positive {
                i as f64 * spacing
            } else {
                (i as f64 - n as f64) * spacing
            }
        })
        .collect()
}

/// Frequency of the strongest non-DC bin in the positive half, if any
pub fn dominant_frequency(samples: &[f32], sample_rate: u32) -> Option<f64> {
    let n = samples.len();
    if n < 2 {
        return None;
    }

    let spectrum = forward_fft(samples);
    let positive = n.div_ceil(2);
    let (bin, magnitude) = spectrum[1..positive]
        .iter()
        .enumerate()
        .map(|(i, c)| (i + 1, c.norm()))
        .max_by(|a, b| a.1.total_cmp(&b.1))?;

    if magnitude <= f32::EPSILON {
        return None;
    }
    Some(bin as f64 * sample_rate as f64 / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_fft_frequencies_even() {
        let freqs = fft_frequencies(8, 8);
        assert_eq!(freqs, vec![0.0, 1.0, 2.0, 3.0, -4.0, -3.0, -2.0, -1.0]);
    }

    #[test]
    fn test_fft_frequencies_odd() {
        let freqs = fft_frequencies(5, 5);
        assert_eq!(freqs, vec![0.0, 1.0, 2.0, -2.0, -1.0]);
    }

    #[test]
    fn test_inverse_restores_signal() {
        let signal: Vec<f32> = (0..100).map(|i| (i as f32 * 0.37).sin()).collect();
        let restored = inverse_fft(forward_fft(&signal));
        for (a, b) in signal.iter().zip(&restored) {
            assert!((a - b.re).abs() < 1e-5);
            assert!(b.im.abs() < 1e-5);
        }
    }

    #[test]
    fn test_dominant_frequency_of_tone() {
        let rate = 8000;
        let tone: Vec<f32> = (0..rate)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / rate as f32).sin())
            .collect();
        let dominant = dominant_frequency(&tone, rate as u32).unwrap();
        assert!((dominant - 440.0).abs() < 1.0);
    }

    #[test]
    fn test_dominant_frequency_of_silence() {
        assert_eq!(dominant_frequency(&[0.0; 64], 8000), None);
        assert_eq!(dominant_frequency(&[0.5], 8000), None);
    }
}
