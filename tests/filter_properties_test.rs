use approx::assert_abs_diff_eq;

use wavfilter::SampleBuffer;
use wavfilter::config::{MaskMode, PlotConfig};
use wavfilter::plot::{frequency_domain_chart, time_domain_chart};
use wavfilter::signal_processing::{filter_buffer, lowpass};
use wavfilter::simulation::{Tone, multi_tone, sine_wave};

const RATE: u32 = 8000;

fn max_abs_diff(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}

fn rms(samples: &[f32]) -> f32 {
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

fn scaled(samples: &[f32], gain: f32) -> Vec<f32> {
    samples.iter().map(|s| s * gain).collect()
}

#[test]
fn test_output_length_matches_input() {
    for len in [1, 2, 7, 64, 1000, 4099] {
        let signal: Vec<f32> = (0..len).map(|i| ((i * 37 % 101) as f32 / 50.0) - 1.0).collect();
        for cutoff in [-10.0, 0.0, 300.0, 1000.0, 3999.0, 8000.0, 20000.0] {
            for mode in [MaskMode::BinIndex, MaskMode::Symmetric] {
                let out = lowpass(&signal, RATE, cutoff, mode).unwrap();
                assert_eq!(out.len(), len, "len {} cutoff {} {:?}", len, cutoff, mode);
                assert!(out.iter().all(|s| s.is_finite()));
            }
        }
    }
}

#[test]
fn test_zero_cutoff_silences_output() {
    let signal = multi_tone(&[Tone::new(300.0, 0.5), Tone::new(50.0, 0.3)], 0.5, RATE);
    for mode in [MaskMode::BinIndex, MaskMode::Symmetric] {
        let out = lowpass(&signal, RATE, 0.0, mode).unwrap();
        assert!(out.iter().all(|s| s.abs() < 1e-6), "{:?}", mode);
    }
}

#[test]
fn test_cutoff_at_sample_rate_passes_everything() {
    let signal = multi_tone(&[Tone::new(300.0, 0.5), Tone::new(3500.0, 0.3)], 0.5, RATE);
    for cutoff in [RATE as f64, 2.0 * RATE as f64] {
        let out = lowpass(&signal, RATE, cutoff, MaskMode::BinIndex).unwrap();
        assert!(max_abs_diff(&signal, &out) < 1e-4);
    }
}

#[test]
fn test_tone_above_cutoff_is_suppressed() {
    let tone = sine_wave(2000.0, 1.0, 1.0, RATE);
    for mode in [MaskMode::BinIndex, MaskMode::Symmetric] {
        let out = lowpass(&tone, RATE, 1000.0, mode).unwrap();
        assert!(rms(&out) < 1e-3 * rms(&tone), "{:?} rms {}", mode, rms(&out));
    }
}

#[test]
fn test_symmetric_mask_reproduces_tone_below_cutoff() {
    let tone = sine_wave(2000.0, 1.0, 1.0, RATE);
    let out = lowpass(&tone, RATE, 5000.0, MaskMode::Symmetric).unwrap();
    let relative = rms(
        &tone
            .iter()
            .zip(&out)
            .map(|(a, b)| a - b)
            .collect::<Vec<_>>(),
    ) / rms(&tone);
    assert!(relative < 1e-4, "relative error {}", relative);
}

#[test]
fn test_bin_index_mask_halves_tone_below_cutoff() {
    // k = 5000 keeps bin 2000 but zeroes its mirror at bin 6000, so only the
    // positive-frequency half of the tone survives
    let tone = sine_wave(2000.0, 1.0, 1.0, RATE);
    let out = lowpass(&tone, RATE, 5000.0, MaskMode::BinIndex).unwrap();
    assert!(max_abs_diff(&out, &scaled(&tone, 0.5)) < 1e-4);
}

#[test]
fn test_mixed_signal_keeps_low_component() {
    let low = sine_wave(300.0, 0.5, 1.0, RATE);
    let mixed = multi_tone(&[Tone::new(300.0, 0.5), Tone::new(2000.0, 0.4)], 1.0, RATE);

    let symmetric = lowpass(&mixed, RATE, 1000.0, MaskMode::Symmetric).unwrap();
    assert!(max_abs_diff(&symmetric, &low) < 1e-4);

    let bin_index = lowpass(&mixed, RATE, 1000.0, MaskMode::BinIndex).unwrap();
    assert!(max_abs_diff(&bin_index, &scaled(&low, 0.5)) < 1e-4);
}

#[test]
fn test_symmetric_second_pass_is_a_no_op() {
    let signal = multi_tone(
        &[Tone::new(120.0, 0.4), Tone::new(700.0, 0.3), Tone::new(2500.0, 0.2)],
        1.0,
        RATE,
    );
    for cutoff in [300.0, 500.0, 1000.0, 5000.0] {
        let once = lowpass(&signal, RATE, cutoff, MaskMode::Symmetric).unwrap();
        let twice = lowpass(&once, RATE, cutoff, MaskMode::Symmetric).unwrap();
        assert!(max_abs_diff(&once, &twice) < 1e-4, "cutoff {}", cutoff);
    }
}

#[test]
fn test_bin_index_second_pass_halves_again() {
    // below Nyquist the first pass leaves a symmetric spectrum whose mirror
    // half the second pass removes again
    let tone = sine_wave(500.0, 0.8, 1.0, RATE);
    let once = lowpass(&tone, RATE, 1000.0, MaskMode::BinIndex).unwrap();
    let twice = lowpass(&once, RATE, 1000.0, MaskMode::BinIndex).unwrap();
    assert!(max_abs_diff(&twice, &scaled(&once, 0.5)) < 1e-4);

    let passthrough = lowpass(&once, RATE, RATE as f64, MaskMode::BinIndex).unwrap();
    assert!(max_abs_diff(&passthrough, &once) < 1e-4);
}

#[test]
fn test_stereo_channels_are_filtered_independently() {
    let left = sine_wave(300.0, 0.5, 0.5, RATE);
    let right = sine_wave(3000.0, 0.5, 0.5, RATE);
    let buffer = SampleBuffer::from_channels(&[left.clone(), right], RATE).unwrap();

    let filtered = filter_buffer(&buffer, 1000.0, MaskMode::Symmetric).unwrap();
    assert_eq!(filtered.channels(), 2);
    assert_eq!(filtered.frames(), buffer.frames());
    assert_eq!(filtered.sample_rate(), RATE);
    assert!(max_abs_diff(&filtered.channel(0), &left) < 1e-4);
    assert!(rms(&filtered.channel(1)) < 1e-4);
}

#[test]
fn test_plotters_leave_input_untouched() {
    let buffer = SampleBuffer::mono(sine_wave(440.0, 0.7, 0.25, RATE), RATE).unwrap();
    let before = buffer.clone();

    let time = time_domain_chart(&buffer);
    let freq = frequency_domain_chart(&buffer, &PlotConfig::default());

    assert_eq!(buffer, before);
    assert_eq!(time.series[0].points.len(), buffer.frames());
    assert_eq!(freq.series[0].points.len(), buffer.frames());
}

#[test]
fn test_frequency_chart_peaks_at_tone() {
    let buffer = SampleBuffer::mono(sine_wave(1000.0, 1.0, 1.0, RATE), RATE).unwrap();
    let chart = frequency_domain_chart(&buffer, &PlotConfig::default());

    let peak = chart
        .visible_points(&chart.series[0])
        .into_iter()
        .max_by(|a, b| a[1].total_cmp(&b[1]))
        .unwrap();
    assert_abs_diff_eq!(peak[0], 1000.0, epsilon = 1e-9);
    // |X[k]| of a unit sine over n samples is n / 2
    assert_abs_diff_eq!(peak[1], 4000.0, epsilon = 1.0);
}

#[test]
fn test_time_chart_ends_at_duration() {
    let buffer = SampleBuffer::mono(sine_wave(1000.0, 1.0, 1.0, RATE), RATE).unwrap();
    let chart = time_domain_chart(&buffer);
    let last = chart.series[0].points.last().unwrap();
    assert_abs_diff_eq!(last[0], 1.0, epsilon = 1e-12);
}
