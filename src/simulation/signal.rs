use std::f32::consts::PI;

/// One sinusoidal component of a synthetic signal
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub amplitude: f32,
    #[serde(default)]
    pub phase_radians: f32,
}

impl Tone {
    pub fn new(frequency_hz: f32, amplitude: f32) -> Self {
        Self {
            frequency_hz,
            amplitude,
            phase_radians: 0.0,
        }
    }
}

/// Generate a pure sine of `duration_secs` seconds
pub fn sine_wave(frequency_hz: f32, amplitude: f32, duration_secs: f32, sample_rate: u32) -> Vec<f32> {
    multi_tone(&[Tone::new(frequency_hz, amplitude)], duration_secs, sample_rate)
}

/// Sum of sinusoids, mono
pub fn multi_tone(tones: &[Tone], duration_secs: f32, sample_rate: u32) -> Vec<f32> {
    let num_samples = (duration_secs * sample_rate as f32).round() as usize;

    (0..num_samples)
        .map(|i| {
            // phase from the integer index keeps long signals exact
            tones
                .iter()
                .map(|tone| {
                    let cycles = (tone.frequency_hz as f64 * i as f64 / sample_rate as f64).fract();
                    tone.amplitude * (2.0 * PI * cycles as f32 + tone.phase_radians).sin()
                })
                .sum()
        })
        .collect()
}
