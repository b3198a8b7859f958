use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Additive white Gaussian noise settings
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct NoiseConfig {
    /// Signal-to-noise ratio in dB; no noise when absent
    pub snr_db: Option<f32>,
    /// Seed for reproducible noise
    pub seed: Option<u64>,
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

pub fn signal_power(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|&x| x * x).sum::<f32>() / signal.len() as f32
}

/// Add white Gaussian noise at the configured SNR relative to the signal's own power
pub fn add_white_noise(signal: &mut [f32], config: &NoiseConfig) {
    let Some(snr_db) = config.snr_db else {
        return;
    };
    let sig_power = signal_power(signal);
    if sig_power == 0.0 {
        return;
    }

    let snr_linear = 10.0_f32.powf(snr_db / 10.0);
    let noise_std = (sig_power / snr_linear).sqrt();
    let Ok(normal) = Normal::new(0.0, noise_std as f64) else {
        log::warn!("Invalid noise deviation {}; leaving signal clean", noise_std);
        return;
    };

    let mut rng = create_rng(config.seed);
    for sample in signal.iter_mut() {
        *sample += normal.sample(&mut rng) as f32;
    }
}
