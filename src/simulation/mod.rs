mod noise;
mod signal;

pub use noise::{NoiseConfig, add_white_noise, signal_power};
pub use signal::{Tone, multi_tone, sine_wave};
