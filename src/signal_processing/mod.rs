pub mod lowpass;
pub mod spectrum;

pub use lowpass::{SpectralLowpass, cutoff_bin, filter_buffer, lowpass, lowpass_mask};
pub use spectrum::{dominant_frequency, fft_frequencies, forward_fft, inverse_fft, magnitudes};
