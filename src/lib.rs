pub mod audio;
pub mod config;
pub mod constants;
pub mod error;
pub mod output;
pub mod plot;
pub mod report;
pub mod session;
pub mod signal_processing;
pub mod wav;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use audio::SampleBuffer;
pub use config::AppConfig;
pub use error::{FilterError, Result};
pub use session::Session;
pub use wav::{load_wav, save_wav};
