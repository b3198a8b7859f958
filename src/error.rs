use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Failed to decode WAV: {0}")]
    Decode(String),

    #[error("Failed to encode WAV: {0}")]
    Encode(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Cutoff {requested} Hz is not one of the offered choices {allowed:?}")]
    InvalidCutoff { requested: u32, allowed: Vec<u32> },

    #[error("No file loaded")]
    NoFileLoaded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio stream error: {0}")]
    AudioStream(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
