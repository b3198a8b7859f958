//! Interactive session state
//!
//! A [`Session`] holds everything one user has staged: the loaded file, the
//! selected cutoff and the last filter result. Front ends call one action per
//! user interaction and then [`Session::render`] to get the complete view of
//! the current state. Nothing is shared between sessions.

use std::path::Path;

use crate::audio::SampleBuffer;
use crate::config::AppConfig;
use crate::error::{FilterError, Result};
use crate::plot::{Chart, frequency_domain_chart, time_domain_chart};
use crate::signal_processing::SpectralLowpass;
use crate::wav::{decode_wav_bytes, encode_wav};

/// A successfully decoded upload
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub name: String,
    /// The uploaded container, played back unchanged as the original
    pub bytes: Vec<u8>,
    pub buffer: SampleBuffer,
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    NoFileLoaded,
    FileLoaded {
        file: LoadedFile,
    },
    FilterRequested {
        file: LoadedFile,
        cutoff: u32,
    },
    FilterApplied {
        file: LoadedFile,
        cutoff: u32,
        filtered: SampleBuffer,
    },
}

/// Data-free tag of [`SessionState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NoFileLoaded,
    FileLoaded,
    FilterRequested,
    FilterApplied,
}

impl SessionState {
    pub fn stage(&self) -> Stage {
        match self {
            SessionState::NoFileLoaded => Stage::NoFileLoaded,
            SessionState::FileLoaded { .. } => Stage::FileLoaded,
            SessionState::FilterRequested { .. } => Stage::FilterRequested,
            SessionState::FilterApplied { .. } => Stage::FilterApplied,
        }
    }

    pub fn file(&self) -> Option<&LoadedFile> {
        match self {
            SessionState::NoFileLoaded => None,
            SessionState::FileLoaded { file }
            | SessionState::FilterRequested { file, .. }
            | SessionState::FilterApplied { file, .. } => Some(file),
        }
    }
}

/// Time and frequency charts of one buffer
#[derive(Debug, Clone)]
pub struct DomainCharts {
    pub time: Chart,
    pub frequency: Chart,
}

#[derive(Debug, Clone)]
pub struct FilteredView {
    pub cutoff: u32,
    pub buffer: SampleBuffer,
    pub charts: DomainCharts,
    /// Filtered audio as a WAV container, ready to hand to a player
    pub playback: Vec<u8>,
}

/// Everything a front end shows for the current state
#[derive(Debug, Clone)]
pub struct View {
    pub stage: Stage,
    pub file_name: Option<String>,
    pub cutoff_choices: Vec<u32>,
    pub selected_cutoff: u32,
    pub original: Option<DomainCharts>,
    pub original_playback: Option<Vec<u8>>,
    pub filtered: Option<FilteredView>,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct Session {
    config: AppConfig,
    state: SessionState,
    selected_cutoff: u32,
    last_error: Option<String>,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        let selected_cutoff = config.filter.initial_cutoff();
        Self {
            config,
            state: SessionState::NoFileLoaded,
            selected_cutoff,
            last_error: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    pub fn selected_cutoff(&self) -> u32 {
        self.selected_cutoff
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Decode an uploaded WAV file and make it the current file
    ///
    /// Any previous file and filter result are dropped, also when decoding fails.
    pub fn upload(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> Result<()> {
        let name = name.into();
        self.state = SessionState::NoFileLoaded;

        let decoded = decode_wav_bytes(&bytes);
        let outcome = decoded.map(|buffer| {
            log::info!(
                "Loaded {}: {} frames, {} ch, {} Hz",
                name,
                buffer.frames(),
                buffer.channels(),
                buffer.sample_rate()
            );
            self.state = SessionState::FileLoaded {
                file: LoadedFile {
                    name: name.clone(),
                    bytes,
                    buffer,
                },
            };
        });
        self.record(outcome)
    }

    /// Read a file from disk and upload it
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        match std::fs::read(path) {
            Ok(bytes) => self.upload(name, bytes),
            Err(e) => {
                self.state = SessionState::NoFileLoaded;
                self.record(Err(FilterError::Io(e)))
            }
        }
    }

    /// Choose a cutoff from the offered set
    ///
    /// Changing the cutoff discards a filter result computed with another one.
    pub fn select_cutoff(&mut self, hz: u32) -> Result<()> {
        let outcome = self.config.filter.validate_cutoff(hz).map(|hz| {
            self.selected_cutoff = hz;
            self.state = match std::mem::take(&mut self.state) {
                SessionState::NoFileLoaded => SessionState::NoFileLoaded,
                SessionState::FilterApplied {
                    file,
                    cutoff,
                    filtered,
                } if cutoff == hz => SessionState::FilterApplied {
                    file,
                    cutoff,
                    filtered,
                },
                SessionState::FileLoaded { file }
                | SessionState::FilterRequested { file, .. }
                | SessionState::FilterApplied { file, .. } => {
                    SessionState::FilterRequested { file, cutoff: hz }
                }
            };
        });
        self.record(outcome)
    }

    /// Filter the current file at the selected cutoff
    pub fn apply_filter(&mut self) -> Result<()> {
        let cutoff = self.selected_cutoff;
        let result = match self.state.file() {
            None => Err(FilterError::NoFileLoaded),
            Some(file) => SpectralLowpass::new(cutoff as f64, self.config.filter.mask_mode)
                .and_then(|filter| filter.apply(&file.buffer))
                .map(|filtered| (file.clone(), filtered)),
        };
        let outcome = result.map(|(file, filtered)| {
            log::info!("Applied {} Hz low-pass to {}", cutoff, file.name);
            self.state = SessionState::FilterApplied {
                file,
                cutoff,
                filtered,
            };
        });
        self.record(outcome)
    }

    /// Result of the last filter pass, once one has been applied
    pub fn filtered(&self) -> Option<&SampleBuffer> {
        match &self.state {
            SessionState::FilterApplied { filtered, .. } => Some(filtered),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.state = SessionState::NoFileLoaded;
        self.selected_cutoff = self.config.filter.initial_cutoff();
        self.last_error = None;
    }

    /// Build the complete view of the current state
    pub fn render(&self) -> View {
        let mut error = self.last_error.clone();
        let file = self.state.file();

        let original = file.map(|f| self.charts(&f.buffer));

        let filtered = match &self.state {
            SessionState::FilterApplied {
                cutoff, filtered, ..
            } => match encode_wav(filtered, self.config.export.format) {
                Ok(playback) => Some(FilteredView {
                    cutoff: *cutoff,
                    buffer: filtered.clone(),
                    charts: self.charts(filtered),
                    playback,
                }),
                Err(e) => {
                    error = Some(e.to_string());
                    None
                }
            },
            _ => None,
        };

        View {
            stage: self.state.stage(),
            file_name: file.map(|f| f.name.clone()),
            cutoff_choices: self.config.filter.cutoff_choices.clone(),
            selected_cutoff: self.selected_cutoff,
            original,
            original_playback: file.map(|f| f.bytes.clone()),
            filtered,
            error,
        }
    }

    fn charts(&self, buffer: &SampleBuffer) -> DomainCharts {
        DomainCharts {
            time: time_domain_chart(buffer),
            frequency: frequency_domain_chart(buffer, &self.config.plot),
        }
    }

    fn record(&mut self, outcome: Result<()>) -> Result<()> {
        match &outcome {
            Ok(()) => self.last_error = None,
            Err(e) => {
                log::warn!("{}", e);
                self.last_error = Some(e.to_string());
            }
        }
        outcome
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
