//! Configuration for the wavfilter front ends.
//!
//! Everything here has a `Default` matching the reference behavior, and the
//! whole tree can be loaded from TOML. Missing sections and keys fall back to
//! their defaults:
//!
//! ```toml
//! [filter]
//! cutoff_choices = [300, 500, 1000, 5000]
//! mask_mode = "bin_index"
//!
//! [plot]
//! freq_display_max_hz = 10000.0
//!
//! [export]
//! format = "pcm16"
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CUTOFF_CHOICES, FREQUENCY_DISPLAY_MAX_HZ};
use crate::error::{FilterError, Result};

/// Cutoff frequency specification
///
/// # Parsing formats
/// - `1000` - frequency in Hz (no suffix)
/// - `1000hz` or `1000Hz` - frequency in Hz (explicit)
/// - `1.5khz` or `1.5kHz` - frequency in kHz
///
/// # Example
/// ```
/// use wavfilter::config::CutoffFrequency;
///
/// let cutoff: CutoffFrequency = "1.5kHz".parse().unwrap();
/// assert_eq!(cutoff.as_hz(), 1500.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutoffFrequency(f64);

impl CutoffFrequency {
    pub fn from_hz(hz: f64) -> Self {
        Self(hz)
    }

    pub fn as_hz(&self) -> f64 {
        self.0
    }

    /// The frequency as whole Hz, if it has no fractional part
    pub fn as_whole_hz(&self) -> Option<u32> {
        if self.0.fract() == 0.0 && self.0 <= u32::MAX as f64 {
            Some(self.0 as u32)
        } else {
            None
        }
    }
}

impl fmt::Display for CutoffFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hz", self.0)
    }
}

impl FromStr for CutoffFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();

        let (num, scale) = if let Some(num) = lower.strip_suffix("khz") {
            (num, 1000.0)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let value: f64 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid frequency: {}", s))?;
        if !value.is_finite() || value <= 0.0 {
            return Err("frequency must be positive".to_string());
        }
        Ok(Self::from_hz(value * scale))
    }
}

/// How the low-pass mask is laid over the FFT bins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MaskMode {
    /// Keep bins with raw index below the cutoff bin, zero everything after it.
    /// The mirrored negative-frequency half is zeroed as well.
    #[default]
    BinIndex,
    /// Keep the cutoff band on both sides of the spectrum (textbook low-pass).
    Symmetric,
}

/// Sample encoding used when exporting filtered audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// 16-bit signed integer PCM
    #[default]
    Pcm16,
    /// 32-bit IEEE float
    Float32,
}

impl ExportFormat {
    pub fn spec(&self, channels: u16, sample_rate: u32) -> hound::WavSpec {
        let (bits_per_sample, sample_format) = match self {
            ExportFormat::Pcm16 => (16, hound::SampleFormat::Int),
            ExportFormat::Float32 => (32, hound::SampleFormat::Float),
        };
        hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample,
            sample_format,
        }
    }

    /// Largest absolute error introduced by a write/read cycle for samples in [-1, 1]
    pub fn quantization_step(&self) -> f32 {
        match self {
            ExportFormat::Pcm16 => 1.0 / 32768.0,
            ExportFormat::Float32 => 0.0,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub filter: FilterConfig,
    pub plot: PlotConfig,
    pub export: ExportConfig,
}

/// Cutoff selection and mask behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Closed set of cutoff frequencies offered to the user, in Hz
    pub cutoff_choices: Vec<u32>,
    /// Preselected cutoff; must be one of `cutoff_choices`. First choice when absent.
    pub default_cutoff: Option<u32>,
    pub mask_mode: MaskMode,
}

/// Chart display settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Visible frequency range of the spectrum chart in Hz
    pub freq_display_min_hz: f64,
    pub freq_display_max_hz: f64,
}

/// Playback/export container settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(text).map_err(|e| FilterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.filter.validate()?;
        self.plot.validate()
    }
}

impl FilterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cutoff_choices.is_empty() {
            return Err(FilterError::Config(
                "cutoff_choices must not be empty".to_string(),
            ));
        }
        if self.cutoff_choices.contains(&0) {
            return Err(FilterError::Config(
                "cutoff_choices must be positive".to_string(),
            ));
        }
        if let Some(default) = self.default_cutoff {
            self.validate_cutoff(default)
                .map_err(|e| FilterError::Config(e.to_string()))?;
        }
        Ok(())
    }

    /// Accept `hz` only if it is one of the offered choices
    pub fn validate_cutoff(&self, hz: u32) -> Result<u32> {
        if self.cutoff_choices.contains(&hz) {
            Ok(hz)
        } else {
            Err(FilterError::InvalidCutoff {
                requested: hz,
                allowed: self.cutoff_choices.clone(),
            })
        }
    }

    pub fn initial_cutoff(&self) -> u32 {
        self.default_cutoff
            .or_else(|| self.cutoff_choices.first().copied())
            .unwrap_or(DEFAULT_CUTOFF_CHOICES[0])
    }
}

impl PlotConfig {
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = (self.freq_display_min_hz, self.freq_display_max_hz);
        if lo.is_nan() || hi.is_nan() || lo >= hi {
            return Err(FilterError::Config(format!(
                "frequency display range is empty: {}..{}",
                lo, hi
            )));
        }
        Ok(())
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            cutoff_choices: DEFAULT_CUTOFF_CHOICES.to_vec(),
            default_cutoff: None,
            mask_mode: MaskMode::BinIndex,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            freq_display_min_hz: 0.0,
            freq_display_max_hz: FREQUENCY_DISPLAY_MAX_HZ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutoff_from_hz() {
        let cutoff: CutoffFrequency = "1000".parse().unwrap();
        assert_eq!(cutoff.as_hz(), 1000.0);
    }

    #[test]
    fn test_cutoff_from_hz_explicit() {
        let cutoff: CutoffFrequency = "500hz".parse().unwrap();
        assert_eq!(cutoff.as_hz(), 500.0);

        let cutoff: CutoffFrequency = "500Hz".parse().unwrap();
        assert_eq!(cutoff.as_hz(), 500.0);
    }

    #[test]
    fn test_cutoff_from_khz() {
        let cutoff: CutoffFrequency = "5kHz".parse().unwrap();
        assert_eq!(cutoff.as_hz(), 5000.0);
    }

    #[test]
    fn test_cutoff_whole_hz() {
        let cutoff: CutoffFrequency = "1khz".parse().unwrap();
        assert_eq!(cutoff.as_whole_hz(), Some(1000));
        let cutoff: CutoffFrequency = "300.5".parse().unwrap();
        assert_eq!(cutoff.as_whole_hz(), None);
    }

    #[test]
    fn test_cutoff_invalid() {
        assert!("abc".parse::<CutoffFrequency>().is_err());
        assert!("-100hz".parse::<CutoffFrequency>().is_err());
        assert!("0".parse::<CutoffFrequency>().is_err());
    }

    #[test]
    fn test_default_config_matches_reference() {
        let config = AppConfig::default();
        assert_eq!(config.filter.cutoff_choices, vec![300, 500, 1000, 5000]);
        assert_eq!(config.filter.initial_cutoff(), 300);
        assert_eq!(config.filter.mask_mode, MaskMode::BinIndex);
        assert_eq!(config.plot.freq_display_max_hz, 10_000.0);
        assert_eq!(config.export.format, ExportFormat::Pcm16);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [filter]
            cutoff_choices = [250, 2000]
            default_cutoff = 2000
            mask_mode = "symmetric"
            "#,
        )
        .unwrap();
        assert_eq!(config.filter.cutoff_choices, vec![250, 2000]);
        assert_eq!(config.filter.initial_cutoff(), 2000);
        assert_eq!(config.filter.mask_mode, MaskMode::Symmetric);
        assert_eq!(config.plot.freq_display_max_hz, 10_000.0);
    }

    #[test]
    fn test_toml_export_format() {
        let config = AppConfig::from_toml_str("[export]\nformat = \"float32\"\n").unwrap();
        assert_eq!(config.export.format, ExportFormat::Float32);
    }

    #[test]
    fn test_toml_rejects_default_outside_choices() {
        let err = AppConfig::from_toml_str("[filter]\ncutoff_choices = [300]\ndefault_cutoff = 700\n");
        assert!(matches!(err, Err(FilterError::Config(_))));
    }

    #[test]
    fn test_toml_rejects_empty_choices() {
        assert!(AppConfig::from_toml_str("[filter]\ncutoff_choices = []\n").is_err());
    }

    #[test]
    fn test_validate_cutoff() {
        let filter = FilterConfig::default();
        assert_eq!(filter.validate_cutoff(1000).unwrap(), 1000);
        assert!(matches!(
            filter.validate_cutoff(750),
            Err(FilterError::InvalidCutoff { requested: 750, .. })
        ));
    }

    #[test]
    fn test_plot_range_must_be_ordered() {
        let inverted = PlotConfig {
            freq_display_min_hz: 5000.0,
            freq_display_max_hz: 100.0,
        };
        assert!(matches!(inverted.validate(), Err(FilterError::Config(_))));

        let nan = PlotConfig {
            freq_display_min_hz: f64::NAN,
            freq_display_max_hz: 100.0,
        };
        assert!(nan.validate().is_err());

        assert!(PlotConfig::default().validate().is_ok());
        assert!(AppConfig::from_toml_str("[plot]\nfreq_display_max_hz = nan\n").is_err());
    }
}
