use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use wavfilter::SampleBuffer;
use wavfilter::config::ExportFormat;
use wavfilter::save_wav;
use wavfilter::simulation::{NoiseConfig, Tone, add_white_noise, multi_tone};

#[derive(Parser, Debug)]
#[command(name = "generate_wav")]
#[command(about = "Generate synthetic multi-tone WAV files for low-pass filter testing")]
struct Args {
    /// Output WAV file
    #[arg(short, long, default_value = "tones.wav")]
    output: PathBuf,

    /// TOML signal description with [[tone]] entries and an optional [noise] section
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tones: comma-separated "freq:amplitude" pairs (e.g., "440:0.4,2000:0.3")
    #[arg(short, long, default_value = "440:0.4,2000:0.3,6000:0.2")]
    tones: String,

    /// Signal duration in seconds
    #[arg(short, long, default_value_t = 2.0)]
    duration: f32,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 44100)]
    sample_rate: u32,

    /// Number of output channels; every channel carries the same signal
    #[arg(long, default_value_t = 1)]
    channels: u16,

    /// AWGN SNR in dB (CLI override)
    #[arg(long)]
    snr: Option<f32>,

    /// Seed for reproducible noise
    #[arg(short, long)]
    seed: Option<u64>,

    /// Sample encoding
    #[arg(long, value_enum, default_value = "pcm16")]
    format: ExportFormat,
}

#[derive(Debug, Deserialize, Default)]
struct TomlConfig {
    #[serde(default)]
    tone: Vec<Tone>,
    noise: Option<NoiseConfig>,
}

fn parse_tones(s: &str) -> Result<Vec<Tone>> {
    s.split(',')
        .map(|part| {
            let (freq, amp) = part
                .trim()
                .split_once(':')
                .with_context(|| format!("Invalid tone '{}'. Use 'freq:amplitude'", part))?;
            let freq: f32 = freq.trim().parse().context("Invalid tone frequency")?;
            let amp: f32 = amp.trim().parse().context("Invalid tone amplitude")?;
            Ok(Tone::new(freq, amp))
        })
        .collect()
}

fn load_toml_config(path: &PathBuf) -> Result<TomlConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let toml_config = if let Some(ref config_path) = args.config {
        load_toml_config(config_path)?
    } else {
        TomlConfig::default()
    };

    let tones = if toml_config.tone.is_empty() {
        parse_tones(&args.tones)?
    } else {
        toml_config.tone.clone()
    };

    let mut noise = toml_config.noise.unwrap_or_default();
    if args.snr.is_some() {
        noise.snr_db = args.snr;
    }
    if args.seed.is_some() {
        noise.seed = args.seed;
    }

    let mut signal = multi_tone(&tones, args.duration, args.sample_rate);
    add_white_noise(&mut signal, &noise);

    let channels = vec![signal; args.channels.max(1) as usize];
    let buffer = SampleBuffer::from_channels(&channels, args.sample_rate)
        .context("Failed to build sample buffer")?;

    save_wav(&args.output, &buffer, args.format).context("Failed to write WAV file")?;

    eprintln!(
        "Generated {} ({} tones, {:.2}s, {} Hz, {} ch)",
        args.output.display(),
        tones.len(),
        args.duration,
        args.sample_rate,
        buffer.channels()
    );
    Ok(())
}
