use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use wavfilter::config::{AppConfig, CutoffFrequency, ExportFormat, MaskMode};
use wavfilter::output::{OutputFormat, create_formatter};
use wavfilter::plot::Chart;
use wavfilter::report::FilterReport;
use wavfilter::session::DomainCharts;
use wavfilter::signal_processing::SpectralLowpass;
use wavfilter::{Session, save_wav};

#[derive(Parser, Debug)]
#[command(name = "wavfilter")]
#[command(about = "Apply an FFT low-pass mask to a WAV file", long_about = None)]
struct Args {
    /// WAV file to filter
    #[arg(required_unless_present = "list_cutoffs")]
    input: Option<PathBuf>,

    /// Cutoff frequency (e.g. "1000", "5khz"); must be one of the configured choices
    #[arg(short = 'c', long)]
    cutoff: Option<CutoffFrequency>,

    /// Where to write the filtered WAV
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Override the configured mask mode
    #[arg(short = 'm', long, value_enum)]
    mask_mode: Option<MaskMode>,

    /// Override the configured export sample format
    #[arg(long, value_enum)]
    export_format: Option<ExportFormat>,

    /// Write the original and filtered charts as CSV files into this directory
    #[arg(long)]
    charts_dir: Option<PathBuf>,

    /// Print the offered cutoff choices and exit
    #[arg(long)]
    list_cutoffs: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(mode) = args.mask_mode {
        config.filter.mask_mode = mode;
    }
    if let Some(format) = args.export_format {
        config.export.format = format;
    }

    if args.list_cutoffs {
        for hz in &config.filter.cutoff_choices {
            println!("{}", hz);
        }
        return Ok(());
    }

    let input = args
        .input
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("no input file given"))?;

    let mut session = Session::new(config);
    session
        .open(input)
        .with_context(|| format!("loading {}", input.display()))?;

    if let Some(cutoff) = args.cutoff {
        let hz = cutoff
            .as_whole_hz()
            .ok_or_else(|| anyhow::anyhow!("cutoff {} is not a whole number of Hz", cutoff))?;
        session.select_cutoff(hz)?;
    }

    session.apply_filter()?;
    let view = session.render();
    if let Some(error) = &view.error {
        anyhow::bail!("{}", error);
    }

    let file = session
        .state()
        .file()
        .ok_or_else(|| anyhow::anyhow!("no file loaded"))?;
    let filtered = session
        .filtered()
        .ok_or_else(|| anyhow::anyhow!("filter produced no output"))?;

    let filter = SpectralLowpass::new(
        session.selected_cutoff() as f64,
        session.config().filter.mask_mode,
    )?;
    let report = FilterReport::new(&file.name, &file.buffer, filtered, &filter)?;

    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }
    println!("{}", formatter.format(&report));

    if let Some(path) = &args.output {
        save_wav(path, filtered, session.config().export.format)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    if let Some(dir) = &args.charts_dir {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        if let Some(original) = &view.original {
            write_charts(dir, "original", original)?;
        }
        if let Some(filtered) = &view.filtered {
            write_charts(dir, "filtered", &filtered.charts)?;
        }
    }

    Ok(())
}

fn write_charts(dir: &Path, prefix: &str, charts: &DomainCharts) -> anyhow::Result<()> {
    write_chart(&dir.join(format!("{}_time.csv", prefix)), &charts.time)?;
    write_chart(&dir.join(format!("{}_frequency.csv", prefix)), &charts.frequency)
}

fn write_chart(path: &Path, chart: &Chart) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    chart
        .write_csv(&mut out)
        .and_then(|()| out.flush())
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
