use super::{Formatter, format_hz};
use crate::report::FilterReport;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &FilterReport) -> String {
        let mut out = format!(
            "{}: {} Hz, {} ch, {} frames ({:.2}s)\nLow-pass {} Hz -> bin {} ({:?})\n",
            report.file,
            report.sample_rate,
            report.channels,
            report.frames,
            report.duration_secs,
            report.cutoff_hz,
            report.cutoff_bin,
            report.mask_mode
        );

        for ch in &report.channel_reports {
            out.push_str(&format!(
                "  ch{}: rms {:.4} -> {:.4}  peak {:.4} -> {:.4}  dominant {} -> {} Hz\n",
                ch.channel + 1,
                ch.original.rms,
                ch.filtered.rms,
                ch.original.peak,
                ch.filtered.peak,
                format_hz(ch.original.dominant_hz),
                format_hz(ch.filtered.dominant_hz)
            ));
            if self.verbose {
                out.push_str(&format!(
                    "       mean {:.4} -> {:.4}  std {:.4} -> {:.4}  range [{:.4}, {:.4}] -> [{:.4}, {:.4}]\n",
                    ch.original.mean,
                    ch.filtered.mean,
                    ch.original.std_dev,
                    ch.filtered.std_dev,
                    ch.original.min,
                    ch.original.max,
                    ch.filtered.min,
                    ch.filtered.max
                ));
            }
        }

        out.trim_end().to_string()
    }
}
