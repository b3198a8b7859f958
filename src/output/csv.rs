use super::Formatter;
use crate::report::FilterReport;

pub struct CsvFormatter;

fn opt(hz: Option<f64>) -> String {
    hz.map_or(String::new(), |f| format!("{:.1}", f))
}

impl Formatter for CsvFormatter {
    fn format(&self, report: &FilterReport) -> String {
        report
            .channel_reports
            .iter()
            .map(|ch| {
                format!(
                    "{},{},{},{},{:.6},{:.6},{},{:.6},{:.6},{}",
                    report.file,
                    report.cutoff_hz,
                    report.cutoff_bin,
                    ch.channel,
                    ch.original.rms,
                    ch.original.peak,
                    opt(ch.original.dominant_hz),
                    ch.filtered.rms,
                    ch.filtered.peak,
                    opt(ch.filtered.dominant_hz)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn header(&self) -> Option<&'static str> {
        Some(
            "file,cutoff_hz,cutoff_bin,channel,rms_before,peak_before,dominant_hz_before,rms_after,peak_after,dominant_hz_after",
        )
    }
}
