use super::{Formatter, iso8601_timestamp};
use crate::report::FilterReport;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, report: &FilterReport) -> String {
        let body = serde_json::json!({
            "ts": iso8601_timestamp(),
            "report": report,
        });
        body.to_string()
    }
}
