use serde::Serialize;

use super::{FilterRecord, Formatter, iso8601_timestamp};

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonLine<'a> {
    ts: String,
    #[serde(flatten)]
    record: &'a FilterRecord,
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &FilterRecord) -> String {
        let line = JsonLine {
            ts: iso8601_timestamp(),
            record,
        };
        // Only plain numbers and strings, serialization cannot fail
        serde_json::to_string(&line).unwrap_or_default()
    }
}
