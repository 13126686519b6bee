use super::{FilterRecord, Formatter, iso8601_timestamp};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, record: &FilterRecord) -> String {
        format!(
            "{},{},{},{:.6},{:.6}",
            iso8601_timestamp(),
            record.sequence,
            record.outlet,
            record.measurement,
            record.value
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("ts,sequence,outlet,measurement,value")
    }
}
