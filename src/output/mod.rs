mod csv;
mod json;
mod text;

use chrono::Utc;

use crate::host::Outlet;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// One emitted value together with the measurement that produced it
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct FilterRecord {
    /// Index of the measurement in the input stream
    pub sequence: u64,
    pub outlet: Outlet,
    pub measurement: f64,
    pub value: f64,
}

pub trait Formatter: Send {
    fn format(&self, record: &FilterRecord) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
