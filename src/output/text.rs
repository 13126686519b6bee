use super::{FilterRecord, Formatter};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, record: &FilterRecord) -> String {
        if self.verbose {
            format!(
                "[{:>6}] {:<8} {:.6} (raw: {:.6})",
                record.sequence, record.outlet, record.value, record.measurement
            )
        } else {
            format!("{:.6}", record.value)
        }
    }
}
