//! Output formatting for CLI results

use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::Result;

pub mod json;
pub mod table;

/// Types that can be rendered in every output format
pub trait Formattable {
    /// Format the data according to the specified format
    fn format(&self, format: OutputFormat, property: Option<&str>) -> Result<String>;

    /// Format and print to stdout
    fn print(&self, format: OutputFormat, property: Option<&str>) -> Result<()> {
        println!("{}", self.format(format, property)?);
        Ok(())
    }
}

impl<T: Tabled + Serialize> Formattable for [T] {
    fn format(&self, format: OutputFormat, property: Option<&str>) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(table::format_table(self)),
            OutputFormat::Json => Ok(json::format_json(self, property)?),
        }
    }
}

impl<T: Tabled + Serialize> Formattable for Vec<T> {
    fn format(&self, format: OutputFormat, property: Option<&str>) -> Result<String> {
        self.as_slice().format(format, property)
    }
}
