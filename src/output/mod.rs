//! Output formatting

pub mod human;
pub mod json;

use crate::cli::OutputFormat;
use crate::search::SearchResponse;

/// Format a search response for output
pub fn format_response(response: &SearchResponse, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => human::format(response),
        OutputFormat::Json => json::format(response) + "\n",
    }
}
