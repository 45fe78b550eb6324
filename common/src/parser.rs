//! Inference response parser
//!
//! Strips markdown code fences from the model's reply and parses the
//! remaining text as an [`AnalysisReport`], followed by structural checks.

use crate::error::{Error, Result};
use crate::types::AnalysisReport;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Opening fence with an optional language tag, e.g. ```json
    static ref OPENING_FENCE: Regex = Regex::new(r"^```[A-Za-z0-9_-]*[ \t]*\r?\n?").unwrap();
    /// Closing fence at the very end
    static ref CLOSING_FENCE: Regex = Regex::new(r"\r?\n?```$").unwrap();
}

/// Remove leading/trailing code-fence delimiters
///
/// Only fences wrapping the whole reply are removed; backticks inside
/// string values are left alone.
///
/// # Examples
/// ```
/// use food_scanner_common::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
/// ```
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let start = OPENING_FENCE.find(trimmed).map(|m| m.end()).unwrap_or(0);
    let rest = &trimmed[start..];
    let end = CLOSING_FENCE.find(rest).map(|m| m.start()).unwrap_or(rest.len());
    rest[..end].trim()
}

/// Parse a model reply into a validated report
///
/// # Returns
/// * `Err(Error::EmptyResponse)` - the reply is blank (also after stripping fences)
/// * `Err(Error::Json)` - not JSON, or the JSON does not match the report shape
/// * `Err(Error::Invalid)` - shape matches but a value is out of range
pub fn parse_report(response: &str) -> Result<AnalysisReport> {
    let json = strip_code_fences(response);
    if json.is_empty() {
        return Err(Error::EmptyResponse);
    }

    let report: AnalysisReport = serde_json::from_str(json)?;
    report.validate()?;
    Ok(report)
}
