//! Conversion between GTFS clock strings and seconds since midnight.

use crate::error::FeedError;

/// Format seconds since midnight as "HH:MM:SS".
///
/// Hours are not wrapped at 24: trips running past midnight keep counting
/// (122505 becomes "34:01:45").
pub fn encode_seconds(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Parse a GTFS clock string "HH:MM:SS" to seconds since midnight.
///
/// Supports hours >= 24 for trips crossing midnight. Minute and second
/// components are not range-checked ("00:99:00" decodes to 5940), matching
/// the leniency of real-world feeds.
pub fn decode_clock(text: &str) -> Result<u32, FeedError> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 3 {
        return Err(FeedError::Format(format!(
            "expected HH:MM:SS time, got {text:?}"
        )));
    }
    let mut components = [0u32; 3];
    for (i, part) in parts.iter().enumerate() {
        components[i] = part.parse().map_err(|_| {
            FeedError::Format(format!("expected HH:MM:SS time, got {text:?}"))
        })?;
    }
    Ok(components[0] * 3600 + components[1] * 60 + components[2])
}
