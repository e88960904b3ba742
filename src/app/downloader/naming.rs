//! Local file names for downloaded URLs

use url::Url;

use crate::constants::files;

/// File name for a downloaded URL: its final path segment, or a
/// timestamp-based name when that segment is empty
pub fn file_name_for(url: &Url) -> String {
    match last_segment(url) {
        Some(segment) => segment.to_string(),
        None => fallback_file_name(),
    }
}

fn last_segment(url: &Url) -> Option<&str> {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
}

/// `file_<unix nanos>`
fn fallback_file_name() -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}{}", files::FALLBACK_FILE_PREFIX, nanos)
}
