use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

/// Drop a trailing `.ext` where `ext` is made of word characters.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => {
            let ext = &name[idx + 1..];
            if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                &name[..idx]
            } else {
                name
            }
        }
        None => name,
    }
}

/// Display name for a raw (possibly percent-encoded) file name.
pub fn display_name_from_file(raw: &str) -> String {
    let decoded = urlencoding::decode(raw).map(|s| s.into_owned()).unwrap_or_else(|_| raw.to_string());
    strip_extension(&decoded).to_string()
}

pub fn has_video_extension(path: &str, extensions: &[String]) -> bool {
    let lower = path.to_lowercase();
    extensions.iter().any(|ext| {
        let ext = ext.trim().trim_start_matches('.').to_lowercase();
        !ext.is_empty() && lower.ends_with(&format!(".{}", ext))
    })
}

/// `Last-Modified` header value to epoch milliseconds.
pub fn parse_http_date(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc2822(value.trim()).ok().map(|d| d.timestamp_millis())
}

/// `creation_date` to epoch milliseconds. Accepts RFC 3339, naive date-times and plain dates;
/// naive values are taken as UTC.
pub fn parse_iso_date(value: &str) -> Option<i64> {
    let v = value.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(v) {
        return Some(d.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(n) = NaiveDateTime::parse_from_str(v, fmt) {
            return Some(n.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc().timestamp_millis())
}

pub fn format_date_label(millis: i64) -> String {
    if millis == 0 {
        return "—".to_string();
    }
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(d) => d.with_timezone(&Local).format("%Y-%m-%d").to_string(),
        None => "—".to_string(),
    }
}

pub fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    match lower.rsplit('.').next().unwrap_or_default() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("clip1.mp4"), "clip1");
        assert_eq!(strip_extension("a.b.webm"), "a.b");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension("weird.ex-t"), "weird.ex-t");
        assert_eq!(strip_extension("trailing."), "trailing.");
    }

    #[test]
    fn test_display_name_decodes() {
        assert_eq!(display_name_from_file("%D0%BA%D0%BE%D1%82.mp4"), "кот");
        assert_eq!(display_name_from_file("my%20clip.mp4"), "my clip");
    }

    #[test]
    fn test_has_video_extension() {
        let exts = vec!["mp4".to_string(), ".webm".to_string()];
        assert!(has_video_extension("a/B.MP4", &exts));
        assert!(has_video_extension("x.webm", &exts));
        assert!(!has_video_extension("x.mp4.txt", &exts));
        assert!(!has_video_extension("mp4", &exts));
    }

    #[test]
    fn test_parse_http_date() {
        assert_eq!(parse_http_date("Thu, 01 Jan 1970 00:00:01 GMT"), Some(1000));
        assert_eq!(parse_http_date("yesterday"), None);
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("1970-01-01T00:00:02Z"), Some(2000));
        assert_eq!(parse_iso_date("1970-01-01T00:00:03.500"), Some(3500));
        assert_eq!(parse_iso_date("1970-01-02"), Some(86_400_000));
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn test_unknown_date_label() {
        assert_eq!(format_date_label(0), "—");
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("A.MP4"), "video/mp4");
        assert_eq!(mime_for("a.bin"), "application/octet-stream");
    }
}
