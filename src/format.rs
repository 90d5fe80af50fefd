use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// CPU time as `MM:SS`, or `H:MM:SS` once it passes an hour.
pub fn format_time_hms(ticks: u64, hz: u64) -> String {
    let total_sec = ticks / hz.max(1);
    let hh = total_sec / 3600;
    let mm = (total_sec % 3600) / 60;
    let ss = total_sec % 60;
    if hh > 0 {
        format!("{hh}:{mm:02}:{ss:02}")
    } else {
        format!("{mm:02}:{ss:02}")
    }
}

/// Resident pages to kB, rounding down.
pub fn pages_to_kb(pages: u64, page_size: u64) -> u64 {
    pages.saturating_mul(page_size) / 1024
}

pub fn bytes_to_kib(bytes: u64) -> u64 {
    bytes / 1024
}

pub fn kib_to_gib(kib: f64) -> f64 {
    kib / (1024.0 * 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_under_an_hour() {
        assert_eq!(format_time_hms(0, 100), "00:00");
        assert_eq!(format_time_hms(6_150, 100), "01:01");
    }

    #[test]
    fn time_over_an_hour() {
        assert_eq!(format_time_hms(366_100, 100), "1:01:01");
    }

    #[test]
    fn zero_hz_does_not_divide_by_zero() {
        assert_eq!(format_time_hms(59, 0), "00:59");
    }

    #[test]
    fn page_and_byte_conversions() {
        assert_eq!(pages_to_kb(2560, 4096), 10_240);
        assert_eq!(bytes_to_kib(104_857_600), 102_400);
        assert!((kib_to_gib(2_097_152.0) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn truncation_adds_ellipsis() {
        assert_eq!(truncate_unicode("short", 10), "short");
        assert_eq!(truncate_unicode("abcdefghij", 5), "abcd\u{2026}");
    }
}
