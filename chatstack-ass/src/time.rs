//! ASS timestamp formatting

/// Formats seconds as an ASS timestamp (`h:mm:ss.cc`).
///
/// Negative times clamp to zero. Centiseconds are rounded half to even and
/// carried into seconds, minutes and hours as needed.
pub fn ass_time(secs: f64) -> String {
    let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };

    let mut hours = (secs / 3600.0).floor() as u64;
    let remaining = secs - hours as f64 * 3600.0;
    let mut mins = (remaining / 60.0).floor() as u64;
    let remaining = remaining - mins as f64 * 60.0;
    let mut whole = remaining.floor() as u64;
    let mut centis = ((remaining - whole as f64) * 100.0).round_ties_even() as u64;

    if centis >= 100 {
        whole += 1;
        centis = 0;
    }
    if whole >= 60 {
        mins += 1;
        whole = 0;
    }
    if mins >= 60 {
        hours += 1;
        mins = 0;
    }

    format!("{}:{:02}:{:02}.{:02}", hours, mins, whole, centis)
}

/// Converts seconds to whole milliseconds for effect tags
pub(crate) fn millis(secs: f64) -> i64 {
    (secs * 1000.0).round_ties_even() as i64
}
