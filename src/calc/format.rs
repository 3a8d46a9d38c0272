/// Converts a number of seconds to a human readable duration.
///
/// Hours and minutes are floored and joined, dropping whichever is zero
/// (`1 hour 1 minute`, `2 hours`, `45 minutes`). Only when both are zero does
/// it fall back to rounded seconds (`59 seconds`).
pub fn format_time(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor();
    let minutes = ((seconds - hours * 3600.0) / 60.0).floor();

    let mut parts = Vec::with_capacity(2);
    if hours > 0.0 {
        parts.push(plural(hours, "hour"));
    }
    if minutes > 0.0 {
        parts.push(plural(minutes, "minute"));
    }
    if parts.is_empty() {
        return format!("{} seconds", seconds.round());
    }
    parts.join(" ")
}

fn plural(count: f64, unit: &str) -> String {
    if count == 1.0 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seconds() {
        assert_eq!(format_time(0.0), "0 seconds");
    }

    #[test]
    fn test_under_a_minute() {
        assert_eq!(format_time(59.0), "59 seconds");
        assert_eq!(format_time(59.4), "59 seconds");
    }

    #[test]
    fn test_exactly_one_minute() {
        assert_eq!(format_time(60.0), "1 minute");
    }

    #[test]
    fn test_hour_and_minute_singular() {
        assert_eq!(format_time(3661.0), "1 hour 1 minute");
    }

    #[test]
    fn test_plural_units() {
        assert_eq!(format_time(7200.0), "2 hours");
        assert_eq!(format_time(2700.0), "45 minutes");
        assert_eq!(format_time(3.0 * 3600.0 + 25.0 * 60.0 + 12.0), "3 hours 25 minutes");
    }

    #[test]
    fn test_whole_hour_has_no_trailing_space() {
        assert_eq!(format_time(3600.0), "1 hour");
    }
}
