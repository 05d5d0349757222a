/// Human-readable byte count: B through TB, two decimals.
pub fn format_bytes(num_bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = num_bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    // Half-up at two decimals, so 1.005 KB prints as 1.01 KB.
    let rounded = (value * 100.0).round() / 100.0;
    format!("{:.2} {}", rounded, UNITS[unit])
}

/// Scaled duration: seconds only under a minute, then progressively larger
/// units, always at most three components.
pub fn format_duration(total_seconds: f64) -> String {
    let total = total_seconds.round().max(0.0) as u64;
    if total < 60 {
        return format!("{}s", total);
    }
    let (minutes, seconds) = (total / 60, total % 60);
    if minutes < 60 {
        return format!("{}m {}s", minutes, seconds);
    }
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours < 24 {
        return format!("{}h {}m {}s", hours, minutes, seconds);
    }
    let (days, hours) = (hours / 24, hours % 24);
    if days < 7 {
        return format!("{}d {}h {}m", days, hours, minutes);
    }
    let (weeks, days) = (days / 7, days % 7);
    if weeks < 4 {
        return format!("{}w {}d {}h", weeks, days, hours);
    }
    // Months are 30-day months from here on.
    let total_days = weeks * 7 + days;
    let (months, days) = (total_days / 30, total_days % 30);
    if months < 12 {
        return format!("{}mo {}d", months, days);
    }
    let (years, months) = (months / 12, months % 12);
    format!("{}y {}mo", years, months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bytes_scale_through_units() {
        assert_eq!(format_bytes(0), "0.00 B");
        assert_eq!(format_bytes(1023), "1023.00 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1_572_864), "1.50 MB");
        assert_eq!(format_bytes(1_099_511_627_776), "1.00 TB");
    }

    #[test]
    fn durations_scale_through_units() {
        assert_eq!(format_duration(45.0), "45s");
        assert_eq!(format_duration(125.0), "2m 5s");
        assert_eq!(format_duration(3_725.0), "1h 2m 5s");
        assert_eq!(format_duration(90_000.0), "1d 1h 0m");
        assert_eq!(format_duration(700_000.0), "1w 1d 2h");
    }

    #[test]
    fn negative_durations_clamp_to_zero() {
        assert_eq!(format_duration(-5.0), "0s");
    }
}
