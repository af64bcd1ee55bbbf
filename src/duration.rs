//! Rounding and compact formatting of durations (`1m30s`, `450ms`, `1.23s`).

use std::time::Duration;

/// Rounds `d` to the nearest multiple of `unit`, halves rounding up.
pub fn round_duration(d: Duration, unit: Duration) -> Duration {
    let unit = unit.as_nanos();
    if unit == 0 {
        return d;
    }
    let rounded = (d.as_nanos() + unit / 2) / unit * unit;
    u64::try_from(rounded).map_or(Duration::MAX, Duration::from_nanos)
}

/// Rounding applied to step runtimes: whole seconds above a minute, 10ms
/// precision otherwise.
pub fn round_runtime(d: Duration) -> Duration {
    if d > Duration::from_secs(60) {
        round_duration(d, Duration::from_secs(1))
    } else {
        round_duration(d, Duration::from_millis(10))
    }
}

/// Formats a duration with the largest units first and no spaces, e.g.
/// `2h3m4s`, `1m1s`, `1.23s`, `450ms`, `0s`.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    match nanos {
        0 => "0s".to_string(),
        1..=999 => format!("{nanos}ns"),
        1_000..=999_999 => format!("{}µs", decimal(nanos, 1_000)),
        1_000_000..=999_999_999 => format!("{}ms", decimal(nanos, 1_000_000)),
        _ => {
            let total_secs = d.as_secs();
            let hours = total_secs / 3600;
            let minutes = total_secs % 3600 / 60;
            let seconds = u128::from(total_secs % 60) * 1_000_000_000 + u128::from(d.subsec_nanos());
            let seconds = format!("{}s", decimal(seconds, 1_000_000_000));
            if hours > 0 {
                format!("{hours}h{minutes}m{seconds}")
            } else if minutes > 0 {
                format!("{minutes}m{seconds}")
            } else {
                seconds
            }
        }
    }
}

fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let fraction = value % unit;
    if fraction == 0 {
        return whole.to_string();
    }
    let width = unit.to_string().len() - 1;
    let digits = format!("{fraction:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
