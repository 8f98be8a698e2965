//! Unit parsing and stable formatting for resource limits.

/// Normalize a memory limit string to whole megabytes.
///
/// The numeric part is extracted by stripping everything that is not a
/// digit or decimal point. A `G` suffix scales up by 1024, a `K` suffix
/// scales down by 1024, anything else (including a bare number or an
/// `M`/`MB` suffix) is taken as megabytes already. The result rounds to
/// the nearest integer; unparseable input normalizes to zero.
///
/// # Examples
///
/// ```
/// use stackform::codec::units::normalize_memory_mb;
///
/// assert_eq!(normalize_memory_mb("1G"), 1024);
/// assert_eq!(normalize_memory_mb("512M"), 512);
/// assert_eq!(normalize_memory_mb("2048K"), 2);
/// assert_eq!(normalize_memory_mb("256"), 256);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn normalize_memory_mb(raw: &str) -> u32 {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let Ok(amount) = digits.parse::<f64>() else {
        return 0;
    };

    let upper = raw.to_uppercase();
    let megabytes = if upper.contains('G') {
        amount * 1024.0
    } else if upper.contains('K') {
        amount / 1024.0
    } else {
        amount
    };

    if megabytes <= 0.0 {
        return 0;
    }

    megabytes.round() as u32
}

/// Parse a CPU limit into cores, tolerating string or numeric spellings.
///
/// Unparseable input normalizes to zero (no limit).
#[must_use]
pub fn parse_cpu_limit(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

/// Format a CPU limit as the stable decimal string emitted in documents.
///
/// Uses the shortest spelling: `0.5` stays `0.5`, `2.0` becomes `2`.
#[must_use]
pub fn format_cpus(cores: f64) -> String {
    format!("{cores}")
}

/// Format a memory limit as the `<int>MB` spelling emitted in documents.
#[must_use]
pub fn format_memory_mb(megabytes: u32) -> String {
    format!("{megabytes}MB")
}
