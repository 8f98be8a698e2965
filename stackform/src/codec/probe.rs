//! Health probe derivation.
//!
//! When a health check is enabled but no custom test command is supplied,
//! the encoder derives one by matching known keywords against the image
//! reference. The table is a best-effort, user-overridable default: a
//! custom `test` on the record always wins, and images matching nothing
//! fall back to a generic HTTP probe against the container port.

/// Keyword-to-probe table consulted in declaration order.
///
/// The first keyword contained in the lowercased image reference wins.
pub const PROBE_TABLE: &[(&str, &[&str])] = &[
    ("postgres", &["CMD", "pg_isready"]),
    ("redis", &["CMD", "redis-cli", "ping"]),
    ("mongo", &["CMD", "mongosh", "--eval", "db.adminCommand('ping')"]),
    ("mysql", &["CMD", "mysqladmin", "ping"]),
];

/// Container port assumed by the HTTP fallback when the record has none.
const FALLBACK_PORT: &str = "80";

/// Derive a probe command for an image.
///
/// # Examples
///
/// ```
/// use stackform::codec::probe::derive_test;
///
/// assert_eq!(derive_test("postgres:13", "5432"), vec!["CMD", "pg_isready"]);
/// assert_eq!(
///     derive_test("myapp:1.0", "3000"),
///     vec!["CMD", "curl", "-f", "http://localhost:3000"]
/// );
/// ```
#[must_use]
pub fn derive_test(image: &str, container_port: &str) -> Vec<String> {
    let image = image.to_lowercase();
    for (keyword, test) in PROBE_TABLE {
        if image.contains(keyword) {
            return test.iter().map(ToString::to_string).collect();
        }
    }

    let port = container_port.trim();
    let port = if port.is_empty() { FALLBACK_PORT } else { port };
    vec![
        "CMD".to_string(),
        "curl".to_string(),
        "-f".to_string(),
        format!("http://localhost:{port}"),
    ]
}

/// Normalize a user-supplied test command for emission.
///
/// Returns `None` when the command is absent or empty, in which case the
/// caller derives one. `["NONE"]` and `["CMD-SHELL", cmd]` pass through
/// verbatim, as does anything already in exec form; a bare argument
/// vector gets the `CMD` marker prepended.
#[must_use]
pub fn normalize_custom_test(test: Option<&[String]>) -> Option<Vec<String>> {
    let test = test?;
    if test.is_empty() {
        return None;
    }

    if test.len() == 1 && test[0] == "NONE" {
        return Some(test.to_vec());
    }

    match test[0].as_str() {
        "CMD" | "CMD-SHELL" | "NONE" => Some(test.to_vec()),
        _ => {
            let mut normalized = Vec::with_capacity(test.len() + 1);
            normalized.push("CMD".to_string());
            normalized.extend(test.iter().cloned());
            Some(normalized)
        }
    }
}
