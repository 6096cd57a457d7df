//! Regex patterns for egress job metadata
//! Kept free of I/O so the patterns can be tested on plain strings
//!
//! Every extractor runs one case-insensitive pattern over the whole script and
//! keeps the first match. Nothing here parses SQL; dialect-specific or
//! malformed scripts fall back to the documented defaults.

use once_cell::sync::Lazy;
use regex::Regex;

/// Table name used when a script has no `FROM` clause
pub const UNSPECIFIED_TABLE: &str = "unspecified_table";

/// Source table extraction
pub mod table {
    use super::*;

    pub static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)from\s+([a-zA-Z0-9_.]+)").expect("Invalid regex pattern")
    });

    /// Extract the first `FROM` target, or [`UNSPECIFIED_TABLE`]
    pub fn extract(sql: &str) -> String {
        PATTERN
            .captures(sql)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| UNSPECIFIED_TABLE.to_string())
    }
}

/// Select-list extraction
pub mod columns {
    use super::*;

    /// Select items whose token contains one of these are export options, not columns
    pub const SKIP_KEYWORDS: [&str; 4] = ["uri", "format", "header", "footer"];

    /// Maximum number of columns kept
    pub const MAX_COLUMNS: usize = 5;

    pub static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?is)select\s+(.*?)\s+from").expect("Invalid regex pattern")
    });

    /// Extract up to [`MAX_COLUMNS`] column names from the first `SELECT ... FROM`
    pub fn extract(sql: &str) -> Vec<String> {
        let Some(raw) = PATTERN.captures(sql).and_then(|caps| caps.get(1)) else {
            return Vec::new();
        };

        raw.as_str()
            .split(',')
            // `a AS b` keeps `a`; empty items such as `a,,b` are dropped
            .filter_map(|item| item.split_whitespace().next())
            .filter(|token| !is_skipped(token))
            .take(MAX_COLUMNS)
            .map(str::to_string)
            .collect()
    }

    fn is_skipped(token: &str) -> bool {
        let lower = token.to_lowercase();
        SKIP_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
    }
}

/// Filter condition extraction
pub mod conditions {
    use super::*;

    pub static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?is)where\s+(.*?)(group by|order by|limit|;|$)")
            .expect("Invalid regex pattern")
    });

    /// Extract the trimmed text after `WHERE`
    pub fn extract(sql: &str) -> Option<String> {
        PATTERN
            .captures(sql)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }
}

/// Schedule extraction
pub mod schedule {
    use super::*;

    pub static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"(?i)(daily|hourly|schedule\s*[:=]\s*["']?([a-zA-Z0-9 _:/-]+))"#)
            .expect("Invalid regex pattern")
    });

    /// Extract the lowercased schedule match, or an empty string
    ///
    /// The leftmost match wins regardless of which alternative produced it.
    pub fn extract(sql: &str) -> String {
        PATTERN
            .captures(sql)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_default()
    }
}

/// Output location extraction
pub mod target_path {
    use super::*;

    pub static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"(?i)uri\s*=\s*['"]([^'"]+)['"]"#).expect("Invalid regex pattern")
    });

    /// Extract the quoted value of a `uri = '...'` assignment
    pub fn extract(sql: &str) -> Option<String> {
        PATTERN
            .captures(sql)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

pub fn extract_table(sql: &str) -> String {
    table::extract(sql)
}

pub fn extract_columns(sql: &str) -> Vec<String> {
    columns::extract(sql)
}

pub fn extract_conditions(sql: &str) -> Option<String> {
    conditions::extract(sql)
}

pub fn extract_schedule(sql: &str) -> String {
    schedule::extract(sql)
}

pub fn extract_target_path(sql: &str) -> Option<String> {
    target_path::extract(sql)
}
