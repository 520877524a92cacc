use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

fn sqlite_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^sqlite://(/.+?)(:(.+))?$").expect("sqlite pattern compiles"))
}

fn server_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<db>\w+)(?P<driver>\+\w+)?://(?:(?P<username>\S+):(?P<password>\S+)@)?(?P<host>[\w.-]+)(?::(?P<port>\d+))?(?:/(?P<database>[\w./-]+))?(?:\?(?P<parameters>.*))?$",
        )
        .expect("server pattern compiles")
    })
}

/// Check a connection string and normalize it for storage.
///
/// File-backed `sqlite://` strings are accepted as-is. Server strings must name
/// a database; a caller-supplied `+driver` suffix is dropped and the legacy
/// `postgres://` scheme is rewritten to `postgresql://`.
pub fn validate_dsn(dsn: &str) -> Result<String> {
    if sqlite_pattern().is_match(dsn) {
        return Ok(dsn.to_string());
    }

    let Some(caps) = server_pattern().captures(dsn) else {
        return Err(Error::InvalidDsn("invalid DSN format".to_string()));
    };

    if caps.name("database").is_none_or(|m| m.as_str().is_empty()) {
        return Err(Error::InvalidDsn(
            "DSN must specify a database name (ex .../dvd_rental)".to_string(),
        ));
    }

    let mut value = dsn.to_string();
    if let Some(driver) = caps.name("driver") {
        value.replace_range(driver.range(), "");
    }

    if value.starts_with("postgres://") {
        value.replace_range(.."postgres".len(), "postgresql");
    }

    Ok(value)
}
