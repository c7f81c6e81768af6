//! Small shared helpers used by the backend.

/// Generate a new API key with the `knd_` prefix.
pub fn generate_api_key() -> String {
    format!("knd_{}", uuid::Uuid::new_v4().simple())
}

/// Current UTC time in SQLite datetime format (`YYYY-MM-DD HH:MM:SS`).
pub fn now_utc() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_keys_are_prefixed_and_unique() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert!(a.starts_with("knd_"));
        assert_ne!(a, b);
    }

    #[test]
    fn now_utc_is_sqlite_datetime_shaped() {
        let now = now_utc();
        assert_eq!(now.len(), 19);
        assert_eq!(&now[4..5], "-");
        assert_eq!(&now[10..11], " ");
    }
}
