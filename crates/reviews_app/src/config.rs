//! Client settings from the environment (and an optional `.env` file).

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use reviews_engine::ApiSettings;

const API_KEY_VAR: &str = "DATASHAKE_API_KEY";

pub(crate) fn settings_from_env() -> Result<ApiSettings> {
    let _ = dotenvy::dotenv();
    settings_from(|name| env::var(name).ok())
}

pub(crate) fn settings_from(lookup: impl Fn(&str) -> Option<String>) -> Result<ApiSettings> {
    let api_key = lookup(API_KEY_VAR).with_context(|| format!("{API_KEY_VAR} is not set"))?;
    let mut settings = ApiSettings::new(api_key)?;

    if let Some(value) = parsed::<u32>(&lookup, "DATASHAKE_MAX_RPS")? {
        settings.max_requests_per_second = value;
    }
    if let Some(value) = lookup("DATASHAKE_LANGUAGE") {
        settings.language_code = value;
    }
    if let Some(value) = parsed::<bool>(&lookup, "DATASHAKE_ALLOW_RESPONSE")? {
        settings.allow_response = value;
    }
    if let Some(value) = parsed::<i64>(&lookup, "DATASHAKE_MIN_DAYS")? {
        settings.min_days_since_last_crawl = value;
    }
    if let Some(value) = lookup("DATASHAKE_BASE_URL") {
        settings.base_url = value;
    }

    settings.validate()?;
    Ok(settings)
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .to_ascii_lowercase()
                .parse::<T>()
                .with_context(|| format!("{name}={raw:?} is not valid"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const KEY: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let settings = settings_from(lookup(&[(API_KEY_VAR, KEY)])).unwrap();
        assert_eq!(settings.max_requests_per_second, 10);
        assert_eq!(settings.language_code, "en");
        assert!(settings.allow_response);
        assert_eq!(settings.min_days_since_last_crawl, 3);
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = settings_from(lookup(&[
            (API_KEY_VAR, KEY),
            ("DATASHAKE_MAX_RPS", "4"),
            ("DATASHAKE_ALLOW_RESPONSE", "False"),
            ("DATASHAKE_MIN_DAYS", "7"),
            ("DATASHAKE_LANGUAGE", "de"),
        ]))
        .unwrap();
        assert_eq!(settings.max_requests_per_second, 4);
        assert!(!settings.allow_response);
        assert_eq!(settings.min_days_since_last_crawl, 7);
        assert_eq!(settings.language_code, "de");
    }

    #[test]
    fn missing_or_short_key_fails() {
        assert!(settings_from(lookup(&[])).is_err());
        assert!(settings_from(lookup(&[(API_KEY_VAR, "abc")])).is_err());
        assert!(settings_from(lookup(&[(API_KEY_VAR, KEY), ("DATASHAKE_MAX_RPS", "0")])).is_err());
    }
}
