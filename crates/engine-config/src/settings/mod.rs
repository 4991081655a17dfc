use crate::{env::EnvSource, error::SettingsError};
use model::pagination::request::{DEFAULT_PAGE_SIZE, SortDirection};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

pub const PAGE_SIZE_VAR: &str = "QUERY_PAGE_SIZE";
pub const SORT_DIRECTION_VAR: &str = "QUERY_SORT_DIRECTION";
pub const MAX_PAGE_SIZE_VAR: &str = "QUERY_MAX_PAGE_SIZE";

pub const DEFAULT_MAX_PAGE_SIZE: usize = 1000;

/// Defaults applied to every query built from these settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Items requested per page
    pub page_size: usize,
    /// Direction used when a query does not pick one
    pub default_direction: SortDirection,
    /// Upper bound accepted for `page_size`
    pub max_page_size: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_direction: SortDirection::Ascending,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl QuerySettings {
    /// Parse a JSON document; missing keys keep their defaults.
    pub fn from_json(document: &str) -> Result<Self, SettingsError> {
        let settings: QuerySettings = serde_json::from_str(document)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults overridden by the `QUERY_*` variables of `env`.
    pub fn from_env(env: &EnvSource) -> Result<Self, SettingsError> {
        Self::default().with_overrides(env)
    }

    pub fn with_overrides(mut self, env: &EnvSource) -> Result<Self, SettingsError> {
        if let Some(page_size) = parse_var::<usize>(env, PAGE_SIZE_VAR)? {
            self.page_size = page_size;
        }
        if let Some(direction) = parse_var::<SortDirection>(env, SORT_DIRECTION_VAR)? {
            self.default_direction = direction;
        }
        if let Some(max) = parse_var::<usize>(env, MAX_PAGE_SIZE_VAR)? {
            self.max_page_size = max;
        }

        self.validate()?;
        debug!(settings = ?self, "Loaded query settings.");
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.check_page_size(self.page_size)
    }

    /// Check a page size requested by a single query against these settings.
    pub fn check_page_size(&self, page_size: usize) -> Result<(), SettingsError> {
        if page_size == 0 || page_size > self.max_page_size {
            return Err(SettingsError::InvalidPageSize {
                page_size,
                max: self.max_page_size,
            });
        }
        Ok(())
    }
}

fn parse_var<T>(env: &EnvSource, key: &str) -> Result<Option<T>, SettingsError>
where
    T: FromStr,
    T::Err: ToString,
{
    let Some(raw) = env.get(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| SettingsError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = QuerySettings::default();
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.default_direction, SortDirection::Ascending);
        assert_eq!(settings.max_page_size, 1000);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_document() {
        let settings =
            QuerySettings::from_json(r#"{ "page_size": 200, "default_direction": "desc" }"#)
                .unwrap();
        assert_eq!(settings.page_size, 200);
        assert_eq!(settings.default_direction, SortDirection::Descending);
        assert_eq!(settings.max_page_size, DEFAULT_MAX_PAGE_SIZE);

        assert!(matches!(
            QuerySettings::from_json("{ not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env = EnvSource::empty()
            .with(PAGE_SIZE_VAR, " 20 ")
            .with(SORT_DIRECTION_VAR, "DESC");
        let settings = QuerySettings::from_env(&env).unwrap();
        assert_eq!(settings.page_size, 20);
        assert_eq!(settings.default_direction, SortDirection::Descending);
    }

    #[test]
    fn test_invalid_env_value() {
        let env = EnvSource::empty().with(PAGE_SIZE_VAR, "lots");
        match QuerySettings::from_env(&env) {
            Err(SettingsError::InvalidValue { key, value, .. }) => {
                assert_eq!(key, PAGE_SIZE_VAR);
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_page_size_bounds() {
        let env = EnvSource::empty().with(PAGE_SIZE_VAR, "0");
        assert!(matches!(
            QuerySettings::from_env(&env),
            Err(SettingsError::InvalidPageSize { page_size: 0, .. })
        ));

        let env = EnvSource::empty()
            .with(PAGE_SIZE_VAR, "500")
            .with(MAX_PAGE_SIZE_VAR, "100");
        assert!(matches!(
            QuerySettings::from_env(&env),
            Err(SettingsError::InvalidPageSize {
                page_size: 500,
                max: 100
            })
        ));

        assert!(QuerySettings::default().check_page_size(1000).is_ok());
        assert!(QuerySettings::default().check_page_size(1001).is_err());
    }
}
