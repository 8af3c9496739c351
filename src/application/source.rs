//! Chooses between the live store and the built-in sample collection.

use crate::config::StoreSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    Sample,
}

impl DataSource {
    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::Live => "live",
            DataSource::Sample => "sample",
        }
    }
}

/// True only when both the endpoint and the access key carry a non-blank value.
pub fn is_live_store_configured(store: &StoreSettings) -> bool {
    has_value(store.url.as_deref()) && has_value(store.key.as_deref())
}

pub fn select_data_source(store: &StoreSettings) -> DataSource {
    if is_live_store_configured(store) {
        DataSource::Live
    } else {
        DataSource::Sample
    }
}

fn has_value(value: Option<&str>) -> bool {
    value.is_some_and(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(url: Option<&str>, key: Option<&str>) -> StoreSettings {
        StoreSettings {
            url: url.map(str::to_string),
            key: key.map(str::to_string),
            ..StoreSettings::default()
        }
    }

    #[test]
    fn requires_both_endpoint_and_key() {
        assert!(is_live_store_configured(&settings(
            Some("https://demo.supabase.co"),
            Some("anon")
        )));
        assert!(!is_live_store_configured(&settings(
            Some("https://demo.supabase.co"),
            None
        )));
        assert!(!is_live_store_configured(&settings(None, Some("anon"))));
        assert!(!is_live_store_configured(&settings(None, None)));
    }

    #[test]
    fn blank_values_do_not_count() {
        assert!(!is_live_store_configured(&settings(
            Some(""),
            Some("anon")
        )));
        assert!(!is_live_store_configured(&settings(
            Some("https://demo.supabase.co"),
            Some("  ")
        )));
    }

    #[test]
    fn selection_follows_configuration() {
        assert_eq!(
            select_data_source(&settings(Some("https://demo.supabase.co"), Some("anon"))),
            DataSource::Live
        );
        assert_eq!(select_data_source(&settings(None, None)), DataSource::Sample);
    }
}
