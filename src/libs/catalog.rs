// Fetches the list of installable fonts from the GitHub contents API.
//
// The response is a JSON array of directory entries; each entry's `name` is a font
// family. Parsing is a pure function over `serde_json::Value` so it can be tested
// without the network.

use std::collections::HashSet;

use colored::Colorize;
use serde_json::Value;

use crate::errors::FetchError;
use crate::libs::utilities::assets::{api_agent, describe_ureq_error};
use crate::schemas::fonts::FontCatalog;
use crate::schemas::settings::InstallerSettings;
use crate::{log_debug, log_info};

/// Performs the single GET against `settings.api_url` and parses the result.
/// There is no retry: any failure ends the run.
pub fn fetch_catalog(settings: &InstallerSettings) -> Result<FontCatalog, FetchError> {
    log_info!("[Catalog] Fetching available fonts from GitHub...");
    log_debug!("[Catalog] GET {}", settings.api_url.blue());

    let response = api_agent(settings)
        .get(&settings.api_url)
        .set("Accept", "application/vnd.github+json")
        .call()
        .map_err(|e| FetchError::Network(describe_ureq_error(&e)))?;

    let body: Value = response
        .into_json()
        .map_err(|e| FetchError::Format(e.to_string()))?;

    let catalog = parse_catalog(&body, settings.max_fonts)?;
    log_info!(
        "[Catalog] Found {} available fonts",
        catalog.len().to_string().green()
    );
    Ok(catalog)
}

/// Turns the API response into a catalog.
///
/// * The document must be an array, otherwise `FetchError::Format`.
/// * Entries without a string `name` are skipped; repeated names are kept once.
/// * At most `max` names are kept; the rest are dropped silently.
/// * No usable entry at all is `FetchError::Empty`.
pub fn parse_catalog(body: &Value, max: usize) -> Result<FontCatalog, FetchError> {
    let entries = body
        .as_array()
        .ok_or_else(|| FetchError::Format("expected a JSON array".to_string()))?;

    let mut seen = HashSet::new();
    let names: Vec<String> = entries
        .iter()
        .filter_map(|entry| entry.get("name").and_then(Value::as_str))
        .filter(|name| seen.insert(name.to_string()))
        .take(max)
        .map(str::to_string)
        .collect();

    let catalog = FontCatalog::new(names);
    if catalog.is_empty() {
        return Err(FetchError::Empty);
    }
    if entries.len() > catalog.len() {
        log_debug!(
            "[Catalog] Kept {} of {} entries",
            catalog.len(),
            entries.len()
        );
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collects_names_in_order() {
        let body = json!([
            {"name": "Go-Mono", "type": "dir"},
            {"name": "FiraCode", "type": "dir"},
            {"name": "Hack", "type": "dir"}
        ]);
        let catalog = parse_catalog(&body, 100).unwrap();
        assert_eq!(catalog.names(), &["Go-Mono", "FiraCode", "Hack"]);
    }

    #[test]
    fn skips_entries_without_string_name() {
        let body = json!([
            {"name": "Hack"},
            {"path": "README.md"},
            {"name": 42},
            "loose string",
            {"name": "3270"}
        ]);
        let catalog = parse_catalog(&body, 100).unwrap();
        assert_eq!(catalog.names(), &["Hack", "3270"]);
    }

    #[test]
    fn caps_catalog_size() {
        let entries: Vec<Value> = (0..150).map(|i| json!({"name": format!("Font{i}")})).collect();
        let catalog = parse_catalog(&Value::Array(entries), 100).unwrap();
        assert_eq!(catalog.len(), 100);
        assert_eq!(catalog.get(99), Some("Font99"));
    }

    #[test]
    fn drops_duplicate_names() {
        let body = json!([{"name": "Hack"}, {"name": "Hack"}, {"name": "Lilex"}]);
        let catalog = parse_catalog(&body, 100).unwrap();
        assert_eq!(catalog.names(), &["Hack", "Lilex"]);
    }

    #[test]
    fn non_array_is_format_error() {
        let body = json!({"message": "API rate limit exceeded"});
        assert!(matches!(parse_catalog(&body, 100), Err(FetchError::Format(_))));
    }

    #[test]
    fn no_usable_entries_is_empty_error() {
        assert!(matches!(parse_catalog(&json!([]), 100), Err(FetchError::Empty)));
        assert!(matches!(
            parse_catalog(&json!([{"sha": "abc"}]), 100),
            Err(FetchError::Empty)
        ));
    }
}
