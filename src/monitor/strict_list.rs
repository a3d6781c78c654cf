//! Strict list of tokens the monitor is restricted to

use crate::market::UniverseAsset;
use std::collections::BTreeSet;
use std::path::Path;

/// Minimum max leverage for strict list membership
pub const STRICT_MIN_MAX_LEVERAGE: u32 = 10;

/// Minimum margin table id for strict list membership
pub const STRICT_MIN_MARGIN_TABLE_ID: u32 = 51;

/// Set of token names stored as a JSON array
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrictList {
    names: BTreeSet<String>,
}

impl StrictList {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    /// Read the list from disk; a missing or malformed file yields an empty list
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let names: Vec<String> = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = ?path, error = %e, "Invalid strict list file");
                Vec::new()
            }),
            Err(e) => {
                tracing::debug!(path = ?path, error = %e, "Strict list file not readable");
                Vec::new()
            }
        };
        Self::new(names)
    }

    /// Write the list as a pretty-printed JSON array, sorted
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let names: Vec<&String> = self.names.iter().collect();
        let json = serde_json::to_string_pretty(&names)?;
        std::fs::write(path.as_ref(), json)?;
        tracing::info!(path = ?path.as_ref(), count = names.len(), "Updated strict list");
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Build the list from universe attributes
    ///
    /// Keeps tokens that are listed, cross-margin capable, allow at least
    /// 10x leverage and sit in margin table 51 or above.
    pub fn select(universe: &[UniverseAsset], excluded: &[String]) -> Self {
        let names = universe.iter().filter_map(|asset| {
            let name = asset.name.as_ref()?;
            let eligible = !excluded.iter().any(|e| e == name)
                && !asset.is_delisted
                && !asset.only_isolated
                && asset.max_leverage >= STRICT_MIN_MAX_LEVERAGE
                && asset.margin_table_id >= STRICT_MIN_MARGIN_TABLE_ID;
            eligible.then(|| name.clone())
        });
        Self::new(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str, max_leverage: u32, margin_table_id: u32) -> UniverseAsset {
        UniverseAsset {
            name: Some(name.to_string()),
            is_delisted: false,
            only_isolated: false,
            max_leverage,
            margin_table_id,
        }
    }

    #[test]
    fn test_select_criteria() {
        let mut delisted = asset("OLD", 20, 60);
        delisted.is_delisted = true;
        let mut isolated = asset("ISO", 20, 60);
        isolated.only_isolated = true;

        let universe = vec![
            asset("SOL", 20, 52),
            asset("BTC", 50, 56),
            asset("LOWLEV", 5, 60),
            asset("TABLE", 20, 50),
            asset("HYPE", 10, 51),
            delisted,
            isolated,
            UniverseAsset {
                name: None,
                is_delisted: false,
                only_isolated: false,
                max_leverage: 50,
                margin_table_id: 60,
            },
        ];

        let excluded = vec!["BTC".to_string(), "ETH".to_string()];
        let list = StrictList::select(&universe, &excluded);
        assert_eq!(list.names().collect::<Vec<_>>(), vec!["HYPE", "SOL"]);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let list = StrictList::load("/nonexistent/strict_list.json");
        assert!(list.is_empty());
    }

    #[test]
    fn test_load_invalid_file_is_empty() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{not a list").unwrap();
        assert!(StrictList::load(file.path()).is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strict_list.json");

        let list = StrictList::new(vec!["WIF".to_string(), "SOL".to_string()]);
        list.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.find("SOL").unwrap() < content.find("WIF").unwrap());

        let loaded = StrictList::load(&path);
        assert_eq!(loaded, list);
        assert!(loaded.contains("SOL"));
        assert!(!loaded.contains("BTC"));
    }
}
