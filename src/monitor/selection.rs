//! Per-cycle asset selection

use super::StrictList;
use crate::config::FilterConfig;
use crate::market::AssetSnapshot;
use rust_decimal::Decimal;

/// Drops assets that should not be analyzed this cycle
pub struct AssetFilter {
    min_volume_24h: Decimal,
    excluded: Vec<String>,
    strict_list: Option<StrictList>,
}

impl AssetFilter {
    /// Filter without a strict list
    pub fn new(min_volume_24h: Decimal, excluded: Vec<String>) -> Self {
        Self {
            min_volume_24h,
            excluded,
            strict_list: None,
        }
    }

    /// Build from configuration, reading the strict list file when enabled
    pub fn from_config(config: &FilterConfig) -> Self {
        let filter = Self::new(config.min_volume_24h, config.excluded.clone());
        if config.strict_list_enabled {
            filter.with_strict_list(StrictList::load(&config.strict_list_path))
        } else {
            filter
        }
    }

    /// Restrict to the given names
    pub fn with_strict_list(mut self, strict_list: StrictList) -> Self {
        self.strict_list = Some(strict_list);
        self
    }

    pub fn strict_list(&self) -> Option<&StrictList> {
        self.strict_list.as_ref()
    }

    /// Whether an asset passes every check
    pub fn accepts(&self, asset: &AssetSnapshot) -> bool {
        if let Some(strict) = &self.strict_list {
            if !strict.contains(&asset.name) {
                return false;
            }
        }

        if self.excluded.iter().any(|e| *e == asset.name) {
            return false;
        }

        // Likely delisted or inactive
        if asset.volume_24h < self.min_volume_24h {
            return false;
        }

        asset.price > Decimal::ZERO
    }

    pub fn apply(&self, assets: Vec<AssetSnapshot>) -> Vec<AssetSnapshot> {
        assets.into_iter().filter(|a| self.accepts(a)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn asset(name: &str, volume_24h: Decimal, price: Decimal) -> AssetSnapshot {
        AssetSnapshot {
            name: name.to_string(),
            volume_24h,
            price,
        }
    }

    fn filter() -> AssetFilter {
        AssetFilter::new(dec!(1000), vec!["BTC".to_string(), "ETH".to_string()])
    }

    #[test]
    fn test_accepts_active_asset() {
        assert!(filter().accepts(&asset("SOL", dec!(1000), dec!(180))));
    }

    #[test]
    fn test_rejects_low_volume() {
        assert!(!filter().accepts(&asset("SOL", dec!(999.99), dec!(180))));
    }

    #[test]
    fn test_rejects_non_positive_price() {
        assert!(!filter().accepts(&asset("SOL", dec!(5000), dec!(0))));
    }

    #[test]
    fn test_rejects_excluded() {
        assert!(!filter().accepts(&asset("BTC", dec!(1000000000), dec!(95000))));
    }

    #[test]
    fn test_strict_list_membership() {
        let filter = filter().with_strict_list(StrictList::new(vec!["SOL".to_string()]));
        assert!(filter.accepts(&asset("SOL", dec!(5000), dec!(180))));
        assert!(!filter.accepts(&asset("DOGE", dec!(5000), dec!(0.1))));
    }

    #[test]
    fn test_empty_strict_list_rejects_everything() {
        let filter = filter().with_strict_list(StrictList::default());
        assert!(filter
            .apply(vec![asset("SOL", dec!(5000), dec!(180))])
            .is_empty());
    }

    #[test]
    fn test_from_config_strict_list_disabled() {
        let config = FilterConfig {
            strict_list_enabled: false,
            ..Default::default()
        };
        assert!(AssetFilter::from_config(&config).strict_list().is_none());
    }

    #[test]
    fn test_apply_keeps_order() {
        let kept = filter().apply(vec![
            asset("WIF", dec!(5000), dec!(2)),
            asset("ETH", dec!(5000), dec!(3000)),
            asset("SOL", dec!(5000), dec!(180)),
        ]);
        let names: Vec<_> = kept.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["WIF", "SOL"]);
    }
}
