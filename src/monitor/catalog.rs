//! FMEA risk catalog.

use crate::config::ComponentRisk;

/// RPN of one component and the scale it is inverted against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskPriority {
    pub rpn_value: f64,
    pub rpn_max: f64,
}

/// Where component RPNs come from.
pub trait RiskCatalog: Send + Sync {
    /// RPN for a component, matched case-insensitively. `None` if unknown.
    fn risk_priority(&self, component: &str) -> Option<RiskPriority>;

    /// Names of every catalogued component, in catalog order.
    fn components(&self) -> Vec<String>;
}

/// RPN worksheet of the reference flexo line.
const PLANT_FMEA: &[(&str, f64)] = &[
    ("Pre-Feeder", 280.0),
    ("Feeder", 252.0),
    ("Printing", 320.0),
    ("Slotter", 210.0),
    ("Stacker", 180.0),
];

/// Fixed in-memory catalog.
///
/// `rpn_max` is the highest RPN in the catalog, so the riskiest component
/// always scores 0 on reliability and the others are ranked relative to it.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticRiskCatalog {
    entries: Vec<ComponentRisk>,
    rpn_max: f64,
}

impl StaticRiskCatalog {
    pub fn new(entries: Vec<ComponentRisk>) -> Self {
        let rpn_max = entries.iter().map(|e| e.rpn_value).fold(0.0, f64::max);
        Self { entries, rpn_max }
    }

    /// Catalog from config, or the reference worksheet when none is configured.
    pub fn from_config(components: &[ComponentRisk]) -> Self {
        if components.is_empty() {
            Self::plant_default()
        } else {
            Self::new(components.to_vec())
        }
    }

    pub fn plant_default() -> Self {
        Self::new(
            PLANT_FMEA
                .iter()
                .map(|(name, rpn)| ComponentRisk {
                    name: (*name).to_string(),
                    rpn_value: *rpn,
                })
                .collect(),
        )
    }

    pub const fn rpn_max(&self) -> f64 {
        self.rpn_max
    }
}

impl RiskCatalog for StaticRiskCatalog {
    fn risk_priority(&self, component: &str) -> Option<RiskPriority> {
        let wanted = component.trim();
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(wanted))
            .map(|e| RiskPriority {
                rpn_value: e.rpn_value,
                rpn_max: self.rpn_max,
            })
    }

    fn components(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpn_max_is_catalog_maximum() {
        let catalog = StaticRiskCatalog::plant_default();
        assert_eq!(catalog.rpn_max(), 320.0);
        let printing = catalog.risk_priority("printing").unwrap();
        assert_eq!(printing, RiskPriority { rpn_value: 320.0, rpn_max: 320.0 });
    }

    #[test]
    fn test_unknown_component() {
        assert!(StaticRiskCatalog::plant_default().risk_priority("Gluer").is_none());
    }

    #[test]
    fn test_configured_catalog_replaces_default() {
        let catalog = StaticRiskCatalog::from_config(&[ComponentRisk {
            name: "Feeder".to_string(),
            rpn_value: 100.0,
        }]);
        assert_eq!(catalog.components(), vec!["Feeder".to_string()]);
        assert_eq!(catalog.rpn_max(), 100.0);
    }

    #[test]
    fn test_empty_catalog_has_zero_scale() {
        assert_eq!(StaticRiskCatalog::new(Vec::new()).rpn_max(), 0.0);
    }
}
