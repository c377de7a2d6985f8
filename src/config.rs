use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calc::{ProductClass, ProductTable};
use crate::error::VolumeError;
use crate::models::{MerchRules, ScalingBasis, SegmentParity, SegmentationOption};

/// Cruise defaults loaded from a TOML file.
///
/// ```toml
/// [cruise]
/// region = 6
/// forest = "12"
/// district = "01"
/// product = "01"
///
/// [merch_rule]
/// max_len = 40.0
/// min_top_primary = 5.0
///
/// [[product_class]]
/// name = "large_saw"
/// min_diameter = 24.0
/// min_length = 16.0
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CruiseConfig {
    #[serde(default)]
    pub cruise: CruiseSection,
    #[serde(default)]
    pub merch_rule: MerchRuleOverrides,
    #[serde(default, rename = "product_class")]
    pub product_classes: Vec<ProductClassEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CruiseSection {
    #[serde(default = "default_region")]
    pub region: u8,
    #[serde(default = "default_forest")]
    pub forest: String,
    #[serde(default = "default_district")]
    pub district: String,
    #[serde(default = "default_product")]
    pub product: String,
}

fn default_region() -> u8 {
    6
}
fn default_forest() -> String {
    "12".to_string()
}
fn default_district() -> String {
    "01".to_string()
}
fn default_product() -> String {
    "01".to_string()
}

impl Default for CruiseSection {
    fn default() -> Self {
        Self {
            region: default_region(),
            forest: default_forest(),
            district: default_district(),
            product: default_product(),
        }
    }
}

/// Partial merch-rule overrides; unset fields keep the documented
/// defaults. Parity and option are given as their engine codes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MerchRuleOverrides {
    pub parity: Option<i32>,
    pub option: Option<i32>,
    pub max_len: Option<f64>,
    pub min_len: Option<f64>,
    pub min_len_top: Option<f64>,
    pub merch_len: Option<f64>,
    pub min_top_primary: Option<f64>,
    pub min_top_secondary: Option<f64>,
    pub stump: Option<f64>,
    pub trim: Option<f64>,
    pub bark_ratio: Option<f64>,
    pub double_bark: Option<f64>,
    pub min_bdft_diam: Option<f64>,
    /// true = Scribner decimal C table, false = factor-based.
    pub table_scaling: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductClassEntry {
    pub name: String,
    pub min_diameter: f64,
    pub min_length: f64,
}

impl CruiseConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VolumeError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, VolumeError> {
        Ok(toml::from_str(text)?)
    }

    /// Merge the overrides onto the default merch rules.
    pub fn merch_rules(&self) -> Result<MerchRules, VolumeError> {
        let mut rules = MerchRules::default();
        let o = &self.merch_rule;
        if let Some(code) = o.parity {
            rules.parity = SegmentParity::from_code(code).ok_or_else(|| {
                VolumeError::Configuration(format!("unknown parity code {code}"))
            })?;
        }
        if let Some(code) = o.option {
            rules.option = SegmentationOption::from_code(code).ok_or_else(|| {
                VolumeError::Configuration(format!("unknown segmentation option {code}"))
            })?;
        }
        if let Some(v) = o.max_len {
            rules.max_len = v;
        }
        if let Some(v) = o.min_len {
            rules.min_len = v;
        }
        if let Some(v) = o.min_len_top {
            rules.min_len_top = v;
        }
        if let Some(v) = o.merch_len {
            rules.merch_len = v;
        }
        if let Some(v) = o.min_top_primary {
            rules.min_top_primary = v;
        }
        if let Some(v) = o.min_top_secondary {
            rules.min_top_secondary = v;
        }
        if let Some(v) = o.stump {
            rules.stump = v;
        }
        if let Some(v) = o.trim {
            rules.trim = v;
        }
        if let Some(v) = o.bark_ratio {
            rules.bark_ratio = v;
        }
        if let Some(v) = o.double_bark {
            rules.double_bark = v;
        }
        if let Some(v) = o.min_bdft_diam {
            rules.min_bdft_diam = v;
        }
        if let Some(table) = o.table_scaling {
            rules.scaling = if table {
                ScalingBasis::TableDecimalC
            } else {
                ScalingBasis::FactorBased
            };
        }
        Ok(rules)
    }

    /// The configured product table, or the built-in defaults when the
    /// file lists no classes.
    pub fn product_table(&self) -> Result<ProductTable, VolumeError> {
        if self.product_classes.is_empty() {
            return Ok(ProductTable::default());
        }
        ProductTable::new(
            self.product_classes
                .iter()
                .map(|e| ProductClass::new(e.name.clone(), e.min_diameter, e.min_length))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_yields_defaults() {
        let cfg = CruiseConfig::parse("").unwrap();
        assert_eq!(cfg.cruise.region, 6);
        assert_eq!(cfg.cruise.forest, "12");
        let rules = cfg.merch_rules().unwrap();
        assert_eq!(rules, MerchRules::default());
    }

    #[test]
    fn test_partial_merch_rule_override() {
        let cfg = CruiseConfig::parse(
            r#"
            [merch_rule]
            max_len = 16.0
            trim = 0.5
            "#,
        )
        .unwrap();
        let rules = cfg.merch_rules().unwrap();
        assert_eq!(rules.max_len, 16.0);
        assert_eq!(rules.trim, 0.5);
        // Untouched fields keep their defaults.
        assert_eq!(rules.min_len, 12.0);
        assert_eq!(rules.stump, 1.0);
    }

    #[test]
    fn test_parity_and_option_codes() {
        let cfg = CruiseConfig::parse(
            r#"
            [merch_rule]
            parity = 2
            option = 21
            "#,
        )
        .unwrap();
        let rules = cfg.merch_rules().unwrap();
        assert_eq!(rules.parity, SegmentParity::EvenOnly);
        assert_eq!(rules.option, SegmentationOption::NominalShortCombined);
    }

    #[test]
    fn test_bad_option_code_rejected() {
        let cfg = CruiseConfig::parse(
            r#"
            [merch_rule]
            option = 99
            "#,
        )
        .unwrap();
        let err = cfg.merch_rules().unwrap_err();
        assert!(err.to_string().contains("segmentation option"));
    }

    #[test]
    fn test_cruise_section_override() {
        let cfg = CruiseConfig::parse(
            r#"
            [cruise]
            region = 5
            forest = "06"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.cruise.region, 5);
        assert_eq!(cfg.cruise.forest, "06");
        assert_eq!(cfg.cruise.district, "01");
    }

    #[test]
    fn test_product_classes_from_config() {
        let cfg = CruiseConfig::parse(
            r#"
            [[product_class]]
            name = "peeler"
            min_diameter = 30.0
            min_length = 17.0

            [[product_class]]
            name = "saw"
            min_diameter = 12.0
            min_length = 16.0
            "#,
        )
        .unwrap();
        let table = cfg.product_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.classes()[0].name, "peeler");
        assert_eq!(table.classify(32.0, 20.0), Some(0));
    }

    #[test]
    fn test_default_product_table_when_none_listed() {
        let cfg = CruiseConfig::parse("").unwrap();
        let table = cfg.product_table().unwrap();
        assert_eq!(table.len(), ProductTable::default().len());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(matches!(
            CruiseConfig::parse("[cruise\nregion = "),
            Err(VolumeError::Toml(_))
        ));
    }

    #[test]
    fn test_table_scaling_flag() {
        let cfg = CruiseConfig::parse(
            r#"
            [merch_rule]
            table_scaling = false
            "#,
        )
        .unwrap();
        assert_eq!(
            cfg.merch_rules().unwrap().scaling,
            ScalingBasis::FactorBased
        );
    }
}
