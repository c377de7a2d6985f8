use crate::calc::products::ProductTable;
use crate::calc::sanity::SanityGuard;
use crate::engine::{EngineRequest, VolumeEngine, VolumeEngineAdapter};
use crate::error::VolumeError;
use crate::models::{CalcMode, LogSegment, MerchRules, TreeInput, TreeVolumeResult};

/// Static configuration for a [`VolumeCalculator`].
#[derive(Debug, Clone)]
pub struct CalculatorConfig {
    /// Ten-character volume equation identifier.
    pub vol_eq: String,
    /// USFS region code.
    pub region: u8,
    /// Forest identifier.
    pub forest: String,
    /// District identifier.
    pub district: String,
    /// Primary product code.
    pub product: String,
    /// Calculation mode.
    pub mode: CalcMode,
    /// Merchandizing rules. The rule values for minimum top diameters and
    /// stump height are authoritative; they override anything carried on
    /// the tree.
    pub rules: MerchRules,
    /// Product-class table; `None` disables product aggregation.
    pub product_table: Option<ProductTable>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            vol_eq: String::new(),
            region: 6,
            forest: "12".to_string(),
            district: "01".to_string(),
            product: "01".to_string(),
            mode: CalcMode::Cruise,
            rules: MerchRules::default(),
            product_table: None,
        }
    }
}

/// Orchestrates one tree's volume estimate: engine call, sanity
/// correction, log extraction, product aggregation.
///
/// Owns reusable working buffers through its adapter, so a calculator must
/// not be shared between threads; separate instances are independent and
/// safe to run in parallel. Each [`calc`](Self::calc) call returns a fresh
/// [`TreeVolumeResult`]; nothing carries over between calls.
pub struct VolumeCalculator {
    config: CalculatorConfig,
    sanity: SanityGuard,
    adapter: VolumeEngineAdapter,
}

impl VolumeCalculator {
    pub fn new(engine: Box<dyn VolumeEngine>, config: CalculatorConfig) -> Self {
        Self {
            config,
            sanity: SanityGuard::default(),
            adapter: VolumeEngineAdapter::new(engine),
        }
    }

    /// Replace the sanity guard (e.g. to disable it when debugging raw
    /// engine output).
    pub fn with_sanity(mut self, sanity: SanityGuard) -> Self {
        self.sanity = sanity;
        self
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn rules(&self) -> &MerchRules {
        &self.config.rules
    }

    /// Estimate one tree.
    ///
    /// Configuration problems (for example an empty log-length list in
    /// variable-length mode) are `Err` and the engine is never invoked.
    /// A non-zero engine code is *data*: the result carries the code and
    /// zero-heavy output rather than failing, so batch drivers can decide
    /// per tree.
    pub fn calc(&mut self, tree: &TreeInput) -> Result<TreeVolumeResult, VolumeError> {
        let request = EngineRequest {
            region: self.config.region,
            forest: &self.config.forest,
            district: &self.config.district,
            vol_eq: &self.config.vol_eq,
            product: &self.config.product,
            mode: self.config.mode,
            rules: &self.config.rules,
            tree,
        };
        let error_code = self.adapter.run(&request)?;
        let raw = self.adapter.raw();

        let mut summary = raw.summary;
        let corrections = self
            .sanity
            .apply(&mut summary, tree.dbh_ob, tree.total_height);

        let mut logs: Vec<LogSegment> = (0..raw.num_logs)
            .map(|i| LogSegment::from_raw(raw, i))
            .collect();

        let products = match &self.config.product_table {
            Some(table) => table.aggregate(&mut logs),
            None => Vec::new(),
        };

        let primary = raw.num_logs_primary as usize;
        let merch_height = raw.bole_height[primary.min(raw.bole_height.len() - 1)];

        Ok(TreeVolumeResult {
            summary: summary.to_vec(),
            merch_height,
            num_logs: raw.num_logs,
            num_logs_primary: raw.num_logs_primary,
            num_logs_secondary: raw.num_logs_secondary,
            error_code,
            logs,
            products,
            corrections,
            dry_biomass: raw.dry_biomass.to_vec(),
            green_biomass: raw.green_biomass.to_vec(),
        })
    }
}
