//! A built-in volume engine with a simplified geometric stem profile.
//!
//! This is not the NVEL taper library. It implements the same buffer
//! contract with a form-class power taper (Ormerod form), Smalian cubic
//! volumes, factor-based Scribner, and the International 1/4-inch rule, so
//! the crate can merchandize and report without linking a native engine.
//! Results are plausible, not equation-certified.

use crate::engine::{EngineRequest, VolumeEngine};
use crate::models::{
    diam_field, log_metric, slot, CalcMode, RawVolumeResult, ScalingBasis, SegmentParity,
    SegmentationOption, MAX_LOGS,
};

/// Cross-section area factor: area (sq ft) = FF * diameter (in) squared.
const FF: f64 = 0.005454154;

/// Default Girard form class when the tree carries none.
const DEFAULT_FORM_CLASS: f64 = 80.0;

/// Default bark ratio (dib/dob) when neither the tree nor the rules give one.
const DEFAULT_BARK_RATIO: f64 = 0.9;

/// Green and dry stem wood densities, pounds per cubic foot.
const GREEN_DENSITY: f64 = 58.0;
const DRY_DENSITY: f64 = 28.0;

#[derive(Debug, Default, Clone)]
pub struct ProfileEngine;

impl ProfileEngine {
    pub fn new() -> Self {
        Self
    }
}

/// Stem profile: dib(h) = dib_bh * ((H - h) / (H - 4.5))^r.
struct Taper {
    dib_bh: f64,
    bark_ratio: f64,
    total_height: f64,
    r: f64,
}

impl Taper {
    fn new(dbh_ob: f64, total_height: f64, form_class: f64, bark_ratio: f64) -> Self {
        let dib_bh = dbh_ob * bark_ratio;
        // Fit the exponent so the profile passes through the form-class
        // point, when the tree is tall enough for that point to constrain
        // anything. Girard form class is dib at 17.3 ft over dob at breast
        // height, so the inside-bark target carries a bark-ratio factor.
        let r = if total_height > 27.3 {
            let target = (form_class / 100.0 / bark_ratio).clamp(0.5, 0.98);
            let span = (total_height - 17.3) / (total_height - 4.5);
            (target.ln() / span.ln()).clamp(0.2, 6.0)
        } else {
            2.0 / 3.0
        };
        Self {
            dib_bh,
            bark_ratio,
            total_height,
            r,
        }
    }

    /// Diameter inside bark at height `h` feet.
    fn dib_at(&self, h: f64) -> f64 {
        if h >= self.total_height {
            return 0.0;
        }
        let rel = (self.total_height - h) / (self.total_height - 4.5);
        self.dib_bh * rel.powf(self.r)
    }

    fn dob_at(&self, h: f64) -> f64 {
        self.dib_at(h) / self.bark_ratio
    }

    /// Height at which the stem tapers to `dib` inches, measured inside
    /// bark. Returns `None` when the stem never reaches that diameter.
    fn height_to_dib(&self, dib: f64) -> Option<f64> {
        if dib <= 0.0 || dib > self.dib_bh {
            return None;
        }
        let rel = (dib / self.dib_bh).powf(1.0 / self.r);
        Some(self.total_height - rel * (self.total_height - 4.5))
    }

    /// Whole-stem cubic volume from the ground to the tip (analytic
    /// integral of the profile).
    fn total_cubic(&self) -> f64 {
        let h = self.total_height;
        let k = FF * self.dib_bh.powi(2) / (h - 4.5).powf(2.0 * self.r);
        k * h.powf(2.0 * self.r + 1.0) / (2.0 * self.r + 1.0)
    }

    /// Smalian cubic volume of a segment between two heights.
    fn smalian(&self, h1: f64, h2: f64) -> f64 {
        let d1 = self.dib_at(h1);
        let d2 = self.dib_at(h2);
        FF * (d1.powi(2) + d2.powi(2)) / 2.0 * (h2 - h1)
    }
}

/// Scribner board-foot volume by the factor formula.
fn scribner_bdft(scale_diam: f64, length: f64, scaling: ScalingBasis) -> f64 {
    let bd = (0.79 * scale_diam.powi(2) - 2.0 * scale_diam - 4.0) * length / 16.0;
    let bd = bd.max(0.0);
    match scaling {
        // Decimal C reports in tens of board feet.
        ScalingBasis::TableDecimalC => (bd / 10.0).round() * 10.0,
        ScalingBasis::FactorBased => bd,
    }
}

/// International 1/4-inch board-foot volume (standard polynomial).
fn international_bdft(scale_diam: f64, length: f64) -> f64 {
    let d = scale_diam;
    let l = length;
    let v = 0.049621 * l * d.powi(2) + 0.006220 * l.powi(2) * d - 0.185476 * l * d
        + 0.000259 * l.powi(3)
        - 0.011592 * l.powi(2)
        + 0.041666 * l;
    v.max(0.0)
}

impl VolumeEngine for ProfileEngine {
    fn compute(&self, request: &EngineRequest<'_>, out: &mut RawVolumeResult) -> i32 {
        let tree = request.tree;
        let rules = request.rules;

        if request.vol_eq.trim().is_empty() {
            return 1;
        }
        if tree.dbh_ob < 1.0 {
            return 3;
        }
        if tree.total_height < 4.5 {
            return 4;
        }
        if rules.min_top_primary >= tree.dbh_ob {
            return 13;
        }

        let form_class = if tree.form_class > 0 {
            tree.form_class as f64
        } else {
            DEFAULT_FORM_CLASS
        };
        let bark_ratio = [rules.bark_ratio, tree.bark_ratio]
            .into_iter()
            .find(|&b| b > 0.0)
            .unwrap_or(DEFAULT_BARK_RATIO);

        let taper = Taper::new(tree.dbh_ob, tree.total_height, form_class, bark_ratio);

        // Primary-product top: explicit height wins, then taper to the
        // minimum top diameter, then a broken top caps everything.
        let mut top_primary = if tree.height_primary > 0.0 {
            tree.height_primary
        } else {
            taper
                .height_to_dib(rules.min_top_primary)
                .unwrap_or(rules.stump)
        };
        if tree.broken_height > 0.0 {
            top_primary = top_primary.min(tree.broken_height);
        }

        let merch_len = top_primary - rules.stump;
        if merch_len < rules.merch_len {
            // Below minimum merchantable length: whole-stem volume only.
            out.summary[slot::CUFT_STUMP] = taper.smalian(0.0, rules.stump);
            out.summary[slot::CUFT_TIP] =
                taper.total_cubic() - out.summary[slot::CUFT_STUMP];
            out.summary[slot::CUFT_TOTAL] = taper.total_cubic();
            fill_biomass(out, taper.total_cubic());
            return 0;
        }

        // Segment lengths, stump upward. Each log consumes its length plus
        // the trim allowance along the stem.
        let lengths = match request.mode {
            CalcMode::Cruise => segment_lengths(merch_len, rules),
            CalcMode::VariableLength => out
                .log_len
                .iter()
                .copied()
                .take_while(|&l| l > 0.0)
                .collect(),
        };

        let mut cursor = rules.stump;
        out.bole_height[0] = rules.stump;
        let mut n = 0usize;
        for len in lengths {
            if n >= MAX_LOGS || cursor + len > top_primary + 0.01 {
                break;
            }
            out.log_len[n] = len;
            out.bole_height[n + 1] = cursor + len;
            cursor += len + rules.trim;
            n += 1;
        }
        for stale in out.log_len.iter_mut().skip(n) {
            *stale = 0.0;
        }
        let primary_logs = n;

        // Secondary product (topwood) between the primary top and the
        // secondary minimum diameter, as a single segment.
        let mut secondary_logs = 0usize;
        if rules.min_top_secondary > 0.0 && n < MAX_LOGS {
            if let Some(top_secondary) = taper.height_to_dib(rules.min_top_secondary) {
                let top_secondary = if tree.height_secondary > 0.0 {
                    tree.height_secondary
                } else {
                    top_secondary
                };
                let sec_len = top_secondary - cursor;
                if sec_len >= rules.min_len_top {
                    out.log_len[n] = sec_len;
                    out.bole_height[n + 1] = cursor + sec_len;
                    cursor += sec_len;
                    secondary_logs = 1;
                    n += 1;
                }
            }
        }
        out.num_logs = n;
        out.num_logs_primary = primary_logs as f64;
        out.num_logs_secondary = secondary_logs as f64;

        // Boundary diameters.
        for i in 0..=n {
            let h = out.bole_height[i];
            let dib = taper.dib_at(h);
            out.log_diam[i][diam_field::SCALE] = dib.floor();
            out.log_diam[i][diam_field::INSIDE_BARK] = dib;
            out.log_diam[i][diam_field::OUTSIDE_BARK] = taper.dob_at(h);
        }

        // Per-log volumes and the summary rollup.
        let net_factor = (1.0 - tree.cull).clamp(0.0, 1.0);
        for i in 0..n {
            let h1 = out.bole_height[i];
            let h2 = out.bole_height[i + 1];
            let len = out.log_len[i];
            let scale = out.log_diam[i + 1][diam_field::SCALE];
            let cuft = taper.smalian(h1, h2);
            let bdft = if scale >= rules.min_bdft_diam && i < primary_logs {
                scribner_bdft(scale, len, rules.scaling)
            } else {
                0.0
            };
            let intl = if i < primary_logs {
                international_bdft(scale, len)
            } else {
                0.0
            };

            out.log_vol[log_metric::GROSS_CUFT][i] = cuft;
            out.log_vol[log_metric::NET_CUFT][i] = cuft * net_factor;
            out.log_vol[log_metric::GROSS_BDFT][i] = bdft;
            out.log_vol[log_metric::NET_BDFT][i] = bdft * net_factor;
            out.log_vol[log_metric::GROSS_INTL][i] = intl;

            if i < primary_logs {
                out.summary[slot::CUFT_GROSS_PRIM] += cuft;
                out.summary[slot::BDFT_GROSS_PRIM] += bdft;
                out.summary[slot::BDFT_GROSS_INTL] += intl;
            } else {
                out.summary[slot::CUFT_GROSS_SEC] += cuft;
            }
        }
        out.summary[slot::CUFT_NET_PRIM] = out.summary[slot::CUFT_GROSS_PRIM] * net_factor;
        out.summary[slot::BDFT_NET_PRIM] = out.summary[slot::BDFT_GROSS_PRIM] * net_factor;
        out.summary[slot::BDFT_NET_INTL] = out.summary[slot::BDFT_GROSS_INTL] * net_factor;
        out.summary[slot::CUFT_NET_SEC] = out.summary[slot::CUFT_GROSS_SEC] * net_factor;

        out.summary[slot::CUFT_STUMP] = taper.smalian(0.0, rules.stump);
        let tip_diam = taper.dib_at(cursor);
        out.summary[slot::CUFT_TIP] =
            FF * tip_diam.powi(2) * (tree.total_height - cursor) / 3.0;
        out.summary[slot::CUFT_TOTAL] = out.summary[slot::CUFT_STUMP]
            + out.summary[slot::CUFT_GROSS_PRIM]
            + out.summary[slot::CUFT_GROSS_SEC]
            + out.summary[slot::CUFT_TIP];

        fill_biomass(out, out.summary[slot::CUFT_TOTAL]);
        0
    }
}

/// Cut the merchantable length into segments per the rules.
fn segment_lengths(merch_len: f64, rules: &crate::models::MerchRules) -> Vec<f64> {
    let mut lengths = Vec::new();
    let mut remaining = merch_len;
    while remaining >= rules.max_len + rules.trim && lengths.len() < MAX_LOGS {
        lengths.push(rules.max_len);
        remaining -= rules.max_len + rules.trim;
    }

    let mut leftover = (remaining - rules.trim).max(0.0).floor();
    if rules.parity == SegmentParity::EvenOnly {
        leftover = (leftover / 2.0).floor() * 2.0;
    }

    use SegmentationOption::*;
    if leftover >= rules.min_len {
        lengths.push(leftover);
    } else if leftover > 0.0 {
        // Top segment shorter than the minimum: the option decides.
        match rules.option {
            FixedShortCombined | NominalShortCombined => {
                // Scaled with the previous segment.
                if let Some(last) = lengths.last_mut() {
                    *last += leftover;
                } else {
                    lengths.push(leftover);
                }
            }
            FixedShortAlone | NominalShortAlone => lengths.push(leftover),
            FixedShortHalf | NominalShortHalf => {
                let half = (leftover / 2.0).floor();
                if half > 0.0 {
                    lengths.push(half);
                }
            }
        }
    }
    lengths
}

fn fill_biomass(out: &mut RawVolumeResult, total_cuft: f64) {
    out.green_biomass[0] = total_cuft * GREEN_DENSITY;
    out.dry_biomass[0] = total_cuft * DRY_DENSITY;
}
