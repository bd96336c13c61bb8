use crate::config::PricingConfig;
use crate::models::seat::row_label;
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    Premium,
    Standard,
    Economy,
}

impl PriceTier {
    pub const ALL: [PriceTier; 3] = [PriceTier::Premium, PriceTier::Standard, PriceTier::Economy];

    pub fn name(self) -> &'static str {
        match self {
            PriceTier::Premium => "Premium",
            PriceTier::Standard => "Standard",
            PriceTier::Economy => "Economy",
        }
    }
}

/// One line of the price legend, e.g. `Premium (A-C)` at 1000.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierLegend {
    pub tier: PriceTier,
    pub label: String,
    pub rows: String,
    pub price: u32,
}

impl PricingConfig {
    pub fn tier_of(&self, row: usize) -> PriceTier {
        if row < self.premium_rows {
            PriceTier::Premium
        } else if row < self.standard_rows {
            PriceTier::Standard
        } else {
            PriceTier::Economy
        }
    }

    pub fn price_of_tier(&self, tier: PriceTier) -> u32 {
        match tier {
            PriceTier::Premium => self.premium_price,
            PriceTier::Standard => self.standard_price,
            PriceTier::Economy => self.economy_price,
        }
    }

    pub fn price_of(&self, row: usize) -> u32 {
        self.price_of_tier(self.tier_of(row))
    }

    /// Rows covered by `tier` in a venue with `total_rows` rows, `None` when
    /// the tier is empty there.
    pub fn rows_of(&self, tier: PriceTier, total_rows: usize) -> Option<Range<usize>> {
        let premium_end = self.premium_rows.min(total_rows);
        let standard_end = self.standard_rows.min(total_rows).max(premium_end);
        let range = match tier {
            PriceTier::Premium => 0..premium_end,
            PriceTier::Standard => premium_end..standard_end,
            PriceTier::Economy => standard_end..total_rows,
        };
        (!range.is_empty()).then_some(range)
    }

    pub fn legend(&self, total_rows: usize) -> Vec<TierLegend> {
        PriceTier::ALL
            .into_iter()
            .filter_map(|tier| {
                let range = self.rows_of(tier, total_rows)?;
                let first = row_label(range.start);
                let last = row_label(range.end - 1);
                let rows = if range.len() == 1 {
                    first
                } else {
                    format!("{}-{}", first, last)
                };
                Some(TierLegend {
                    tier,
                    label: format!("{} ({})", tier.name(), rows),
                    rows,
                    price: self.price_of_tier(tier),
                })
            })
            .collect()
    }
}
