//! Token supply, stage pricing and the allocation preview

use serde::{Deserialize, Serialize};

use super::{active, default_true, optional_count, optional_decimal};
use crate::error::{Error, Result};

/// Number of presale price stages
pub const STAGE_COUNT: usize = 5;

/// Pricing and supply configuration
///
/// Missing, `null` and zero values read as the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredTokenomics")]
pub struct Tokenomics {
    pub total_supply: u64,
    pub presale_stage1_price: f64,
    pub presale_stage2_price: f64,
    pub presale_stage3_price: f64,
    pub presale_stage4_price: f64,
    pub presale_stage5_price: f64,
    pub public_sale_price: f64,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Tokenomics row as the backend returns it
#[derive(Deserialize)]
struct StoredTokenomics {
    #[serde(default, deserialize_with = "optional_count")]
    total_supply: Option<u64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    presale_stage1_price: Option<f64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    presale_stage2_price: Option<f64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    presale_stage3_price: Option<f64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    presale_stage4_price: Option<f64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    presale_stage5_price: Option<f64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    public_sale_price: Option<f64>,
    #[serde(default = "default_true", deserialize_with = "active")]
    is_active: bool,
    #[serde(default)]
    updated_at: Option<String>,
}

impl From<StoredTokenomics> for Tokenomics {
    fn from(row: StoredTokenomics) -> Self {
        let price = |value: Option<f64>, fallback: fn() -> f64| {
            value.filter(|p| *p != 0.0).unwrap_or_else(fallback)
        };
        Self {
            total_supply: row
                .total_supply
                .filter(|s| *s != 0)
                .unwrap_or_else(default_total_supply),
            presale_stage1_price: price(row.presale_stage1_price, default_stage1),
            presale_stage2_price: price(row.presale_stage2_price, default_stage2),
            presale_stage3_price: price(row.presale_stage3_price, default_stage3),
            presale_stage4_price: price(row.presale_stage4_price, default_stage4),
            presale_stage5_price: price(row.presale_stage5_price, default_stage5),
            public_sale_price: price(row.public_sale_price, default_public_price),
            is_active: row.is_active,
            updated_at: row.updated_at,
        }
    }
}

fn default_total_supply() -> u64 {
    1_000_000_000
}

fn default_stage1() -> f64 {
    0.001
}

fn default_stage2() -> f64 {
    0.002
}

fn default_stage3() -> f64 {
    0.003
}

fn default_stage4() -> f64 {
    0.004
}

fn default_stage5() -> f64 {
    0.005
}

fn default_public_price() -> f64 {
    0.01
}

impl Default for Tokenomics {
    fn default() -> Self {
        Self {
            total_supply: default_total_supply(),
            presale_stage1_price: default_stage1(),
            presale_stage2_price: default_stage2(),
            presale_stage3_price: default_stage3(),
            presale_stage4_price: default_stage4(),
            presale_stage5_price: default_stage5(),
            public_sale_price: default_public_price(),
            is_active: true,
            updated_at: None,
        }
    }
}

impl Tokenomics {
    pub fn stage_prices(&self) -> [f64; STAGE_COUNT] {
        [
            self.presale_stage1_price,
            self.presale_stage2_price,
            self.presale_stage3_price,
            self.presale_stage4_price,
            self.presale_stage5_price,
        ]
    }

    /// Set the price of a 1-based stage
    pub fn set_stage_price(&mut self, stage: usize, price: f64) -> Result<()> {
        let slot = match stage {
            1 => &mut self.presale_stage1_price,
            2 => &mut self.presale_stage2_price,
            3 => &mut self.presale_stage3_price,
            4 => &mut self.presale_stage4_price,
            5 => &mut self.presale_stage5_price,
            _ => {
                return Err(Error::validation(format!(
                    "Stage must be between 1 and {}",
                    STAGE_COUNT
                )))
            }
        };
        *slot = price;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_supply == 0 {
            return Err(Error::validation("Total supply must be greater than 0"));
        }
        for (index, price) in self.stage_prices().iter().enumerate() {
            if !price.is_finite() || *price < 0.0 {
                return Err(Error::validation(format!(
                    "Stage {} price must be a non-negative number",
                    index + 1
                )));
            }
        }
        if !self.public_sale_price.is_finite() || self.public_sale_price < 0.0 {
            return Err(Error::validation(
                "Public sale price must be a non-negative number",
            ));
        }
        Ok(())
    }

    pub fn distribution(&self) -> Distribution {
        Distribution::for_supply(self.total_supply)
    }
}

/// Allocation of the total supply. Preview only, never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub team: u64,
    pub presale: u64,
    pub liquidity: u64,
    pub marketing: u64,
    pub reserve: u64,
    pub community: u64,
}

impl Distribution {
    /// Category name and share of supply in percent
    pub const SHARES: [(&'static str, u64); 6] = [
        ("Team", 15),
        ("Presale", 30),
        ("Liquidity", 20),
        ("Marketing", 10),
        ("Reserve", 15),
        ("Community", 10),
    ];

    /// Floor of each category's share of `total_supply`
    pub fn for_supply(total_supply: u64) -> Self {
        let share = |percent: u64| ((total_supply as u128 * percent as u128) / 100) as u64;
        Self {
            team: share(15),
            presale: share(30),
            liquidity: share(20),
            marketing: share(10),
            reserve: share(15),
            community: share(10),
        }
    }

    /// Rows of (category, percent, amount) in display order
    pub fn rows(&self) -> [(&'static str, u64, u64); 6] {
        let amounts = [
            self.team,
            self.presale,
            self.liquidity,
            self.marketing,
            self.reserve,
            self.community,
        ];
        let mut rows = [("", 0, 0); 6];
        for (i, ((name, percent), amount)) in Self::SHARES.iter().zip(amounts).enumerate() {
            rows[i] = (*name, *percent, amount);
        }
        rows
    }

    pub fn total(&self) -> u64 {
        self.team + self.presale + self.liquidity + self.marketing + self.reserve + self.community
    }
}
