// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregation of holdings into category totals and the fixed-ratio
//! allocation policy applied on top of them.
//!
//! Everything here is pure. Totals and recommendations are rebuilt from the
//! current holdings on every call and never cached.

use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::errors::LedgerError;
use crate::models::{Category, CategoryTotals, Holding, Recommendation, Target};

/// Process-wide allocation policy. There is no way to change it at runtime.
pub static POLICY: Lazy<Policy> = Lazy::new(Policy::standard);

/// Rounds to two places, half away from zero, and pins the scale at two so
/// `1000` renders as `1000.00`.
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Sums holdings per category. Summation is exact; only the final per-category
/// sums and the grand total are rounded.
pub fn aggregate(holdings: &[Holding]) -> Result<CategoryTotals, LedgerError> {
    let mut sums = [Decimal::ZERO; 4];
    for holding in holdings {
        let slot = &mut sums[holding.category.index()];
        *slot = slot
            .checked_add(holding.amount)
            .ok_or(LedgerError::Overflow("category totals"))?;
    }
    let grand = sums.iter().try_fold(Decimal::ZERO, |acc, s| {
        acc.checked_add(*s)
            .ok_or(LedgerError::Overflow("grand total"))
    })?;

    Ok(CategoryTotals {
        nasdaq: round2(sums[Category::Nasdaq.index()]),
        sp: round2(sums[Category::Sp.index()]),
        conservative: round2(sums[Category::Conservative.index()]),
        cash: round2(sums[Category::Cash.index()]),
        grand: round2(grand),
    })
}

/// Applies [`POLICY`] to `totals`.
pub fn recommend(totals: &CategoryTotals) -> Result<Recommendation, LedgerError> {
    POLICY.recommend(totals)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Share of the grand total placed in the two growth categories.
    pub risk_ratio: Decimal,
    pub cash_ratio: Decimal,
    pub nasdaq_share_of_risk: Decimal,
    pub sp_share_of_risk: Decimal,
}

impl Policy {
    pub fn standard() -> Self {
        Policy {
            risk_ratio: dec!(0.75),
            cash_ratio: dec!(0.25),
            nasdaq_share_of_risk: dec!(0.77),
            sp_share_of_risk: dec!(0.23),
        }
    }

    pub fn recommend(&self, totals: &CategoryTotals) -> Result<Recommendation, LedgerError> {
        let grand = totals.grand;
        if grand.is_zero() {
            return Err(LedgerError::ZeroTotal);
        }

        // Each step rounds before the next one reads it.
        let mul = |a: Decimal, b: Decimal| {
            a.checked_mul(b)
                .map(round2)
                .ok_or(LedgerError::Overflow("targets"))
        };
        let risk_target = mul(grand, self.risk_ratio)?;
        let nasdaq_target = mul(risk_target, self.nasdaq_share_of_risk)?;
        let sp_target = mul(risk_target, self.sp_share_of_risk)?;
        let cash_target = mul(grand, self.cash_ratio)?;

        let target = |category: Category, amount: Decimal, ratio: Decimal| Target {
            category,
            amount,
            ratio: percent_label(ratio),
            adjustment: amount - totals.get(category),
        };

        Ok(Recommendation {
            current: *totals,
            risk_target,
            targets: vec![
                target(
                    Category::Nasdaq,
                    nasdaq_target,
                    self.risk_ratio * self.nasdaq_share_of_risk,
                ),
                target(
                    Category::Sp,
                    sp_target,
                    self.risk_ratio * self.sp_share_of_risk,
                ),
                target(Category::Cash, cash_target, self.cash_ratio),
            ],
        })
    }

    /// Labels straight from the ratios, independent of any portfolio.
    pub fn ratio_labels(&self) -> [(Category, String); 3] {
        [
            (
                Category::Nasdaq,
                percent_label(self.risk_ratio * self.nasdaq_share_of_risk),
            ),
            (
                Category::Sp,
                percent_label(self.risk_ratio * self.sp_share_of_risk),
            ),
            (Category::Cash, percent_label(self.cash_ratio)),
        ]
    }
}

fn percent_label(ratio: Decimal) -> String {
    format!("{}%", round2(ratio * Decimal::ONE_HUNDRED))
}
