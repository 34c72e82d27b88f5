// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Closed set of holding classifications. The upper-case tokens are what gets
/// stored and serialized; they must not change between versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// First growth category.
    Nasdaq,
    /// Second growth category.
    Sp,
    /// Defensive holdings, reported but never targeted.
    Conservative,
    Cash,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Nasdaq,
        Category::Sp,
        Category::Conservative,
        Category::Cash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Nasdaq => "NASDAQ",
            Category::Sp => "SP",
            Category::Conservative => "CONSERVATIVE",
            Category::Cash => "CASH",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Nasdaq => "Nasdaq",
            Category::Sp => "S&P",
            Category::Conservative => "Conservative",
            Category::Cash => "Cash",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Category::Nasdaq => 0,
            Category::Sp => 1,
            Category::Conservative => 2,
            Category::Cash => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| LedgerError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: i64,
    pub category: Category,
    pub label: String,
    pub amount: Decimal,
}

/// Per-category sums plus their grand total, all at two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotals {
    pub nasdaq: Decimal,
    pub sp: Decimal,
    pub conservative: Decimal,
    pub cash: Decimal,
    pub grand: Decimal,
}

impl CategoryTotals {
    pub fn get(&self, category: Category) -> Decimal {
        match category {
            Category::Nasdaq => self.nasdaq,
            Category::Sp => self.sp,
            Category::Conservative => self.conservative,
            Category::Cash => self.cash,
        }
    }
}

/// Policy target for one category. `adjustment` is `amount - current`:
/// positive means add to the category, negative means reduce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub category: Category,
    pub amount: Decimal,
    pub ratio: String,
    pub adjustment: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub current: CategoryTotals,
    pub risk_target: Decimal,
    pub targets: Vec<Target>,
}

impl Recommendation {
    pub fn target_for(&self, category: Category) -> Option<&Target> {
        self.targets.iter().find(|t| t.category == category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub id: i64,
    pub recorded_at: DateTime<Utc>,
    pub grand_total: Decimal,
    pub nasdaq_total: Decimal,
    pub sp_total: Decimal,
    pub conservative_total: Decimal,
    pub cash_total: Decimal,
}

impl HistorySnapshot {
    pub fn total_for(&self, category: Category) -> Decimal {
        match category {
            Category::Nasdaq => self.nasdaq_total,
            Category::Sp => self.sp_total,
            Category::Conservative => self.conservative_total,
            Category::Cash => self.cash_total,
        }
    }

    /// Percentage of the grand total held in `category`, one decimal place.
    pub fn share(&self, category: Category) -> Option<Decimal> {
        if self.grand_total.is_zero() {
            return None;
        }
        let ratio = self.total_for(category).checked_div(self.grand_total)?;
        Some(
            (ratio * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}
