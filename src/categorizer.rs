use serde::Serialize;

use crate::models::{DepositCategory, Transaction};
use crate::settings::Thresholds;
use crate::stats;

/// Keyword rules, checked in order; the first hit wins.
const RULES: &[(&[&str], DepositCategory)] = &[
    (&["WIRE", "ORIG:"], DepositCategory::Wire),
    (&["ACH"], DepositCategory::Ach),
    (&["CASH", "ATM"], DepositCategory::Cash),
    (&["CARD", "MERCHANT"], DepositCategory::Card),
];

pub fn categorize(description: &str) -> DepositCategory {
    let desc = description.to_uppercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| desc.contains(kw)))
        .map(|(_, cat)| *cat)
        .unwrap_or(DepositCategory::Other)
}

// ---------------------------------------------------------------------------
// Deposit categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub total: f64,
    pub count: usize,
    pub pct_of_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DepositCategories {
    pub ach: CategoryTotals,
    pub wire: CategoryTotals,
    pub cash: CategoryTotals,
    pub card: CategoryTotals,
    pub other: CategoryTotals,
    pub total_categorized: f64,
}

impl DepositCategories {
    pub fn get(&self, category: DepositCategory) -> &CategoryTotals {
        match category {
            DepositCategory::Ach => &self.ach,
            DepositCategory::Wire => &self.wire,
            DepositCategory::Cash => &self.cash,
            DepositCategory::Card => &self.card,
            DepositCategory::Other => &self.other,
        }
    }

    fn get_mut(&mut self, category: DepositCategory) -> &mut CategoryTotals {
        match category {
            DepositCategory::Ach => &mut self.ach,
            DepositCategory::Wire => &mut self.wire,
            DepositCategory::Cash => &mut self.cash,
            DepositCategory::Card => &mut self.card,
            DepositCategory::Other => &mut self.other,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (DepositCategory, &CategoryTotals)> + '_ {
        DepositCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Totals deposits per category. Withdrawals are not categorized.
pub fn categorize_deposits(transactions: &[Transaction]) -> Option<DepositCategories> {
    if transactions.is_empty() {
        return None;
    }
    let mut cats = DepositCategories::default();

    for txn in transactions.iter().filter(|t| t.is_deposit()) {
        let slot = cats.get_mut(categorize(&txn.description));
        slot.total += txn.amount;
        slot.count += 1;
        cats.total_categorized += txn.amount;
    }

    let total = cats.total_categorized;
    for cat in DepositCategory::ALL {
        let slot = cats.get_mut(cat);
        slot.pct_of_total = stats::pct_of(slot.total, total);
    }
    Some(cats)
}

// ---------------------------------------------------------------------------
// Large deposits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LargeDeposits {
    pub threshold: f64,
    pub count: usize,
    pub total: f64,
    pub pct_from_large: f64,
    pub largest: f64,
    pub mean: f64,
    pub std: f64,
}

/// Flags deposits more than `outlier_std_devs` population standard deviations
/// above the mean deposit.
pub fn analyze_large_deposits(transactions: &[Transaction], thresholds: &Thresholds) -> Option<LargeDeposits> {
    let deposits: Vec<f64> = transactions
        .iter()
        .filter(|t| t.is_deposit())
        .map(|t| t.amount)
        .collect();
    if deposits.is_empty() {
        return None;
    }

    let mean = stats::mean(&deposits);
    let std = stats::population_std(&deposits);
    let threshold = mean + thresholds.outlier_std_devs * std;

    let large: Vec<f64> = deposits.iter().copied().filter(|d| *d > threshold).collect();
    let total: f64 = large.iter().sum();
    let all: f64 = deposits.iter().sum();

    Some(LargeDeposits {
        threshold,
        count: large.len(),
        total,
        pct_from_large: stats::pct_of(total, all),
        largest: stats::max(&deposits),
        mean,
        std,
    })
}
