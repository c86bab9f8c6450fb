//! Read-only sales metrics over a set of validated transactions.

use crate::money::Money;
use crate::transaction::{Region, RegionKey, Transaction};
use log::warn;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Number of products returned by [`top_products`] when the caller has no
/// preference.
pub const DEFAULT_TOP_N: usize = 5;

/// Sales figures for one region bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSales {
    pub region: RegionKey,
    pub total_sales: Money,
    pub transaction_count: usize,

    /// Share of the grand total, two decimal places.
    pub percentage: Decimal,
}

/// Totals for one product name.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    pub product_name: String,
    pub total_quantity: i64,
    pub total_revenue: Money,
}

/// Sum of quantity × unit price, rounded to two decimal places.
///
/// The sum saturates at [`Money::MAX`].
pub fn total_revenue(transactions: &[Transaction]) -> Money {
    transactions
        .iter()
        .map(Transaction::amount)
        .sum::<Money>()
        .round_cents()
}

/// Sales per region.
///
/// The four known regions are always listed, in North, South, East, West
/// order. Transactions with an empty region are ignored. Any other region
/// name is collected under [`RegionKey::Other`], which is appended only when
/// it saw at least one transaction.
pub fn region_wise_sales(transactions: &[Transaction]) -> Vec<RegionSales> {
    let mut totals: HashMap<RegionKey, (Money, usize)> = HashMap::new();
    let mut grand_total = Money::ZERO;

    for tx in transactions {
        let Some(key) = RegionKey::classify(&tx.region) else {
            continue;
        };
        if key == RegionKey::Other {
            warn!(
                "Transaction {}: unrecognized region '{}', counted as Other",
                tx.transaction_id, tx.region
            );
        }

        let amount = tx.amount();
        let entry = totals.entry(key).or_insert((Money::ZERO, 0));
        entry.0 += amount;
        entry.1 += 1;
        grand_total += amount;
    }

    let mut keys: Vec<RegionKey> = Region::ALL.iter().copied().map(RegionKey::Known).collect();
    if totals.contains_key(&RegionKey::Other) {
        keys.push(RegionKey::Other);
    }

    keys.into_iter()
        .map(|key| {
            let (total_sales, transaction_count) =
                totals.get(&key).copied().unwrap_or((Money::ZERO, 0));
            RegionSales {
                region: key,
                total_sales,
                transaction_count,
                percentage: total_sales.percent_of(grand_total),
            }
        })
        .collect()
}

/// The `n` products with the highest total quantity sold.
///
/// Products are grouped by name. Ties keep the order in which the products
/// first appear. Quantity and revenue totals saturate rather than overflow.
pub fn top_products(transactions: &[Transaction], n: usize) -> Vec<ProductSales> {
    let mut products: Vec<ProductSales> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tx in transactions {
        let slot = *index.entry(tx.product_name.as_str()).or_insert_with(|| {
            products.push(ProductSales {
                product_name: tx.product_name.clone(),
                total_quantity: 0,
                total_revenue: Money::ZERO,
            });
            products.len() - 1
        });

        let product = &mut products[slot];
        product.total_quantity = product.total_quantity.saturating_add(tx.quantity);
        product.total_revenue += tx.amount();
    }

    // sort_by is stable, so equal quantities stay in first-seen order
    products.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    products.truncate(n);
    products
}
