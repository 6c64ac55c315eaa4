//! Stock classification engine.
//!
//! Classifies a product's stock level into a tier, and aggregates tiers into
//! statistics and sorted alert lists. All functions here are pure and
//! deterministic; the only side effect is an anomaly warning when a negative
//! stock value is observed.

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Stock at or below this level (but above zero) counts as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Cap on how much a single cart line can request in one add-to-cart action.
///
/// Display/UX cap only; the correctness invariant is quantity <= stock.
pub const PER_LINE_PURCHASE_CAP: i64 = 10;

/// Stock tier for a product, ordered by urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockTier {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockTier {
    /// Severity for alert ordering: higher is more urgent.
    pub fn severity(self) -> u8 {
        match self {
            StockTier::InStock => 1,
            StockTier::LowStock => 2,
            StockTier::OutOfStock => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockTier::InStock => "in-stock",
            StockTier::LowStock => "low-stock",
            StockTier::OutOfStock => "out-of-stock",
        }
    }
}

/// Classify a stock level into its tier.
///
/// Negative stock cannot occur in a consistent read; if observed it is
/// reported as a data anomaly and classified out-of-stock rather than
/// computing a wrong severity.
pub fn classify(stock: i64) -> StockTier {
    if stock < 0 {
        tracing::warn!(stock, "negative stock observed; treating as out-of-stock");
        return StockTier::OutOfStock;
    }
    if stock == 0 {
        StockTier::OutOfStock
    } else if stock <= LOW_STOCK_THRESHOLD {
        StockTier::LowStock
    } else {
        StockTier::InStock
    }
}

/// Aggregate stock statistics, derived on every fetch and never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockStats {
    pub total_products: u64,
    pub low_stock_count: u64,
    pub out_of_stock_count: u64,
    /// Sum of stock * price over all products, in cents.
    pub total_value_cents: u64,
}

/// Single-pass accumulation of counts and total inventory value.
///
/// An empty product list yields all-zero stats. A negative stock line
/// (backend inconsistency) counts as out-of-stock and contributes zero value.
pub fn aggregate(products: &[Product]) -> StockStats {
    products.iter().fold(StockStats::default(), |mut acc, p| {
        acc.total_products += 1;
        match classify(p.stock) {
            StockTier::LowStock => acc.low_stock_count += 1,
            StockTier::OutOfStock => acc.out_of_stock_count += 1,
            StockTier::InStock => {}
        }
        acc.total_value_cents += p.stock.max(0) as u64 * p.price_cents;
        acc
    })
}

/// Products needing attention (stock <= threshold), most urgent first.
///
/// Sorted by severity descending, then stock ascending, then product id
/// ascending so that equal-severity items have a deterministic order.
pub fn alert_list(products: &[Product]) -> Vec<Product> {
    let mut alerts: Vec<Product> = products
        .iter()
        .filter(|p| p.stock <= LOW_STOCK_THRESHOLD)
        .cloned()
        .collect();

    alerts.sort_by(|a, b| {
        classify(b.stock)
            .severity()
            .cmp(&classify(a.stock).severity())
            .then(a.stock.cmp(&b.stock))
            .then(a.id.cmp(&b.id))
    });

    alerts
}

/// Bound on how much of a product one add-to-cart action may request.
pub fn max_purchasable(product: &Product) -> i64 {
    product.stock.clamp(0, PER_LINE_PURCHASE_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockflow_core::ProductId;

    fn product(stock: i64, price_cents: u64) -> Product {
        Product {
            id: ProductId::new(),
            name: format!("product-{stock}"),
            description: None,
            price_cents,
            stock,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn classify_buckets_by_threshold() {
        assert_eq!(classify(0), StockTier::OutOfStock);
        assert_eq!(classify(1), StockTier::LowStock);
        assert_eq!(classify(10), StockTier::LowStock);
        assert_eq!(classify(11), StockTier::InStock);
    }

    #[test]
    fn classify_treats_negative_stock_as_out_of_stock() {
        assert_eq!(classify(-3), StockTier::OutOfStock);
    }

    #[test]
    fn aggregate_of_empty_list_is_all_zero() {
        assert_eq!(aggregate(&[]), StockStats::default());
    }

    #[test]
    fn aggregate_counts_and_values() {
        let products = vec![
            product(0, 500),
            product(5, 1000),
            product(20, 250),
        ];
        let stats = aggregate(&products);
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.out_of_stock_count, 1);
        assert_eq!(stats.low_stock_count, 1);
        assert_eq!(stats.total_value_cents, 5 * 1000 + 20 * 250);
    }

    #[test]
    fn aggregate_is_idempotent() {
        let products = vec![product(3, 100), product(0, 900)];
        assert_eq!(aggregate(&products), aggregate(&products));
    }

    #[test]
    fn alert_list_contains_exactly_threshold_breaches_most_urgent_first() {
        let products = vec![
            product(7, 100),
            product(0, 100),
            product(25, 100),
            product(2, 100),
            product(0, 100),
        ];
        let alerts = alert_list(&products);

        assert_eq!(alerts.len(), 4);
        assert!(alerts.iter().all(|p| p.stock <= LOW_STOCK_THRESHOLD));
        // Out-of-stock first, then low stock ascending.
        assert_eq!(alerts[0].stock, 0);
        assert_eq!(alerts[1].stock, 0);
        assert_eq!(alerts[2].stock, 2);
        assert_eq!(alerts[3].stock, 7);
        // Equal-severity, equal-stock entries are ordered by product id.
        assert!(alerts[0].id <= alerts[1].id);
    }

    #[test]
    fn alert_list_is_empty_once_alerts_are_resolved() {
        let products = vec![product(11, 100), product(40, 100)];
        assert!(alert_list(&products).is_empty());
    }

    #[test]
    fn max_purchasable_is_capped_at_ten() {
        assert_eq!(max_purchasable(&product(3, 100)), 3);
        assert_eq!(max_purchasable(&product(10, 100)), 10);
        assert_eq!(max_purchasable(&product(250, 100)), 10);
        assert_eq!(max_purchasable(&product(0, 100)), 0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: severity is 3 iff stock == 0, 2 iff 0 < stock <= 10,
            /// 1 iff stock > 10 (for non-negative stock).
            #[test]
            fn classify_severity_mapping(stock in 0i64..100_000) {
                let severity = classify(stock).severity();
                if stock == 0 {
                    prop_assert_eq!(severity, 3);
                } else if stock <= LOW_STOCK_THRESHOLD {
                    prop_assert_eq!(severity, 2);
                } else {
                    prop_assert_eq!(severity, 1);
                }
            }

            /// Property: the three tiers partition the product list and the
            /// total value is the sum of stock * price.
            #[test]
            fn aggregate_partitions_and_sums(
                stocks in prop::collection::vec((0i64..500, 0u64..10_000), 0..50)
            ) {
                let products: Vec<Product> =
                    stocks.iter().map(|&(s, p)| product(s, p)).collect();
                let stats = aggregate(&products);

                let in_stock = products
                    .iter()
                    .filter(|p| p.stock > LOW_STOCK_THRESHOLD)
                    .count() as u64;
                prop_assert_eq!(
                    stats.low_stock_count + stats.out_of_stock_count + in_stock,
                    products.len() as u64
                );

                let expected_value: u64 = products
                    .iter()
                    .map(|p| p.stock as u64 * p.price_cents)
                    .sum();
                prop_assert_eq!(stats.total_value_cents, expected_value);
            }

            /// Property: alert_list returns exactly the threshold breaches,
            /// with severities non-increasing.
            #[test]
            fn alert_list_membership_and_order(
                stocks in prop::collection::vec(0i64..50, 0..40)
            ) {
                let products: Vec<Product> =
                    stocks.iter().map(|&s| product(s, 100)).collect();
                let alerts = alert_list(&products);

                let expected = products
                    .iter()
                    .filter(|p| p.stock <= LOW_STOCK_THRESHOLD)
                    .count();
                prop_assert_eq!(alerts.len(), expected);

                for pair in alerts.windows(2) {
                    prop_assert!(
                        classify(pair[0].stock).severity()
                            >= classify(pair[1].stock).severity()
                    );
                }
            }
        }
    }
}
