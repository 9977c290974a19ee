//! Low-stock evaluation for stock-keeping locations

use crate::{
    error::AppResult,
    models::movement::LowStockItem,
    repository::Repository,
};

/// An asset type is flagged when a threshold is configured and the count has
/// fallen to or below it. `None` and 0 both mean "not watched".
fn is_low(min_quantity: Option<i32>, count: i64) -> bool {
    match min_quantity {
        Some(min) if min > 0 => count <= min as i64,
        _ => false,
    }
}

/// Units missing to get back to the threshold, clamped at zero for the
/// boundary case where the count sits exactly on the minimum.
fn deficit(min_quantity: i32, count: i64) -> i64 {
    (min_quantity as i64 - count).max(0)
}

#[derive(Clone)]
pub struct StockService {
    repository: Repository,
}

impl StockService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Evaluate the given asset types at one location. Read-only and
    /// order-independent; returns one item per type at or below its
    /// threshold. Non-store locations never produce warnings.
    pub async fn evaluate(
        &self,
        location_id: i32,
        asset_type_ids: &[i32],
    ) -> AppResult<Vec<LowStockItem>> {
        let location = self.repository.locations.get_by_id(location_id).await?;
        if !location.kind.is_store() {
            return Ok(Vec::new());
        }

        let types = self.repository.asset_types.get_many(asset_type_ids).await?;

        let mut items = Vec::new();
        for asset_type in types {
            let Some(min_quantity) = asset_type.min_quantity.filter(|m| *m > 0) else {
                continue;
            };

            let count = self
                .repository
                .assets
                .count_at_location(asset_type.id, location_id)
                .await?;

            if is_low(Some(min_quantity), count) {
                items.push(LowStockItem {
                    asset_type_id: asset_type.id,
                    name: asset_type.name,
                    configuration: asset_type.configuration,
                    current_quantity: count,
                    min_quantity,
                    deficit: deficit(min_quantity, count),
                });
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_at_threshold_is_flagged_with_zero_deficit() {
        assert!(is_low(Some(5), 5));
        assert_eq!(deficit(5, 5), 0);
    }

    #[test]
    fn count_above_threshold_is_not_flagged() {
        assert!(!is_low(Some(5), 6));
    }

    #[test]
    fn count_below_threshold_reports_the_shortfall() {
        assert!(is_low(Some(5), 2));
        assert_eq!(deficit(5, 2), 3);
    }

    #[test]
    fn unset_or_zero_threshold_never_flags() {
        assert!(!is_low(None, 0));
        assert!(!is_low(Some(0), 0));
        assert!(!is_low(None, 100));
    }

    #[test]
    fn deficit_never_goes_negative() {
        assert_eq!(deficit(5, 9), 0);
    }
}
