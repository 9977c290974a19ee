//! Transfer engine: validation and execution of asset movements
//!
//! A movement is the only write path for `IndividualAsset.status`,
//! `IndividualAsset.location_id` and the `created -> inProgress` issue
//! transition. All fourteen business checks run before any mutation; the
//! write phase itself is a single transaction in the movements repository.

use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::enums::{status_for_destination, ActionType, AssetStatus, IssueStatus, LocationKind},
    models::issue::Issue,
    models::location::Location,
    models::movement::{
        CreateMovement, LowStockWarning, Movement, MovementDetails, MovementDirection,
        MovementQuery, MovementResult,
    },
    models::user::{Capability, Role, UserClaims},
    models::IndividualAsset,
    repository::movements::TransferWrite,
    repository::Repository,
};

use super::stock::StockService;

/// Pre-validation of a transfer request against the rows it references.
/// Pure over its inputs: the caller fetches, this decides. The first broken
/// rule aborts with a descriptive error; nothing is mutated on any path.
pub fn validate_transfer(
    request: &CreateMovement,
    from: &Location,
    to: &Location,
    assets: &[IndividualAsset],
    issues: &[Issue],
) -> AppResult<()> {
    if request.asset_ids.is_empty() {
        return Err(AppError::Validation(
            "At least one asset must be selected".to_string(),
        ));
    }

    if request.from_location_id == request.to_location_id {
        return Err(AppError::Validation(
            "From and to locations cannot be the same".to_string(),
        ));
    }

    if from.kind == LocationKind::Scrap {
        return Err(AppError::Validation(
            "Cannot transfer assets out of a scrap location".to_string(),
        ));
    }

    match request.action {
        ActionType::Discard if to.kind != LocationKind::Scrap => {
            return Err(AppError::Validation(
                "Discard requires the destination to be a scrap location".to_string(),
            ));
        }
        ActionType::Transfer if to.kind == LocationKind::Scrap => {
            return Err(AppError::Validation(
                "Use the discard action to move assets into scrap".to_string(),
            ));
        }
        _ => {}
    }

    if request.action == ActionType::Discard
        && request.remark.as_deref().map_or(true, |r| r.trim().is_empty())
    {
        return Err(AppError::Validation(
            "A remark is required when discarding assets".to_string(),
        ));
    }

    if assets.len() != request.asset_ids.len() {
        return Err(AppError::NotFound("Some assets were not found".to_string()));
    }

    let not_at_source: Vec<String> = assets
        .iter()
        .filter(|a| a.location_id != request.from_location_id)
        .map(|a| a.serial_number.clone())
        .collect();
    if !not_at_source.is_empty() {
        return Err(AppError::rule(
            "Some assets are not at the source location",
            not_at_source,
        ));
    }

    let discarded: Vec<String> = assets
        .iter()
        .filter(|a| a.status == AssetStatus::Discarded)
        .map(|a| a.serial_number.clone())
        .collect();
    if !discarded.is_empty() {
        return Err(AppError::rule(
            "Cannot move assets that are already discarded",
            discarded,
        ));
    }

    if request.issue_ids.is_empty() {
        return Err(AppError::Validation(
            "A movement must be linked to at least one issue".to_string(),
        ));
    }

    if issues.len() != request.issue_ids.len() {
        return Err(AppError::NotFound("Some issues were not found".to_string()));
    }

    for issue in issues {
        if issue.status != IssueStatus::Created {
            return Err(AppError::rule(
                "Only unresolved issues can be linked to a movement",
                vec![format!("{} ({})", issue.title, issue.status)],
            ));
        }
        if issue.location_id != request.from_location_id {
            return Err(AppError::rule(
                "Linked issue was reported for a different location",
                vec![issue.title.clone()],
            ));
        }
    }

    // Every moved asset must be justified by at least one linked issue.
    let covered: HashSet<i32> = issues.iter().flat_map(|i| i.asset_ids.iter().copied()).collect();
    let uncovered: Vec<String> = assets
        .iter()
        .filter(|a| !covered.contains(&a.id))
        .map(|a| a.serial_number.clone())
        .collect();
    if !uncovered.is_empty() {
        return Err(AppError::rule(
            "Some assets are not covered by any linked issue",
            uncovered,
        ));
    }

    Ok(())
}

#[derive(Clone)]
pub struct TransfersService {
    repository: Repository,
    stock: StockService,
}

impl TransfersService {
    pub fn new(repository: Repository, stock: StockService) -> Self {
        Self { repository, stock }
    }

    /// Validate and execute a transfer/discard, then run the post-commit
    /// low-stock check for stock-keeping source locations.
    pub async fn execute(
        &self,
        claims: &UserClaims,
        mut request: CreateMovement,
    ) -> AppResult<MovementResult> {
        claims.require(Capability::CreateMovement)?;

        // Duplicate ids would defeat the count-based existence checks.
        request.asset_ids.sort_unstable();
        request.asset_ids.dedup();
        request.issue_ids.sort_unstable();
        request.issue_ids.dedup();

        if request.asset_ids.is_empty() {
            return Err(AppError::Validation(
                "At least one asset must be selected".to_string(),
            ));
        }
        if request.from_location_id == request.to_location_id {
            return Err(AppError::Validation(
                "From and to locations cannot be the same".to_string(),
            ));
        }

        let from = self
            .repository
            .locations
            .get_by_id(request.from_location_id)
            .await?;
        let to = self
            .repository
            .locations
            .get_by_id(request.to_location_id)
            .await?;
        let assets = self.repository.assets.get_many(&request.asset_ids).await?;
        let issues = self.repository.issues.get_many(&request.issue_ids).await?;

        validate_transfer(&request, &from, &to, &assets, &issues)?;

        let new_status = status_for_destination(request.action, to.kind);

        let movement = self
            .repository
            .movements
            .execute_transfer(&TransferWrite {
                asset_ids: request.asset_ids.clone(),
                from_location_id: from.id,
                to_location_id: to.id,
                action: request.action,
                new_status,
                done_by: claims.user_id,
                remark: request.remark.clone(),
                issue_ids: request.issue_ids.clone(),
            })
            .await?;

        // Best effort after the commit: a failure here must never undo or
        // mask a transfer that already happened.
        let low_stock_warning = if from.kind.is_store() {
            let mut type_ids: Vec<i32> = assets.iter().map(|a| a.asset_type_id).collect();
            type_ids.sort_unstable();
            type_ids.dedup();

            match self.stock.evaluate(from.id, &type_ids).await {
                Ok(items) if !items.is_empty() => Some(LowStockWarning {
                    message: "Some asset types are at or below their minimum stock level"
                        .to_string(),
                    items,
                }),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("Low-stock check failed after transfer {}: {}", movement.id, e);
                    None
                }
            }
        } else {
            None
        };

        let details = self.populate(&movement).await?;

        Ok(MovementResult {
            movement: details,
            low_stock_warning,
        })
    }

    /// List movements visible to the caller
    pub async fn list(
        &self,
        claims: &UserClaims,
        query: &MovementQuery,
    ) -> AppResult<(Vec<MovementDetails>, i64)> {
        let visible_location = self.visibility(claims)?;
        let (movements, total) = self.repository.movements.list(query, visible_location).await?;

        let mut details = Vec::with_capacity(movements.len());
        for movement in &movements {
            details.push(self.populate(movement).await?);
        }
        Ok((details, total))
    }

    /// Get one movement, enforcing role visibility
    pub async fn get_by_id(&self, claims: &UserClaims, id: i32) -> AppResult<MovementDetails> {
        let visible_location = self.visibility(claims)?;
        let movement = self.repository.movements.get_by_id(id).await?;

        if let Some(location_id) = visible_location {
            if movement.from_location_id != location_id && movement.to_location_id != location_id {
                return Err(AppError::Authorization(
                    "You do not have access to this movement".to_string(),
                ));
            }
        }

        self.populate(&movement).await
    }

    /// Full movement history of one asset
    pub async fn asset_history(
        &self,
        claims: &UserClaims,
        asset_id: i32,
    ) -> AppResult<Vec<MovementDetails>> {
        claims.require(Capability::ViewMovements)?;
        // Surfaces 404 for unknown assets before querying history
        self.repository.assets.get_by_id(asset_id).await?;

        let movements = self.repository.movements.list_for_asset(asset_id).await?;
        let mut details = Vec::with_capacity(movements.len());
        for movement in &movements {
            details.push(self.populate(movement).await?);
        }
        Ok(details)
    }

    /// Movements touching one location, optionally only inward or outward
    pub async fn location_movements(
        &self,
        claims: &UserClaims,
        location_id: i32,
        direction: MovementDirection,
    ) -> AppResult<Vec<MovementDetails>> {
        claims.require(Capability::ViewMovements)?;
        self.repository.locations.get_by_id(location_id).await?;

        if claims.role == Role::LabIncharge && claims.assigned_location_id != Some(location_id) {
            return Err(AppError::Authorization(
                "You can only view movements for your assigned location".to_string(),
            ));
        }

        let (inward, outward) = match direction {
            MovementDirection::Inward => (true, false),
            MovementDirection::Outward => (false, true),
            MovementDirection::All => (true, true),
        };

        let movements = self
            .repository
            .movements
            .list_for_location(location_id, inward, outward)
            .await?;
        let mut details = Vec::with_capacity(movements.len());
        for movement in &movements {
            details.push(self.populate(movement).await?);
        }
        Ok(details)
    }

    /// Resolve the caller's movement visibility: deny practical incharges,
    /// narrow lab incharges to their assigned location.
    fn visibility(&self, claims: &UserClaims) -> AppResult<Option<i32>> {
        claims.require(Capability::ViewMovements)?;
        if claims.role == Role::LabIncharge {
            let location_id = claims.assigned_location_id.ok_or_else(|| {
                AppError::Authorization("No location assigned to this incharge".to_string())
            })?;
            Ok(Some(location_id))
        } else {
            Ok(None)
        }
    }

    /// Resolve the id sets of a movement into display representations
    async fn populate(&self, movement: &Movement) -> AppResult<MovementDetails> {
        let assets = self.repository.assets.get_shorts(&movement.asset_ids).await?;
        let from_location = self
            .repository
            .locations
            .get_short(movement.from_location_id)
            .await?;
        let to_location = self
            .repository
            .locations
            .get_short(movement.to_location_id)
            .await?;
        let done_by = self.repository.users.get_short(movement.done_by).await?;
        let issues = self.repository.issues.get_shorts(&movement.issue_ids).await?;

        Ok(MovementDetails {
            id: movement.id,
            assets,
            from_location,
            to_location,
            action: movement.action,
            done_by,
            remark: movement.remark.clone(),
            issues,
            moved_at: movement.moved_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn location(id: i32, kind: LocationKind) -> Location {
        Location {
            id,
            name: format!("loc-{}", id),
            kind,
            incharge_id: None,
            created_at: Utc::now(),
        }
    }

    fn asset(id: i32, location_id: i32, status: AssetStatus) -> IndividualAsset {
        IndividualAsset {
            id,
            asset_type_id: 1,
            location_id,
            serial_number: format!("SN-{:04}", id),
            status,
            purchased_date: None,
            created_at: Utc::now(),
        }
    }

    fn issue(id: i32, location_id: i32, asset_ids: Vec<i32>, status: IssueStatus) -> Issue {
        Issue {
            id,
            location_id,
            asset_ids,
            created_by: 1,
            title: format!("issue-{}", id),
            reason: "does not boot".to_string(),
            photo_url: None,
            status,
            created_at: Utc::now(),
        }
    }

    fn request(
        asset_ids: Vec<i32>,
        from: i32,
        to: i32,
        action: ActionType,
        remark: Option<&str>,
        issue_ids: Vec<i32>,
    ) -> CreateMovement {
        CreateMovement {
            asset_ids,
            from_location_id: from,
            to_location_id: to,
            action,
            remark: remark.map(|r| r.to_string()),
            issue_ids,
        }
    }

    #[test]
    fn discard_of_faulty_assets_into_scrap_passes() {
        let from = location(1, LocationKind::Lab);
        let to = location(2, LocationKind::Scrap);
        let assets = vec![
            asset(10, 1, AssetStatus::InUse),
            asset(11, 1, AssetStatus::InUse),
        ];
        let issues = vec![issue(5, 1, vec![10, 11], IssueStatus::Created)];
        let req = request(vec![10, 11], 1, 2, ActionType::Discard, Some("broken"), vec![5]);

        assert!(validate_transfer(&req, &from, &to, &assets, &issues).is_ok());
        assert_eq!(
            status_for_destination(req.action, to.kind),
            AssetStatus::Discarded
        );
    }

    #[test]
    fn discard_requires_scrap_destination() {
        let from = location(1, LocationKind::Lab);
        let to = location(3, LocationKind::Lab);
        let assets = vec![asset(10, 1, AssetStatus::InUse)];
        let issues = vec![issue(5, 1, vec![10], IssueStatus::Created)];
        let req = request(vec![10], 1, 3, ActionType::Discard, Some("broken"), vec![5]);

        let err = validate_transfer(&req, &from, &to, &assets, &issues).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("scrap")));
    }

    #[test]
    fn transfer_into_scrap_is_rejected() {
        let from = location(1, LocationKind::Lab);
        let to = location(2, LocationKind::Scrap);
        let assets = vec![asset(10, 1, AssetStatus::InUse)];
        let issues = vec![issue(5, 1, vec![10], IssueStatus::Created)];
        let req = request(vec![10], 1, 2, ActionType::Transfer, None, vec![5]);

        assert!(validate_transfer(&req, &from, &to, &assets, &issues).is_err());
    }

    #[test]
    fn assets_cannot_leave_scrap() {
        let from = location(9, LocationKind::Scrap);
        let to = location(1, LocationKind::Lab);
        let assets = vec![asset(10, 9, AssetStatus::Discarded)];
        let issues = vec![issue(5, 9, vec![10], IssueStatus::Created)];
        let req = request(vec![10], 9, 1, ActionType::Transfer, None, vec![5]);

        assert!(validate_transfer(&req, &from, &to, &assets, &issues).is_err());
    }

    #[test]
    fn asset_not_at_source_is_reported_by_serial() {
        let from = location(1, LocationKind::Lab);
        let to = location(2, LocationKind::Room);
        // Asset 12 actually sits at location 4
        let assets = vec![
            asset(10, 1, AssetStatus::InUse),
            asset(12, 4, AssetStatus::InUse),
        ];
        let issues = vec![issue(5, 1, vec![10, 12], IssueStatus::Created)];
        let req = request(vec![10, 12], 1, 2, ActionType::Transfer, None, vec![5]);

        match validate_transfer(&req, &from, &to, &assets, &issues).unwrap_err() {
            AppError::RuleViolation { offenders, .. } => {
                assert_eq!(offenders, vec!["SN-0012".to_string()]);
            }
            other => panic!("expected rule violation, got {:?}", other),
        }
    }

    #[test]
    fn already_discarded_assets_are_immovable() {
        let from = location(1, LocationKind::Lab);
        let to = location(2, LocationKind::Scrap);
        let assets = vec![asset(10, 1, AssetStatus::Discarded)];
        let issues = vec![issue(5, 1, vec![10], IssueStatus::Created)];
        let req = request(vec![10], 1, 2, ActionType::Discard, Some("gone"), vec![5]);

        match validate_transfer(&req, &from, &to, &assets, &issues).unwrap_err() {
            AppError::RuleViolation { offenders, .. } => {
                assert_eq!(offenders, vec!["SN-0010".to_string()]);
            }
            other => panic!("expected rule violation, got {:?}", other),
        }
    }

    #[test]
    fn non_created_issue_is_reported_with_its_status() {
        let from = location(1, LocationKind::Lab);
        let to = location(2, LocationKind::Room);
        let assets = vec![asset(10, 1, AssetStatus::InUse)];
        let issues = vec![issue(7, 1, vec![10], IssueStatus::InProgress)];
        let req = request(vec![10], 1, 2, ActionType::Transfer, None, vec![7]);

        match validate_transfer(&req, &from, &to, &assets, &issues).unwrap_err() {
            AppError::RuleViolation { offenders, .. } => {
                assert_eq!(offenders, vec!["issue-7 (inProgress)".to_string()]);
            }
            other => panic!("expected rule violation, got {:?}", other),
        }
    }

    #[test]
    fn issue_from_another_location_is_rejected() {
        let from = location(1, LocationKind::Lab);
        let to = location(2, LocationKind::Room);
        let assets = vec![asset(10, 1, AssetStatus::InUse)];
        let issues = vec![issue(7, 3, vec![10], IssueStatus::Created)];
        let req = request(vec![10], 1, 2, ActionType::Transfer, None, vec![7]);

        assert!(validate_transfer(&req, &from, &to, &assets, &issues).is_err());
    }

    #[test]
    fn every_asset_must_be_covered_by_the_issue_union() {
        let from = location(1, LocationKind::Lab);
        let to = location(2, LocationKind::Room);
        let assets = vec![
            asset(10, 1, AssetStatus::InUse),
            asset(11, 1, AssetStatus::InUse),
            asset(12, 1, AssetStatus::InUse),
        ];
        // Issues cover 10 and 11 between them, but nothing covers 12
        let issues = vec![
            issue(5, 1, vec![10], IssueStatus::Created),
            issue(6, 1, vec![11], IssueStatus::Created),
        ];
        let req = request(vec![10, 11, 12], 1, 2, ActionType::Transfer, None, vec![5, 6]);

        match validate_transfer(&req, &from, &to, &assets, &issues).unwrap_err() {
            AppError::RuleViolation { offenders, .. } => {
                assert_eq!(offenders, vec!["SN-0012".to_string()]);
            }
            other => panic!("expected rule violation, got {:?}", other),
        }
    }

    #[test]
    fn coverage_across_issues_is_a_union_not_per_issue() {
        let from = location(1, LocationKind::Lab);
        let to = location(2, LocationKind::Room);
        let assets = vec![
            asset(10, 1, AssetStatus::InUse),
            asset(11, 1, AssetStatus::InUse),
        ];
        let issues = vec![
            issue(5, 1, vec![10], IssueStatus::Created),
            issue(6, 1, vec![11], IssueStatus::Created),
        ];
        let req = request(vec![10, 11], 1, 2, ActionType::Transfer, None, vec![5, 6]);

        assert!(validate_transfer(&req, &from, &to, &assets, &issues).is_ok());
    }

    #[test]
    fn movement_without_issues_is_rejected() {
        let from = location(1, LocationKind::Lab);
        let to = location(2, LocationKind::Room);
        let assets = vec![asset(10, 1, AssetStatus::InUse)];
        let req = request(vec![10], 1, 2, ActionType::Transfer, None, vec![]);

        assert!(validate_transfer(&req, &from, &to, &assets, &[]).is_err());
    }

    #[test]
    fn missing_assets_surface_as_not_found() {
        let from = location(1, LocationKind::Lab);
        let to = location(2, LocationKind::Room);
        // Request names two assets but only one resolved
        let assets = vec![asset(10, 1, AssetStatus::InUse)];
        let issues = vec![issue(5, 1, vec![10, 99], IssueStatus::Created)];
        let req = request(vec![10, 99], 1, 2, ActionType::Transfer, None, vec![5]);

        assert!(matches!(
            validate_transfer(&req, &from, &to, &assets, &issues).unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn blank_remark_does_not_satisfy_discard() {
        let from = location(1, LocationKind::Lab);
        let to = location(2, LocationKind::Scrap);
        let assets = vec![asset(10, 1, AssetStatus::InUse)];
        let issues = vec![issue(5, 1, vec![10], IssueStatus::Created)];
        let req = request(vec![10], 1, 2, ActionType::Discard, Some("   "), vec![5]);

        assert!(validate_transfer(&req, &from, &to, &assets, &issues).is_err());
    }

    #[test]
    fn validation_is_idempotent() {
        let from = location(1, LocationKind::Lab);
        let to = location(2, LocationKind::Scrap);
        let assets = vec![asset(10, 1, AssetStatus::InUse)];
        let issues = vec![issue(5, 1, vec![10], IssueStatus::Created)];
        let req = request(vec![10], 1, 2, ActionType::Discard, Some("broken"), vec![5]);

        let first = validate_transfer(&req, &from, &to, &assets, &issues).is_ok();
        let second = validate_transfer(&req, &from, &to, &assets, &issues).is_ok();
        assert_eq!(first, second);
        assert!(first);
    }
}
