//! Issue lifecycle service

use crate::{
    error::{AppError, AppResult},
    models::enums::IssueStatus,
    models::issue::{CreateIssue, Issue, IssueDetails, IssueQuery},
    models::user::{Capability, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct IssuesService {
    repository: Repository,
}

impl IssuesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a fault report. Every referenced asset must exist and reside
    /// at the reported location; the status always starts at `created`.
    pub async fn create(&self, claims: &UserClaims, data: CreateIssue) -> AppResult<Issue> {
        claims.require(Capability::ReportIssue)?;

        if data.asset_ids.is_empty() {
            return Err(AppError::Validation(
                "An issue must reference at least one asset".to_string(),
            ));
        }

        let location = self.repository.locations.get_by_id(data.location_id).await?;

        let mut asset_ids = data.asset_ids.clone();
        asset_ids.sort_unstable();
        asset_ids.dedup();

        let assets = self.repository.assets.get_many(&asset_ids).await?;
        if assets.len() != asset_ids.len() {
            return Err(AppError::NotFound("Some assets were not found".to_string()));
        }

        let elsewhere: Vec<String> = assets
            .iter()
            .filter(|a| a.location_id != location.id)
            .map(|a| a.serial_number.clone())
            .collect();
        if !elsewhere.is_empty() {
            return Err(AppError::rule(
                "Some assets do not belong to the reported location",
                elsewhere,
            ));
        }

        let issue = self
            .repository
            .issues
            .create(
                &CreateIssue {
                    asset_ids,
                    ..data
                },
                claims.user_id,
            )
            .await?;
        Ok(issue)
    }

    /// List issues, newest first
    pub async fn list(&self, query: &IssueQuery) -> AppResult<(Vec<IssueDetails>, i64)> {
        let (issues, total) = self.repository.issues.list(query).await?;

        let mut details = Vec::with_capacity(issues.len());
        for issue in &issues {
            details.push(self.populate(issue).await?);
        }
        Ok((details, total))
    }

    /// Get one issue with its references populated
    pub async fn get_by_id(&self, id: i32) -> AppResult<IssueDetails> {
        let issue = self.repository.issues.get_by_id(id).await?;
        self.populate(&issue).await
    }

    /// Apply a manual status transition. The transition table lives in
    /// `IssueStatus::can_transition_to`; the repository re-checks it under a
    /// row lock so a racing transfer cannot interleave.
    pub async fn update_status(
        &self,
        claims: &UserClaims,
        id: i32,
        next: IssueStatus,
    ) -> AppResult<Issue> {
        claims.require(Capability::ResolveIssue)?;
        self.repository.issues.update_status(id, next).await
    }

    async fn populate(&self, issue: &Issue) -> AppResult<IssueDetails> {
        let location = self.repository.locations.get_short(issue.location_id).await?;
        let assets = self.repository.assets.get_shorts(&issue.asset_ids).await?;
        let created_by = self.repository.users.get_short(issue.created_by).await?;

        Ok(IssueDetails {
            id: issue.id,
            title: issue.title.clone(),
            reason: issue.reason.clone(),
            photo_url: issue.photo_url.clone(),
            status: issue.status,
            location,
            assets,
            created_by,
            created_at: issue.created_at,
        })
    }
}
