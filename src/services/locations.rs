//! Location management service

use crate::{
    error::{AppError, AppResult},
    models::enums::LocationKind,
    models::location::{CreateLocation, Location, LocationDetails},
    models::user::{Capability, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct LocationsService {
    repository: Repository,
}

impl LocationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a location. Names are unique case-insensitively; an optional
    /// incharge must hold an incharge-capable role and not already be
    /// assigned elsewhere.
    pub async fn create(
        &self,
        claims: &UserClaims,
        data: &CreateLocation,
    ) -> AppResult<LocationDetails> {
        claims.require(Capability::ManageLocations)?;

        if self.repository.locations.find_by_name(&data.name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Location with name {} already exists",
                data.name
            )));
        }

        if let Some(incharge_id) = data.incharge_id {
            self.check_incharge(incharge_id, None).await?;
        }

        let location = self
            .repository
            .locations
            .create(&data.name, data.kind, data.incharge_id)
            .await?;

        if let Some(incharge_id) = data.incharge_id {
            self.repository
                .users
                .set_assigned_location(incharge_id, Some(location.id))
                .await?;
        }

        self.populate(&location).await
    }

    /// List locations, optionally filtered by kind
    pub async fn list(&self, kind: Option<LocationKind>) -> AppResult<Vec<LocationDetails>> {
        let locations = self.repository.locations.list(kind).await?;

        let mut details = Vec::with_capacity(locations.len());
        for location in &locations {
            details.push(self.populate(location).await?);
        }
        Ok(details)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<LocationDetails> {
        let location = self.repository.locations.get_by_id(id).await?;
        self.populate(&location).await
    }

    /// Assign (or replace) the incharge of a location, keeping the mirror
    /// field on users in sync.
    pub async fn assign_incharge(
        &self,
        claims: &UserClaims,
        location_id: i32,
        incharge_id: i32,
    ) -> AppResult<LocationDetails> {
        claims.require(Capability::ManageLocations)?;

        let location = self.repository.locations.get_by_id(location_id).await?;
        self.check_incharge(incharge_id, Some(location_id)).await?;

        if let Some(previous) = location.incharge_id {
            self.repository.users.set_assigned_location(previous, None).await?;
        }

        let updated = self
            .repository
            .locations
            .set_incharge(location_id, Some(incharge_id))
            .await?;
        self.repository
            .users
            .set_assigned_location(incharge_id, Some(location_id))
            .await?;

        self.populate(&updated).await
    }

    /// Remove the incharge of a location
    pub async fn remove_incharge(
        &self,
        claims: &UserClaims,
        location_id: i32,
    ) -> AppResult<LocationDetails> {
        claims.require(Capability::ManageLocations)?;

        let location = self.repository.locations.get_by_id(location_id).await?;
        let Some(incharge_id) = location.incharge_id else {
            return Err(AppError::Validation(
                "No incharge assigned to this location".to_string(),
            ));
        };

        self.repository.users.set_assigned_location(incharge_id, None).await?;
        let updated = self.repository.locations.set_incharge(location_id, None).await?;
        self.populate(&updated).await
    }

    /// An incharge candidate must exist, hold an incharge-capable role,
    /// and not be responsible for another location already.
    async fn check_incharge(&self, incharge_id: i32, exclude_location: Option<i32>) -> AppResult<()> {
        let user = self.repository.users.get_by_id(incharge_id).await?;

        if !user.role.is_incharge_capable() {
            return Err(AppError::Validation(format!(
                "User {} is not an incharge",
                user.name
            )));
        }

        if let Some(existing) = self
            .repository
            .locations
            .find_by_incharge(incharge_id, exclude_location)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "This incharge is already assigned to {}",
                existing.name
            )));
        }

        Ok(())
    }

    async fn populate(&self, location: &Location) -> AppResult<LocationDetails> {
        let incharge = match location.incharge_id {
            Some(id) => Some(self.repository.users.get_short(id).await?),
            None => None,
        };

        Ok(LocationDetails {
            id: location.id,
            name: location.name.clone(),
            kind: location.kind,
            incharge,
            created_at: location.created_at,
        })
    }
}
