//! Catalog service: asset types and individual asset intake

use crate::{
    error::{AppError, AppResult},
    models::asset::{AssetDetails, AssetQuery, CreateAsset, IndividualAsset, UpdateAsset},
    models::asset_type::{AssetType, CreateAssetType, UpdateAssetType},
    models::enums::resting_status,
    models::user::{Capability, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // --- Asset types -------------------------------------------------------

    pub async fn list_asset_types(&self) -> AppResult<Vec<AssetType>> {
        self.repository.asset_types.list().await
    }

    pub async fn get_asset_type(&self, id: i32) -> AppResult<AssetType> {
        self.repository.asset_types.get_by_id(id).await
    }

    pub async fn create_asset_type(
        &self,
        claims: &UserClaims,
        data: &CreateAssetType,
    ) -> AppResult<AssetType> {
        claims.require(Capability::ManageCatalog)?;
        self.repository.asset_types.create(data).await
    }

    pub async fn update_asset_type(
        &self,
        claims: &UserClaims,
        id: i32,
        data: &UpdateAssetType,
    ) -> AppResult<AssetType> {
        claims.require(Capability::ManageCatalog)?;
        self.repository.asset_types.update(id, data).await
    }

    pub async fn delete_asset_type(&self, claims: &UserClaims, id: i32) -> AppResult<()> {
        claims.require(Capability::ManageCatalog)?;
        self.repository.asset_types.delete(id).await
    }

    // --- Individual assets -------------------------------------------------

    /// Intake of one serialized unit. The declared status must be the
    /// resting status of the target location's kind, the same table the
    /// transfer engine uses.
    pub async fn create_asset(
        &self,
        claims: &UserClaims,
        data: &CreateAsset,
    ) -> AppResult<IndividualAsset> {
        claims.require(Capability::ManageCatalog)?;

        self.repository.asset_types.get_by_id(data.asset_type_id).await?;
        let location = self.repository.locations.get_by_id(data.location_id).await?;

        let expected = resting_status(location.kind);
        if data.status != expected {
            return Err(AppError::Validation(format!(
                "Status {} is not allowed at a {} location, expected {}",
                data.status, location.kind, expected
            )));
        }

        self.repository.assets.create(data).await
    }

    pub async fn list_assets(&self, query: &AssetQuery) -> AppResult<(Vec<AssetDetails>, i64)> {
        let (assets, total) = self.repository.assets.list(query).await?;

        let mut details = Vec::with_capacity(assets.len());
        for asset in &assets {
            details.push(self.populate(asset).await?);
        }
        Ok((details, total))
    }

    pub async fn get_asset(&self, id: i32) -> AppResult<AssetDetails> {
        let asset = self.repository.assets.get_by_id(id).await?;
        self.populate(&asset).await
    }

    /// Update the mutable fields of an asset. `UpdateAsset` rejects unknown
    /// fields at deserialization, so requests trying to set `status` or
    /// `location_id` fail before reaching this point: those change only
    /// through a movement.
    pub async fn update_asset(
        &self,
        claims: &UserClaims,
        id: i32,
        data: &UpdateAsset,
    ) -> AppResult<IndividualAsset> {
        claims.require(Capability::ManageCatalog)?;
        self.repository.assets.update(id, data).await
    }

    pub async fn delete_asset(&self, claims: &UserClaims, id: i32) -> AppResult<()> {
        claims.require(Capability::ManageCatalog)?;
        self.repository.assets.delete(id).await
    }

    async fn populate(&self, asset: &IndividualAsset) -> AppResult<AssetDetails> {
        let asset_type = self
            .repository
            .asset_types
            .get_short(asset.asset_type_id)
            .await?;
        let location = self.repository.locations.get_short(asset.location_id).await?;

        Ok(AssetDetails {
            id: asset.id,
            serial_number: asset.serial_number.clone(),
            status: asset.status,
            purchased_date: asset.purchased_date,
            asset_type,
            location,
            created_at: asset.created_at,
        })
    }
}
