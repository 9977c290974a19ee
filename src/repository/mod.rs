//! Repository layer for database operations

pub mod asset_types;
pub mod assets;
pub mod issues;
pub mod locations;
pub mod movements;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub asset_types: asset_types::AssetTypesRepository,
    pub assets: assets::AssetsRepository,
    pub locations: locations::LocationsRepository,
    pub issues: issues::IssuesRepository,
    pub movements: movements::MovementsRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            asset_types: asset_types::AssetTypesRepository::new(pool.clone()),
            assets: assets::AssetsRepository::new(pool.clone()),
            locations: locations::LocationsRepository::new(pool.clone()),
            issues: issues::IssuesRepository::new(pool.clone()),
            movements: movements::MovementsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}
