//! Business logic services

pub mod auth;
pub mod catalog;
pub mod issues;
pub mod locations;
pub mod stock;
pub mod transfers;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub locations: locations::LocationsService,
    pub issues: issues::IssuesService,
    pub stock: stock::StockService,
    pub transfers: transfers::TransfersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        let stock = stock::StockService::new(repository.clone());
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            locations: locations::LocationsService::new(repository.clone()),
            issues: issues::IssuesService::new(repository.clone()),
            transfers: transfers::TransfersService::new(repository.clone(), stock.clone()),
            stock,
        }
    }
}
