//! App Context

use std::{path::PathBuf, sync::Arc};

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::products::{FsImageStore, ImageStore, PgProductsService, ProductsService},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),
}

/// Services backing the product catalog API.
#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub images: Arc<dyn ImageStore>,
}

impl AppContext {
    /// Build application context from a database URL and an uploads directory.
    ///
    /// Pending migrations are applied before the context is returned.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting to the database or migrating it fails.
    pub async fn from_database_url(
        url: &str,
        uploads_dir: impl Into<PathBuf>,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrations)?;

        Ok(Self {
            products: Arc::new(PgProductsService::new(Db::new(pool))),
            images: Arc::new(FsImageStore::new(uploads_dir)),
        })
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}
