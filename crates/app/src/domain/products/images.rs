//! Product image uploads.

use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use mockall::automock;
use tokio::fs;
use tracing::info;
use uuid::Uuid;

use crate::domain::products::errors::ImageUploadError;

/// Accepted image file extensions, lowercase.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Lowercased extension of `file_name` when it is an accepted image type.
///
/// # Errors
///
/// Returns [`ImageUploadError::UnsupportedFormat`] for any other extension.
pub fn image_extension(file_name: &str) -> Result<String, ImageUploadError> {
    Path::new(file_name)
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .filter(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .ok_or(ImageUploadError::UnsupportedFormat)
}

/// Stores uploaded product images.
#[automock]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Copy the upload at `source`, originally named `file_name`, into the store.
    ///
    /// Returns the generated file name.
    async fn store_image(&self, file_name: &str, source: &Path)
    -> Result<String, ImageUploadError>;

    /// Delete a previously stored image. Missing files are ignored.
    async fn remove_image(&self, stored: &str) -> Result<(), ImageUploadError>;
}

/// Stores images as `img_<uuid>.<ext>` in a directory.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    dir: PathBuf,
}

impl FsImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn store_image(
        &self,
        file_name: &str,
        source: &Path,
    ) -> Result<String, ImageUploadError> {
        let ext = image_extension(file_name)?;
        let stored = format!("img_{}.{ext}", Uuid::now_v7().simple());

        fs::create_dir_all(&self.dir).await?;
        fs::copy(source, self.dir.join(&stored)).await?;

        info!(original = file_name, stored = %stored, "stored product image");

        Ok(stored)
    }

    async fn remove_image(&self, stored: &str) -> Result<(), ImageUploadError> {
        let Some(name) = Path::new(stored).file_name() else {
            return Ok(());
        };

        match fs::remove_file(self.dir.join(name)).await {
            Ok(()) => {
                info!(stored, "removed product image");

                Ok(())
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
