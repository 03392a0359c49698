//! Uploads Config

use std::path::PathBuf;

use clap::Args;

/// Product image upload settings.
#[derive(Debug, Args)]
pub struct UploadsConfig {
    /// Directory product images are stored in
    #[arg(long, env = "UPLOADS_DIR", default_value = "uploads")]
    pub uploads_dir: PathBuf,
}
