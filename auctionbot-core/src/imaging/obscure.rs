// File: auctionbot-core/src/imaging/obscure.rs

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::debug;
use uuid::Uuid;

use auctionbot_common::traits::delivery_traits::Obscurer;
use crate::imaging::{image_err, ImageLibrary};
use crate::Error;

/// Blurs, then pixelates down to a coarse grid and back up to the original size.
/// Output is cached in the hidden directory under the same file name.
#[derive(Debug, Clone)]
pub struct PixelateObscurer {
    library: ImageLibrary,
    blur_sigma: f32,
    grid: u32,
}

impl PixelateObscurer {
    pub fn new(library: ImageLibrary) -> Self {
        Self {
            library,
            blur_sigma: 2.6,
            grid: 30,
        }
    }
}

/// Renders `source` into `target` as an obscured copy.
pub fn pixelate(source: &Path, target: &Path, blur_sigma: f32, grid: u32) -> Result<(), Error> {
    let img = image::open(source).map_err(image_err)?;
    let (width, height) = img.dimensions();

    let coarse = img
        .blur(blur_sigma)
        .resize_exact(grid, grid, FilterType::Nearest);
    let restored = coarse.resize_exact(width, height, FilterType::Nearest);

    // JPEG has no alpha channel.
    DynamicImage::ImageRgb8(restored.to_rgb8())
        .save(target)
        .map_err(image_err)
}

#[async_trait]
impl Obscurer for PixelateObscurer {
    async fn obscure(&self, image: &str) -> Result<PathBuf, Error> {
        let target = self.library.hidden_path(image);
        if tokio::fs::try_exists(&target).await? {
            return Ok(target);
        }

        let source = self.library.original_path(image);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        debug!("obscuring {:?} -> {:?}", source, target);

        // Render beside the target and rename into place, so readers never see a partial file.
        // The extension is kept so the encoder still picks the format from it.
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| image.to_string());
        let staging = target.with_file_name(format!(".{}-{}", Uuid::new_v4().simple(), file_name));

        let out = staging.clone();
        let (sigma, grid) = (self.blur_sigma, self.grid);
        let rendered = tokio::task::spawn_blocking(move || pixelate(&source, &out, sigma, grid)).await?;
        if let Err(e) = rendered {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e);
        }
        tokio::fs::rename(&staging, &target).await?;
        Ok(target)
    }
}
