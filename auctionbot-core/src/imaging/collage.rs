// File: auctionbot-core/src/imaging/collage.rs

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::imageops::{self, FilterType};
use image::{GenericImageView, RgbImage};

use auctionbot_common::traits::delivery_traits::CollageComposer;
use crate::imaging::image_err;
use crate::Error;

/// Near-square grid, row-major, every cell the size of the first tile.
#[derive(Debug, Clone)]
pub struct GridCollage {
    output_dir: PathBuf,
}

impl GridCollage {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }
}

/// (columns, rows) for `n` tiles.
pub fn grid_shape(n: usize) -> (u32, u32) {
    let cols = ((n as f64).sqrt().floor() as usize).max(1);
    let rows = n.div_ceil(cols);
    (cols as u32, rows as u32)
}

pub fn compose_grid(tiles: &[PathBuf], target: &Path) -> Result<(), Error> {
    let first = tiles
        .first()
        .ok_or_else(|| Error::Image("collage needs at least one tile".into()))?;
    let first = image::open(first).map_err(image_err)?;
    let (cell_w, cell_h) = first.dimensions();
    let (cols, rows) = grid_shape(tiles.len());

    let mut canvas = RgbImage::new(cols * cell_w, rows * cell_h);
    for (idx, path) in tiles.iter().enumerate() {
        let tile = if idx == 0 {
            first.clone()
        } else {
            image::open(path).map_err(image_err)?
        };
        let tile = tile.resize_exact(cell_w, cell_h, FilterType::Nearest).to_rgb8();

        let idx = idx as u32;
        let x = (idx % cols) * cell_w;
        let y = (idx / cols) * cell_h;
        imageops::replace(&mut canvas, &tile, x as i64, y as i64);
    }

    canvas.save(target).map_err(image_err)
}

#[async_trait]
impl CollageComposer for GridCollage {
    async fn compose(&self, tiles: &[PathBuf], output_name: &str) -> Result<PathBuf, Error> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let target = self.output_dir.join(output_name);

        let tiles = tiles.to_vec();
        let out = target.clone();
        tokio::task::spawn_blocking(move || compose_grid(&tiles, &out)).await??;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn grid_is_near_square() {
        assert_eq!(grid_shape(1), (1, 1));
        assert_eq!(grid_shape(3), (1, 3));
        assert_eq!(grid_shape(4), (2, 2));
        assert_eq!(grid_shape(5), (2, 3));
        assert_eq!(grid_shape(10), (3, 4));
    }

    #[tokio::test]
    async fn tiles_are_placed_row_major_at_first_tile_size() {
        let dir = tempfile::tempdir().unwrap();
        let colours = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0]];
        let mut tiles = Vec::new();
        for (i, c) in colours.iter().enumerate() {
            let path = dir.path().join(format!("t{i}.png"));
            // Later tiles are a different size and get scaled to the first.
            let size = if i == 0 { 10 } else { 20 };
            RgbImage::from_pixel(size, size, Rgb(*c)).save(&path).unwrap();
            tiles.push(path);
        }

        let collage = GridCollage::new(dir.path().join("out"));
        let out = collage.compose(&tiles, "c.png").await.unwrap();
        let img = image::open(out).unwrap().to_rgb8();

        assert_eq!(img.dimensions(), (20, 20));
        assert_eq!(img.get_pixel(5, 5), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(15, 5), &Rgb([0, 255, 0]));
        assert_eq!(img.get_pixel(5, 15), &Rgb([0, 0, 255]));
        assert_eq!(img.get_pixel(15, 15), &Rgb([255, 255, 0]));
    }

    #[tokio::test]
    async fn empty_tile_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = GridCollage::new(dir.path()).compose(&[], "c.png").await.unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }
}
