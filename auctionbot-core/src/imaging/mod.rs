//! Image handling: where catalog images live on disk, how previews are obscured
//! and how collection collages are tiled.

pub mod library;
pub mod obscure;
pub mod collage;

pub use library::ImageLibrary;
pub use obscure::PixelateObscurer;
pub use collage::GridCollage;

use auctionbot_common::error::Error;

pub(crate) fn image_err(e: image::ImageError) -> Error {
    Error::Image(e.to_string())
}
