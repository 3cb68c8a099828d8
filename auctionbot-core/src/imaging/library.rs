// File: auctionbot-core/src/imaging/library.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Error;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Directory layout for originals, obscured previews and rendered collages.
#[derive(Debug, Clone)]
pub struct ImageLibrary {
    source_dir: PathBuf,
    hidden_dir: PathBuf,
    collage_dir: PathBuf,
}

impl ImageLibrary {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        hidden_dir: impl Into<PathBuf>,
        collage_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            hidden_dir: hidden_dir.into(),
            collage_dir: collage_dir.into(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn collage_dir(&self) -> &Path {
        &self.collage_dir
    }

    pub fn original_path(&self, image: &str) -> PathBuf {
        self.source_dir.join(image)
    }

    pub fn hidden_path(&self, image: &str) -> PathBuf {
        self.hidden_dir.join(image)
    }

    pub async fn ensure_dirs(&self) -> Result<(), Error> {
        for dir in [&self.source_dir, &self.hidden_dir, &self.collage_dir] {
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(())
    }

    /// File names of every image in the source directory, sorted.
    pub async fn scan(&self) -> Result<Vec<String>, Error> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.source_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_image_name(&name) {
                names.push(name);
            } else {
                debug!("skipping non-image file {}", name);
            }
        }
        names.sort();
        Ok(names)
    }
}

fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_image_extensions() {
        assert!(is_image_name("cat.JPG"));
        assert!(is_image_name("prize_1700000000.jpg"));
        assert!(!is_image_name("notes.txt"));
        assert!(!is_image_name("jpg"));
    }

    #[tokio::test]
    async fn scan_lists_only_images() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.png"), b"x").unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("readme.md"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let lib = ImageLibrary::new(dir.path(), dir.path().join("hidden"), dir.path().join("out"));
        assert_eq!(lib.scan().await.unwrap(), vec!["a.jpg".to_string(), "b.png".to_string()]);
    }
}
