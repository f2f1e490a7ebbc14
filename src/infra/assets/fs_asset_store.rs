use std::io::ErrorKind;
use std::path::PathBuf;
use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;
use crate::domain::{models::asset::{ImageKind, ImageUpload}, ports::AssetStore};
use crate::error::AppError;

/// URL prefix under which stored images are served and referenced.
pub const PUBLIC_PREFIX: &str = "uploads/images";

pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a stored reference back to a file inside the root. Anything that is
    /// not a bare file name under the public prefix is rejected.
    fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let name = reference
            .trim_start_matches('/')
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))?;

        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        Some(self.root.join(name))
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn store(&self, kind: ImageKind, upload: &ImageUpload) -> Result<String, AppError> {
        fs::create_dir_all(&self.root).await?;

        let name = format!("event_{}.{}", Uuid::new_v4().simple(), kind.extension());
        fs::write(self.root.join(&name), &upload.bytes).await?;

        info!(file = %name, bytes = upload.bytes.len(), "stored image");
        Ok(format!("{}/{}", PUBLIC_PREFIX, name))
    }

    async fn delete(&self, reference: &str) -> Result<(), AppError> {
        let Some(path) = self.resolve(reference) else {
            debug!(reference, "ignoring image reference outside the upload directory");
            return Ok(());
        };

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("asset_store_{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_store_then_delete() {
        let root = temp_root();
        let store = FsAssetStore::new(&root);
        let upload = ImageUpload { content_type: "image/png".into(), bytes: vec![1, 2, 3] };

        let reference = store.store(ImageKind::Png, &upload).await.unwrap();
        assert!(reference.starts_with("uploads/images/event_"));
        assert!(reference.ends_with(".png"));

        let path = store.resolve(&reference).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);

        store.delete(&reference).await.unwrap();
        assert!(!path.exists());
        // Second delete hits a missing file.
        store.delete(&reference).await.unwrap();

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = FsAssetStore::new("/srv/uploads");
        assert!(store.resolve("uploads/images/../secret").is_none());
        assert!(store.resolve("uploads/images/.hidden").is_none());
        assert!(store.resolve("other/event_1.png").is_none());
        assert_eq!(store.resolve("/uploads/images/event_1.png"), Some(PathBuf::from("/srv/uploads/event_1.png")));
    }
}
