/// Local media storage for post images
use crate::config::MediaConfig;
use crate::error::{AppError, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Image extensions accepted for post uploads
const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Turn free text into a URL-safe slug: lowercase ASCII alphanumerics
/// and underscores, runs of whitespace and hyphens collapsed to a
/// single hyphen, everything else dropped.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_separator = false;

    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' {
            pending_separator = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Writes uploaded files under a configured media root. Stored paths are
/// relative to the root so the database stays portable across hosts.
pub struct MediaStorage {
    root: PathBuf,
    max_image_bytes: usize,
}

impl MediaStorage {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root),
            max_image_bytes: config.max_image_bytes,
        }
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    /// Store a post image and return its path relative to the media root,
    /// shaped as `uploads/posts/<title-slug>-<uuid><ext>`.
    pub async fn save_post_image(
        &self,
        post_title: &str,
        filename: &str,
        data: &[u8],
    ) -> Result<String> {
        let extension = image_extension(filename)?;

        if data.len() > self.max_image_bytes {
            return Err(AppError::BadRequest(format!(
                "Image exceeds the {} byte limit",
                self.max_image_bytes
            )));
        }

        let mut slug = slugify(post_title);
        if slug.is_empty() {
            slug = "post".to_string();
        }

        let relative_path = format!("uploads/posts/{}-{}.{}", slug, Uuid::new_v4(), extension);
        let absolute_path = self.root.join(&relative_path);

        if let Some(parent) = absolute_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&absolute_path, data).await?;

        Ok(relative_path)
    }
}

/// Validate the upload filename and return its lowercased extension
fn image_extension(filename: &str) -> Result<String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| AppError::BadRequest("Image file has no extension".to_string()))?;

    if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported image extension \"{}\", expected one of: {}",
            extension,
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        )));
    }

    Ok(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("My First Post!"), "my-first-post");
    }

    #[test]
    fn test_slugify_collapses_separator_runs() {
        assert_eq!(slugify("a  -  b --- c"), "a-b-c");
        assert_eq!(slugify("--edges--"), "edges");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("caf\u{e9} poste"), "caf-poste");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_image_extension_accepts_known_types() {
        assert_eq!(image_extension("photo.PNG").unwrap(), "png");
        assert_eq!(image_extension("pic.jpeg").unwrap(), "jpeg");
    }

    #[test]
    fn test_image_extension_rejects_unknown_types() {
        assert!(image_extension("report.pdf").is_err());
        assert!(image_extension("noextension").is_err());
    }

    #[tokio::test]
    async fn test_save_post_image_writes_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(&MediaConfig {
            root: dir.path().to_string_lossy().into_owned(),
            max_image_bytes: 1024,
        });

        let path = storage
            .save_post_image("Test Post", "image.png", b"fake image bytes")
            .await
            .unwrap();

        assert!(path.starts_with("uploads/posts/test-post-"));
        assert!(path.ends_with(".png"));
        assert_eq!(
            tokio::fs::read(dir.path().join(&path)).await.unwrap(),
            b"fake image bytes"
        );
    }

    #[tokio::test]
    async fn test_save_post_image_enforces_size_cap() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(&MediaConfig {
            root: dir.path().to_string_lossy().into_owned(),
            max_image_bytes: 4,
        });

        let err = storage
            .save_post_image("Test Post", "image.png", b"too large")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
