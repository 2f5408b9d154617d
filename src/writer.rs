//! Output location handling and persistence of the finished sitemap.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::{Result, SitemapError};

/// The conventional output directory name
pub const DEFAULT_PUBLIC_PATH: &str = "public";

/// Resolve the output directory.
///
/// The literal default `public` is placed under `base_dir`; any other value
/// is used as given, absolute or relative to the working directory.
pub fn resolve_public_path(public_path: &Path, base_dir: &Path) -> PathBuf {
    if public_path == Path::new(DEFAULT_PUBLIC_PATH) {
        base_dir.join(public_path)
    } else {
        public_path.to_path_buf()
    }
}

/// Write the sitemap into `dir`, creating it when missing, and return the file path
pub async fn write_sitemap(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    if !fs::try_exists(dir)
        .await
        .map_err(|e| SitemapError::io(dir, e))?
    {
        debug!(dir = %dir.display(), "Creating output directory");
        fs::create_dir_all(dir)
            .await
            .map_err(|e| SitemapError::io(dir, e))?;
    }

    let path = dir.join(file_name);
    fs::write(&path, bytes)
        .await
        .map_err(|e| SitemapError::io(&path, e))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_public_path_uses_base_dir() {
        let resolved = resolve_public_path(Path::new("public"), Path::new("/opt/site"));
        assert_eq!(resolved, PathBuf::from("/opt/site/public"));
    }

    #[test]
    fn test_other_paths_are_used_as_is() {
        let base = Path::new("/opt/site");
        assert_eq!(
            resolve_public_path(Path::new("dist"), base),
            PathBuf::from("dist")
        );
        assert_eq!(
            resolve_public_path(Path::new("/var/www"), base),
            PathBuf::from("/var/www")
        );
        assert_eq!(
            resolve_public_path(Path::new("./public"), base),
            PathBuf::from("./public")
        );
    }

    #[tokio::test]
    async fn test_write_creates_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("a").join("b").join("c");

        let path = write_sitemap(&dir, "sitemap.xml", b"<urlset/>").await.unwrap();

        assert_eq!(path, dir.join("sitemap.xml"));
        assert_eq!(std::fs::read(&path).unwrap(), b"<urlset/>");
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("sitemap.xml"), "old").unwrap();

        write_sitemap(temp_dir.path(), "sitemap.xml", b"new")
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("sitemap.xml")).unwrap(),
            "new"
        );
    }

    #[tokio::test]
    async fn test_write_into_file_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = write_sitemap(&blocker.join("sub"), "sitemap.xml", b"x").await;
        assert!(matches!(result, Err(SitemapError::Io { .. })));
    }
}
