use anyhow::{Context, Result, bail};
use std::path::Path;

pub fn validate_path_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Path does not exist: {}", path.display());
    }
    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Cannot create directory {}", path.display()))?;
    }
    if !path.is_dir() {
        bail!("Not a directory: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_directory_creates_nested() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_directory_exists(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_directory_exists(&nested).unwrap();
    }

    #[test]
    fn test_ensure_directory_rejects_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        assert!(ensure_directory_exists(&file).is_err());
    }

    #[test]
    fn test_validate_path_exists() {
        let dir = tempdir().unwrap();
        assert!(validate_path_exists(dir.path()).is_ok());
        assert!(validate_path_exists(&dir.path().join("missing")).is_err());
    }
}
