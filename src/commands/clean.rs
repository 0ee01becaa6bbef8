//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Site;

/// Remove the generated output
pub fn run(site: &Site) -> Result<()> {
    if site.public_dir == site.data_dir || site.data_dir.starts_with(&site.public_dir) {
        anyhow::bail!(
            "Refusing to delete {:?}: it holds the datasets",
            site.public_dir
        );
    }

    if site.public_dir.exists() {
        fs::remove_dir_all(&site.public_dir)?;
        tracing::info!("Deleted: {:?}", site.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_keeps_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        fs::create_dir_all(site.public_dir.join("manual")).unwrap();
        fs::create_dir_all(&site.data_dir).unwrap();

        run(&site).unwrap();
        assert!(!site.public_dir.exists());
        assert!(site.data_dir.exists());

        let mut config = site.config.clone();
        config.public_dir = config.data_dir.clone();
        let same = Site::with_config(dir.path().to_path_buf(), config);
        assert!(run(&same).is_err());
    }
}
