//! Archive packaging for local output

use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Bundle the local output directory into a single gzip-compressed tarball.
///
/// Entries are stored relative to the archive root, so unpacking reproduces
/// the directory contents in place.
pub fn create_archive(source_directory: &Path, archive_name: &str) -> Result<()> {
    if !source_directory.is_dir() {
        anyhow::bail!(
            "Output directory {} does not exist",
            source_directory.display()
        );
    }

    let file = File::create(archive_name)
        .with_context(|| format!("Failed to create archive {archive_name}"))?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    builder
        .append_dir_all(".", source_directory)
        .with_context(|| format!("Failed to add {} to archive", source_directory.display()))?;

    let encoder = builder.into_inner().context("Failed to finish archive")?;
    encoder.finish().context("Failed to flush archive")?;

    info!(archive = archive_name, "Created metrics archive");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::collections::BTreeSet;

    #[test]
    fn test_archive_contains_directory_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("collected-metrics-abc123");
        std::fs::create_dir(&output).unwrap();
        std::fs::write(output.join("nodeCPU.json"), "[]").unwrap();
        std::fs::write(output.join("namespaceCount.json"), "[]").unwrap();

        let archive_path = dir.path().join("metrics.tar.gz");
        create_archive(&output, archive_path.to_str().unwrap()).unwrap();

        let file = File::open(&archive_path).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let entries: BTreeSet<String> = archive
            .entries()
            .unwrap()
            .map(|entry| {
                entry
                    .unwrap()
                    .path()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();

        assert!(entries.iter().any(|path| path.ends_with("nodeCPU.json")));
        assert!(entries.iter().any(|path| path.ends_with("namespaceCount.json")));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-created");
        let archive_path = dir.path().join("metrics.tar.gz");

        let err = create_archive(&missing, archive_path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
