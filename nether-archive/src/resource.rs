//! File-level save and load
//!
//! Wraps a whole serialization session around one file. Any failure is
//! reported as "resource failed to load" (or save) for that path, with the
//! archive error kept as the cause. Without an explicit format the file
//! extension decides, see [`ResourceFormat::from_path`].

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::archive::{Reader, Writer};
use crate::binary::{BinaryReader, BinaryWriter};
use crate::config::ArchiveConfig;
use crate::serializable::Serializable;
use crate::text::{TextReader, TextWriter};

/// On-disk encoding of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFormat {
    Binary,
    Text,
}

impl ResourceFormat {
    /// Pick the format from a file extension: `.txt` and `.ntxt` are text,
    /// anything else is binary
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("txt") | Some("ntxt") => ResourceFormat::Text,
            _ => ResourceFormat::Binary,
        }
    }
}

/// Serialize `value` into a new file at `path`
pub fn save_resource<T: Serializable>(
    path: impl AsRef<Path>,
    format: Option<ResourceFormat>,
    value: &T,
    config: &ArchiveConfig,
) -> Result<()> {
    let path = path.as_ref();
    let format = format.unwrap_or_else(|| ResourceFormat::from_path(path));
    write_file(path, format, value, config)
        .with_context(|| format!("resource failed to save: {}", path.display()))?;
    info!(path = %path.display(), ?format, "resource saved");
    Ok(())
}

/// Populate `value` from the file at `path`
pub fn load_resource<T: Serializable>(
    path: impl AsRef<Path>,
    format: Option<ResourceFormat>,
    value: &mut T,
    config: &ArchiveConfig,
) -> Result<()> {
    let path = path.as_ref();
    let format = format.unwrap_or_else(|| ResourceFormat::from_path(path));
    read_file(path, format, value, config)
        .with_context(|| format!("resource failed to load: {}", path.display()))?;
    info!(path = %path.display(), ?format, "resource loaded");
    Ok(())
}

fn write_file<T: Serializable>(
    path: &Path,
    format: ResourceFormat,
    value: &T,
    config: &ArchiveConfig,
) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    match format {
        ResourceFormat::Binary => {
            let mut writer = BinaryWriter::new(file, config.version)?;
            writer.write(value)?;
            writer.flush()?;
        }
        ResourceFormat::Text => {
            let mut writer = TextWriter::new(file, config.version)?;
            writer.write(value)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn read_file<T: Serializable>(
    path: &Path,
    format: ResourceFormat,
    value: &mut T,
    config: &ArchiveConfig,
) -> Result<()> {
    let file = BufReader::new(File::open(path)?);
    match format {
        ResourceFormat::Binary => {
            BinaryReader::new(file, config.version)?.read(value)?;
        }
        ResourceFormat::Text => {
            TextReader::with_strictness(file, config.version, config.text.strict)?.read(value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArchiveError;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ResourceFormat::from_path(Path::new("scene.txt")),
            ResourceFormat::Text
        );
        assert_eq!(
            ResourceFormat::from_path(Path::new("mesh.bin")),
            ResourceFormat::Binary
        );
        assert_eq!(
            ResourceFormat::from_path(Path::new("noext")),
            ResourceFormat::Binary
        );
    }

    #[test]
    fn test_extension_picks_format() {
        let dir = tempfile::tempdir().unwrap();
        let config = ArchiveConfig::default();

        let text_path = dir.path().join("scene.txt");
        save_resource(&text_path, None, &7i32, &config).unwrap();
        assert_eq!(
            std::fs::read_to_string(&text_path).unwrap(),
            "Version 1\n7\n"
        );

        let binary_path = dir.path().join("scene.bin");
        save_resource(&binary_path, None, &7i32, &config).unwrap();
        assert_eq!(std::fs::read(&binary_path).unwrap().len(), 8);

        let mut value = 0i32;
        load_resource(&text_path, None, &mut value, &config).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_save_and_load_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let config = ArchiveConfig::default();
        let value = vec![String::from("alpha"), String::from("beta")];

        for format in [ResourceFormat::Binary, ResourceFormat::Text] {
            let path = dir.path().join(format!("{format:?}.res"));
            save_resource(&path, Some(format), &value, &config).unwrap();

            let mut restored: Vec<String> = Vec::new();
            load_resource(&path, Some(format), &mut restored, &config).unwrap();
            assert_eq!(restored, value);
        }
    }

    #[test]
    fn test_load_failure_names_the_resource() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.bin");

        let mut old = ArchiveConfig::default();
        old.version = 1;
        save_resource(&path, Some(ResourceFormat::Binary), &5u8, &old).unwrap();

        let mut current = ArchiveConfig::default();
        current.version = 2;
        let mut value = 0u8;
        let err = load_resource(
            &path,
            Some(ResourceFormat::Binary),
            &mut value,
            &current,
        )
        .unwrap_err();

        assert!(err.to_string().starts_with("resource failed to load"));
        assert!(matches!(
            err.downcast_ref::<ArchiveError>(),
            Some(ArchiveError::VersionMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut value = 0u32;
        let err = load_resource(
            dir.path().join("absent.bin"),
            None,
            &mut value,
            &ArchiveConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("absent.bin"));
    }
}
