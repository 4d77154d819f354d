//! Product archive packaging: zipping the data file and its XML sidecar
//! into the deliverable, shapefile companions included.
use std::fs::File;
use std::io::{copy, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::{Error, Result};

/// Sidecar extensions shipped alongside a `.shp` main file.
const SHP_COMPANIONS: &[&str] = &["shx", "dbf", "prj", "cpg"];

fn companions(path: &Path) -> Vec<PathBuf> {
    let mut files = vec![path.to_path_buf()];
    if path.extension().and_then(|e| e.to_str()) == Some("shp") {
        for ext in SHP_COMPANIONS {
            let companion = path.with_extension(ext);
            if companion.is_file() {
                files.push(companion);
            }
        }
    }
    files
}

/// Zip `files` (plus shapefile companions) into `zip_path`, storing each by
/// its base name, then remove the originals.
pub fn write_product_archive(zip_path: &Path, files: &[PathBuf]) -> Result<()> {
    let mut members: Vec<PathBuf> = Vec::new();
    for file in files {
        members.extend(companions(file));
    }

    let mut zip = ZipWriter::new(File::create(zip_path)?);
    let options = FileOptions::default();
    for member in &members {
        let name = member
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::MissingInput(member.clone()))?;
        debug!(member = name, "archiving");
        zip.start_file(name, options)?;
        let mut source = File::open(member)?;
        copy(&mut source, &mut zip)?;
    }
    zip.finish()?;

    for member in &members {
        std::fs::remove_file(member)?;
    }
    Ok(())
}

/// Names of the members of a zip archive.
pub fn list_members(zip_path: &Path) -> Result<Vec<String>> {
    let mut archive = ZipArchive::new(File::open(zip_path)?)?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        names.push(archive.by_index(i)?.name().to_string());
    }
    Ok(names)
}

/// Read one member of a zip archive as bytes.
pub fn read_member(zip_path: &Path, name: &str) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(File::open(zip_path)?)?;
    let mut entry = archive.by_name(name)?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Extract every member of a zip archive under `dest`, preserving the
/// member paths.
pub fn extract_all(zip_path: &Path, dest: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(File::open(zip_path)?)?;
    archive.extract(dest)?;
    Ok(())
}

/// Write a flat archive from `(name, bytes)` pairs.
pub fn write_flat_archive(zip_path: &Path, members: &[(String, Vec<u8>)]) -> Result<()> {
    let mut zip = ZipWriter::new(File::create(zip_path)?);
    let options = FileOptions::default();
    for (name, bytes) in members {
        zip.start_file(name, options)?;
        zip.write_all(bytes)?;
    }
    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_collects_shapefile_companions_and_removes_sources() {
        let dir = tempfile::tempdir().unwrap();
        let shp = dir.path().join("index.shp");
        let shx = dir.path().join("index.shx");
        let dbf = dir.path().join("index.dbf");
        let xml = dir.path().join("index.xml");
        for path in [&shp, &shx, &dbf, &xml] {
            std::fs::write(path, b"x").unwrap();
        }

        let zip_path = dir.path().join("product.zip");
        write_product_archive(&zip_path, &[shp.clone(), xml.clone()]).unwrap();

        let mut names = list_members(&zip_path).unwrap();
        names.sort();
        assert_eq!(names, vec!["index.dbf", "index.shp", "index.shx", "index.xml"]);
        assert!(!shp.exists());
        assert!(!xml.exists());
    }

    #[test]
    fn flat_archive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("flat.zip");
        write_flat_archive(
            &zip_path,
            &[("a.csv".to_string(), b"1,2\n".to_vec())],
        )
        .unwrap();
        assert_eq!(read_member(&zip_path, "a.csv").unwrap(), b"1,2\n");
    }
}
