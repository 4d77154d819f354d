//! Repackage provider deliveries: some products arrive wrapped in the
//! provider's nested `data/IRIDE/S3-02-SNT-05` tree. Extract each archive,
//! keep the XML and CSV files belonging to the product, and re-zip them flat
//! under the original product name.
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::info;

use crate::error::{Error, Result};
use crate::io::archive::{extract_all, write_flat_archive};

/// Provider-side directory layout holding the product files.
const NESTED_LAYOUT: &[&str] = &["data", "IRIDE", "S3-02-SNT-05"];

fn product_files(extracted: &Path, product_stem: &str) -> Result<Vec<PathBuf>> {
    let mut nested = extracted.to_path_buf();
    for segment in NESTED_LAYOUT {
        nested.push(segment);
    }
    if !nested.is_dir() {
        return Err(Error::MissingInput(nested));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(&nested)? {
        let path = entry?.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        let keep = (name.ends_with(".xml") || name.ends_with(".csv"))
            && name.contains(product_stem);
        if keep {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Re-zip one provider archive flat into `out_dir`. Returns the new archive
/// path.
pub fn repackage_archive(zip_file: &Path, out_dir: &Path) -> Result<PathBuf> {
    let stem = zip_file
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::MissingInput(zip_file.to_path_buf()))?;

    info!(file = %zip_file.display(), "extracting provider archive");
    let tmp = TempDir::new()?;
    extract_all(zip_file, tmp.path())?;

    let mut members = Vec::new();
    for path in product_files(tmp.path(), stem)? {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::MissingInput(path.clone()))?
            .to_string();
        members.push((name, std::fs::read(&path)?));
    }

    let out_zip = out_dir.join(format!("{stem}.zip"));
    info!(file = %out_zip.display(), "creating flat archive");
    write_flat_archive(&out_zip, &members)?;
    Ok(out_zip)
}

/// Repackage every zip archive found in `in_dir`. Returns the archives
/// written to `out_dir`.
pub fn repackage_dir(in_dir: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
    if !in_dir.is_dir() {
        return Err(Error::MissingInput(in_dir.to_path_buf()));
    }
    std::fs::create_dir_all(out_dir)?;

    let mut zips: Vec<PathBuf> = std::fs::read_dir(in_dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("zip"))
        .collect();
    zips.sort();

    let mut written = Vec::with_capacity(zips.len());
    for zip_file in &zips {
        written.push(repackage_archive(zip_file, out_dir)?);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    use crate::io::archive::list_members;

    fn provider_archive(dir: &Path, stem: &str) -> PathBuf {
        let path = dir.join(format!("{stem}.zip"));
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        let options = FileOptions::default();
        for (member, body) in [
            (format!("data/IRIDE/S3-02-SNT-05/{stem}.csv"), "a,b\n1,2\n"),
            (format!("data/IRIDE/S3-02-SNT-05/{stem}.xml"), "<GSP/>"),
            (
                "data/IRIDE/S3-02-SNT-05/other_product.csv".to_string(),
                "c\n",
            ),
            ("data/IRIDE/S3-02-SNT-05/style.qml".to_string(), "<qgis/>"),
        ] {
            zip.start_file(member, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        path
    }

    #[test]
    fn repackaging_flattens_the_product_files() {
        let dir = tempfile::tempdir().unwrap();
        let in_dir = dir.path().join("in");
        let out_dir = dir.path().join("out");
        std::fs::create_dir_all(&in_dir).unwrap();
        let stem = "ISS_S302SNT05_20220101_20221231_117A0266IW1C_01";
        provider_archive(&in_dir, stem);

        let written = repackage_dir(&in_dir, &out_dir).unwrap();
        assert_eq!(written.len(), 1);

        let mut members = list_members(&written[0]).unwrap();
        members.sort();
        assert_eq!(members, vec![format!("{stem}.csv"), format!("{stem}.xml")]);
    }

    #[test]
    fn missing_input_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            repackage_dir(&missing, dir.path()),
            Err(Error::MissingInput(_))
        ));
    }
}
