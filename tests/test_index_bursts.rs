use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use geo_types::{polygon, MultiPolygon};
use tempfile::TempDir;

use iride_gsp::index::index_bursts;
use iride_gsp::io::shp::{read_polygon_layer, write_polygon_records};

fn square(x0: f64, y0: f64, size: f64) -> MultiPolygon<f64> {
    polygon![
        (x: x0, y: y0),
        (x: x0 + size, y: y0),
        (x: x0 + size, y: y0 + size),
        (x: x0, y: y0 + size),
    ]
    .into()
}

fn write_burst_archive(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
    let options = zip::write::FileOptions::default();
    zip.start_file("metadata.xml", options).unwrap();
    zip.write_all(
        b"<GSP><product_id>S3-01-SNT-02</product_id>\
          <start_date>2022-01-01</start_date>\
          <end_date>2022-12-31</end_date></GSP>",
    )
    .unwrap();
    zip.start_file("data.csv", options).unwrap();
    zip.write_all(b"LAT,LON,CODE\n38.0,14.0,P1\n").unwrap();
    zip.finish().unwrap();
    path
}

#[test]
fn burst_index_matches_archives_and_keeps_placeholders() {
    let root = TempDir::new().unwrap();
    let burst_dir = root.path().join("bursts");
    std::fs::create_dir_all(&burst_dir).unwrap();

    // Two footprints over Sicily, one off the coast of Spain.
    let footprint_fields = ["Name", "Track", "Burst", "Subswath"];
    let footprints = vec![
        (
            square(14.0, 37.5, 0.5),
            vec!["B1".into(), "117".into(), "0266".into(), "IW1".into()],
        ),
        (
            square(14.5, 37.5, 0.5),
            vec!["B2".into(), "117".into(), "0267".into(), "IW1".into()],
        ),
        (
            square(0.0, 40.0, 0.5),
            vec!["B3".into(), "044".into(), "0110".into(), "IW2".into()],
        ),
    ];
    let footprint_file = root.path().join("footprints.shp");
    write_polygon_records(&footprint_file, &footprint_fields, &footprints).unwrap();

    let aoi_file = root.path().join("sicilia.shp");
    write_polygon_records(
        &aoi_file,
        &["id"],
        &[(square(12.0, 36.0, 4.0), vec!["SIC".into()])],
    )
    .unwrap();

    // Only the first footprint has a delivered archive.
    write_burst_archive(&burst_dir, "ISS_S301SNT02_20220101_20221231_117A0266IW1C_01.zip");

    let out_shp = index_bursts(&footprint_file, &aoi_file, &burst_dir).unwrap();
    assert_eq!(out_shp, burst_dir.parent().unwrap().join("AOIs_bursts/sicilia.shp"));

    let index = read_polygon_layer(&out_shp).unwrap();
    assert_eq!(index.len(), 2);

    let matched = index.iter().find(|r| r.attr("Name") == "B1").unwrap();
    assert_eq!(matched.attr("Orbit_Dir"), "A");
    assert_eq!(matched.attr("c_type"), "C");
    assert_eq!(matched.attr("start_date"), "2022-01-01");
    assert_eq!(matched.attr("end_date"), "2022-12-31");
    assert!(matched.attr("Path").ends_with("117A0266IW1C_01.zip"));

    let placeholder = index.iter().find(|r| r.attr("Name") == "B2").unwrap();
    assert_eq!(placeholder.attr("Path"), "None");
    assert_eq!(placeholder.attr("c_type"), "None");
    assert_eq!(placeholder.attr("start_date"), "None");

    // The Spanish footprint never intersects the AOI.
    assert!(index.iter().all(|r| r.attr("Name") != "B3"));
}

#[test]
fn empty_join_is_an_error() {
    let root = TempDir::new().unwrap();
    let burst_dir = root.path().join("bursts");
    std::fs::create_dir_all(&burst_dir).unwrap();

    let footprint_file = root.path().join("footprints.shp");
    write_polygon_records(
        &footprint_file,
        &["Name", "Track", "Burst", "Subswath"],
        &[(
            square(0.0, 40.0, 0.5),
            vec!["B3".into(), "044".into(), "0110".into(), "IW2".into()],
        )],
    )
    .unwrap();

    let aoi_file = root.path().join("sicilia.shp");
    write_polygon_records(
        &aoi_file,
        &["id"],
        &[(square(12.0, 36.0, 4.0), vec!["SIC".into()])],
    )
    .unwrap();

    assert!(matches!(
        index_bursts(&footprint_file, &aoi_file, &burst_dir),
        Err(iride_gsp::Error::EmptyJoin { .. })
    ));
}
