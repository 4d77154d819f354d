use tempfile::TempDir;

use iride_gsp::report::bucket::read_listing_file;
use iride_gsp::report::{build_report, write_report, REPORT_HEADER};
use iride_gsp::types::ReportFormat;

const LISTING: &str = "\
data/SE-S3-01/SNT/20220101_20221231/sicilia/S3-01-SNT-02/ISS_S301SNT02_20220101_20221231_117A0266IW1_01.zip
data/SE-S3-01/SNT/20220101_20221231/sicilia/S3-01-SNT-02/
data/SE-S3-01/SNT/20220101_20221231/sicilia/S3-01-SNT-02/style.qml
data/SE-S3-02/SNT/20220101_20221231/calabria/S3-02-SNT-05/ISS_S302SNT05_20220101_20221231_117A0266IW1C_01.zip
";

#[test]
fn listing_file_builds_the_delivery_report() {
    let dir = TempDir::new().unwrap();
    let listing_file = dir.path().join("listing.txt");
    std::fs::write(&listing_file, LISTING).unwrap();

    let keys = read_listing_file(&listing_file).unwrap();
    assert_eq!(keys.len(), 4);

    let rows = build_report(&keys, None).unwrap();
    // Style file and directory placeholder are dropped.
    assert_eq!(rows.len(), 2);

    let svc01 = &rows[0];
    assert_eq!(svc01.svc_id, "SE-S3-01");
    assert_eq!(svc01.aoi, "Sicilia");
    assert_eq!(svc01.start_date, "15/01/2022");
    assert_eq!(svc01.scheduled_delivery_date, "01/02/2024");
    assert_eq!(svc01.calibrated, "Yes");
    assert_eq!(svc01.gsp_name, "Single Geometry Calibrated Deformation.");

    let svc02 = &rows[1];
    assert_eq!(svc02.aoi, "Calabria");
    assert_eq!(svc02.scheduled_delivery_date, "15/02/2024");
    assert_eq!(svc02.delivery_date, "15/03/2024");
    assert_eq!(svc02.calibrated, "Yes");

    let out = write_report(&rows, dir.path(), ReportFormat::Csv).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().unwrap(), REPORT_HEADER.join(","));
    assert_eq!(lines.count(), 2);
    assert!(out
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("Lot-2_GSP_Delivery_Report-"));
}

#[test]
fn tab_separated_report() {
    let dir = TempDir::new().unwrap();
    let keys: Vec<String> = LISTING.lines().map(str::to_string).collect();
    let rows = build_report(&keys, Some("calabria")).unwrap();
    assert_eq!(rows.len(), 1);

    let out = write_report(&rows, dir.path(), ReportFormat::Txt).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.lines().next().unwrap().contains("SVC_ID\tGSP_ID"));
    assert!(out.extension().unwrap() == "txt");
}
