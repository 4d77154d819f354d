//! Delivery reports: turn a bucket listing into the Lot-2 GSP delivery
//! report table.
pub mod bucket;
pub mod codes;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::catalog::aoi::get_aoi_info;
use crate::catalog::gsp;
use crate::error::{Error, Result};
use crate::types::ReportFormat;

/// Report column headers, in output order.
pub const REPORT_HEADER: &[&str] = &[
    "SVC_ID",
    "GSP_ID",
    "AOI",
    "GSP_Path",
    "Start_Date",
    "End_Date",
    "Sensor",
    "Data_Type",
    "Scheduled_Delivery_Date",
    "Delivery_Date",
    "GSP_Name",
    "Direction",
    "Calibrated",
];

/// Delivery date of the first Lot-2 release.
const FIRST_RELEASE_DELIVERY: &str = "15/03/2024";

/// Style and sidecar files excluded from the report.
const SKIP_SUFFIXES: &[&str] = &["DS_Store", "qml", "sld"];

/// One row of the delivery report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub svc_id: String,
    pub gsp_id: String,
    pub aoi: String,
    pub gsp_path: String,
    pub start_date: String,
    pub end_date: String,
    pub sensor: String,
    pub data_type: String,
    pub scheduled_delivery_date: String,
    pub delivery_date: String,
    pub gsp_name: String,
    pub direction: String,
    pub calibrated: String,
}

impl ReportRow {
    fn as_record(&self) -> [&str; 13] {
        [
            &self.svc_id,
            &self.gsp_id,
            &self.aoi,
            &self.gsp_path,
            &self.start_date,
            &self.end_date,
            &self.sensor,
            &self.data_type,
            &self.scheduled_delivery_date,
            &self.delivery_date,
            &self.gsp_name,
            &self.direction,
            &self.calibrated,
        ]
    }
}

/// The 15th of the month of a compact `yyyymm…` timestamp, `dd/mm/yyyy`.
fn mid_month(stamp: &str) -> Result<String> {
    let year: i32 = stamp
        .get(0..4)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::Parse(format!("bad year in `{stamp}`")))?;
    let month: u32 = stamp
        .get(4..6)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::Parse(format!("bad month in `{stamp}`")))?;
    let date = NaiveDate::from_ymd_opt(year, month, 15)
        .ok_or_else(|| Error::Parse(format!("bad reference period `{stamp}`")))?;
    Ok(date.format("%d/%m/%Y").to_string())
}

/// Parse one bucket key into a report row. Returns `Ok(None)` for keys that
/// do not describe a delivered product (styles, placeholders, short keys).
/// Unknown AOI segments abort the report.
pub fn parse_key(key: &str) -> Result<Option<ReportRow>> {
    if key.ends_with('/') {
        return Ok(None);
    }
    if let Some(suffix) = key.rsplit('.').next() {
        if SKIP_SUFFIXES.contains(&suffix) {
            return Ok(None);
        }
    }

    // Key schema: data/{svc_id}/{sensor}/{period}/{aoi}/{gsp_id}/…/{product}
    let segments: Vec<&str> = key.split('/').collect();
    if segments.len() < 7 {
        debug!(key, "skipping key outside the delivery layout");
        return Ok(None);
    }
    let svc_id = segments[1];
    let sensor = segments[2];
    let period = segments[3];
    let aoi_id = segments[4];
    let gsp_id = segments[5];
    let product = segments[segments.len() - 1];

    let (period_start, period_end) = period
        .split_once('_')
        .ok_or_else(|| Error::Parse(format!("bad reference period `{period}`")))?;

    let aoi = get_aoi_info(aoi_id)?;

    let processing = product.split('_').nth(4).unwrap_or("");
    let scheduled = if svc_id == "SE-S3-01" {
        "01/02/2024"
    } else {
        "15/02/2024"
    };

    Ok(Some(ReportRow {
        svc_id: svc_id.to_string(),
        gsp_id: gsp_id.to_string(),
        aoi: aoi.name.to_string(),
        gsp_path: key.to_string(),
        start_date: mid_month(period_start)?,
        end_date: mid_month(period_end)?,
        sensor: sensor.to_string(),
        data_type: gsp::data_type(gsp_id).to_string(),
        scheduled_delivery_date: scheduled.to_string(),
        delivery_date: FIRST_RELEASE_DELIVERY.to_string(),
        gsp_name: gsp::description(gsp_id).to_string(),
        direction: codes::gsp_direction(processing, svc_id, gsp_id),
        calibrated: codes::calibration_flag(processing, svc_id, gsp_id),
    }))
}

/// Build the report from a key listing, keeping only keys under `sub_dir`
/// when one is given.
pub fn build_report(keys: &[String], sub_dir: Option<&str>) -> Result<Vec<ReportRow>> {
    let mut rows = Vec::new();
    for key in keys {
        if let Some(dir) = sub_dir {
            if !key.contains(dir) {
                continue;
            }
        }
        if let Some(row) = parse_key(key)? {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Write the report as `Lot-2_GSP_Delivery_Report-YYYYMMDD.{csv,txt}` in
/// `out_dir`. Returns the output path.
pub fn write_report(
    rows: &[ReportRow],
    out_dir: &Path,
    format: ReportFormat,
) -> Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d");
    let out_path = out_dir.join(format!(
        "Lot-2_GSP_Delivery_Report-{stamp}.{}",
        format.extension()
    ));

    let mut builder = csv::WriterBuilder::new();
    if format == ReportFormat::Txt {
        builder.delimiter(b'\t');
    }
    let mut writer = builder.from_path(&out_path)?;
    writer.write_record(REPORT_HEADER)?;
    for row in rows {
        writer.write_record(row.as_record())?;
    }
    writer.flush()?;
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "data/SE-S3-02/SNT/20220101_20221231/sicilia/S3-02-SNT-05/\
                       ISS_S302SNT05_20220101_20221231_117A0266IW1C_01.zip";

    #[test]
    fn key_parses_into_a_report_row() {
        let row = parse_key(KEY).unwrap().unwrap();
        assert_eq!(row.svc_id, "SE-S3-02");
        assert_eq!(row.gsp_id, "S3-02-SNT-05");
        assert_eq!(row.aoi, "Sicilia");
        assert_eq!(row.start_date, "15/01/2022");
        assert_eq!(row.end_date, "15/12/2022");
        assert_eq!(row.scheduled_delivery_date, "15/02/2024");
        assert_eq!(row.delivery_date, "15/03/2024");
        assert_eq!(row.calibrated, "Yes");
        assert_eq!(
            row.data_type,
            "ESRI Shapefile (Geometry: Points) + CSV"
        );
    }

    #[test]
    fn style_files_and_placeholders_are_skipped() {
        assert!(parse_key("data/SE-S3-02/SNT/x/y/z/style.qml").unwrap().is_none());
        assert!(parse_key("data/SE-S3-02/SNT/x/y/z/").unwrap().is_none());
        assert!(parse_key("data/short").unwrap().is_none());
    }

    #[test]
    fn unknown_aoi_aborts_the_report() {
        let key = "data/SE-S3-02/SNT/20220101_20221231/atlantis/S3-02-SNT-05/p_01.zip";
        assert!(matches!(parse_key(key), Err(Error::UnknownAoi(_))));
    }

    #[test]
    fn sub_dir_filter_restricts_the_listing() {
        let keys = vec![
            KEY.to_string(),
            KEY.replace("sicilia", "calabria"),
        ];
        let all = build_report(&keys, None).unwrap();
        assert_eq!(all.len(), 2);
        let filtered = build_report(&keys, Some("calabria")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].aoi, "Calabria");
    }

    #[test]
    fn svc01_gets_the_earlier_scheduled_date() {
        let key = "data/SE-S3-01/SNT/20220101_20221231/sicilia/S3-01-SNT-02/\
                   ISS_S301SNT02_20220101_20221231_117A0266IW1_01.zip";
        let row = parse_key(key).unwrap().unwrap();
        assert_eq!(row.scheduled_delivery_date, "01/02/2024");
        assert_eq!(row.calibrated, "Yes");
    }
}
