//! Positional decoding of the processing field of delivered product names.
//!
//! The orbit direction and calibration markers sit at service-specific
//! offsets inside the 5th `_` field of a product name; the offset depends on
//! the field length for most services. Out-of-range lookups answer `NA`
//! instead of aborting the report.

const NA: &str = "NA";

fn nth(processing: &str, idx: usize) -> Option<char> {
    processing.chars().nth(idx)
}

fn char_at(processing: &str, idx: usize) -> String {
    nth(processing, idx).map(String::from).unwrap_or_else(|| NA.to_string())
}

/// Orbit direction of a delivered GSP, decoded from its processing field.
/// SE-S3-07 products do not carry the marker yet.
pub fn gsp_direction(processing: &str, svc_id: &str, gsp_id: &str) -> String {
    match svc_id {
        "SE-S3-01" => {
            if gsp_id == "S3-01-SNT-03" || gsp_id == "S3-01-SNT-04" {
                char_at(processing, 3)
            } else {
                char_at(processing, 6)
            }
        }
        "SE-S3-02" => {
            if processing.len() == 5 {
                char_at(processing, 4)
            } else {
                char_at(processing, 6)
            }
        }
        "SE-S3-03" => {
            if processing.len() > 13 {
                char_at(processing, 9)
            } else {
                char_at(processing, 6)
            }
        }
        "SE-S3-04" => char_at(processing, 6),
        "SE-S3-05" => {
            if processing.len() >= 11 {
                char_at(processing, 9)
            } else {
                char_at(processing, 6)
            }
        }
        "SE-S3-06" => {
            if processing.len() >= 14 {
                char_at(processing, 9)
            } else if processing.len() == 13 {
                char_at(processing, 6)
            } else if processing.len() <= 8 {
                NA.to_string()
            } else {
                char_at(processing, 6)
            }
        }
        _ => NA.to_string(),
    }
}

fn yes_no(calib: Option<char>, yes: &[char]) -> String {
    match calib {
        Some(c) if yes.contains(&c) => "Yes".to_string(),
        Some(_) => "No".to_string(),
        None => NA.to_string(),
    }
}

/// Calibration flag of a delivered GSP, decoded from its processing field.
pub fn calibration_flag(processing: &str, svc_id: &str, gsp_id: &str) -> String {
    match svc_id {
        "SE-S3-01" => {
            if matches!(gsp_id, "S3-01-SNT-02" | "S3-01-SNT-03" | "S3-01-SNT-04") {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        "SE-S3-02" => {
            if processing.len() == 5 || processing.ends_with('C') {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        "SE-S3-03" => {
            let calib = if processing.len() == 9 {
                nth(processing, 7)
            } else if gsp_id == "S3-03-CHA-04" {
                nth(processing, 7)
            } else {
                nth(processing, 10)
            };
            yes_no(calib, &['O', 'C'])
        }
        "SE-S3-04" => "No".to_string(),
        "SE-S3-05" => {
            let calib = if processing.len() <= 10 {
                nth(processing, 7)
            } else {
                nth(processing, 10)
            };
            yes_no(calib, &['M', 'C'])
        }
        "SE-S3-06" => {
            let calib = match processing.len() {
                8 => nth(processing, 6),
                9 | 11 | 13 => nth(processing, 7),
                _ => nth(processing, 10),
            };
            yes_no(calib, &['O', 'C'])
        }
        // Reserved until the on-demand service delivers its first release.
        "SE-S3-07" => NA.to_string(),
        _ => NA.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svc01_direction_depends_on_the_product() {
        assert_eq!(gsp_direction("117A0266IW1", "SE-S3-01", "S3-01-SNT-02"), "6");
        assert_eq!(gsp_direction("E42N21V", "SE-S3-01", "S3-01-SNT-03"), "N");
    }

    #[test]
    fn svc02_direction_uses_the_short_form_offset() {
        assert_eq!(gsp_direction("042AC", "SE-S3-02", "S3-02-SNT-02"), "C");
        assert_eq!(gsp_direction("117A0266IW1", "SE-S3-02", "S3-02-SNT-05"), "6");
    }

    #[test]
    fn out_of_range_offsets_answer_na() {
        assert_eq!(gsp_direction("ab", "SE-S3-04", "S3-04-SNT-02"), "NA");
        assert_eq!(gsp_direction("short", "SE-S3-06", "S3-06-VOL-02"), "NA");
        assert_eq!(gsp_direction("x", "SE-S3-99", "S3-01-SNT-01"), "NA");
    }

    #[test]
    fn svc01_calibration_is_a_product_property() {
        assert_eq!(
            calibration_flag("any", "SE-S3-01", "S3-01-SNT-02"),
            "Yes"
        );
        assert_eq!(calibration_flag("any", "SE-S3-01", "S3-01-SNT-01"), "No");
    }

    #[test]
    fn svc02_calibration_suffix() {
        assert_eq!(calibration_flag("042AC", "SE-S3-02", "S3-02-SNT-02"), "Yes");
        assert_eq!(
            calibration_flag("117A0266IW1C", "SE-S3-02", "S3-02-SNT-02"),
            "Yes"
        );
        assert_eq!(
            calibration_flag("117A0266IW1B", "SE-S3-02", "S3-02-SNT-02"),
            "No"
        );
    }

    #[test]
    fn svc07_is_reserved() {
        assert_eq!(calibration_flag("whatever", "SE-S3-07", "S3-07-OND-01"), "NA");
    }
}
