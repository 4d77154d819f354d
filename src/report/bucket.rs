//! Bucket key listings: the anonymous S3 `ListObjectsV2` REST call, plus a
//! local newline-delimited listing file for offline runs.
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum BucketError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Bucket request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Bucket listing returned HTTP status {0}")]
    Status(u16),
    #[error("Malformed bucket listing: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// One page of a `ListObjectsV2` response.
struct ListingPage {
    keys: Vec<String>,
    continuation: Option<String>,
    truncated: bool,
}

fn parse_listing_page(body: &str) -> Result<ListingPage, BucketError> {
    let mut reader = Reader::from_str(body);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut curr = String::new();
    let mut in_contents = false;

    let mut page = ListingPage {
        keys: Vec::new(),
        continuation: None,
        truncated: false,
    };
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                curr = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if curr == "Contents" {
                    in_contents = true;
                }
            }
            Event::Text(e) => {
                let text = e.unescape()?.to_string();
                match curr.as_str() {
                    "Key" if in_contents => page.keys.push(text),
                    "NextContinuationToken" => page.continuation = Some(text),
                    "IsTruncated" => page.truncated = text == "true",
                    _ => {}
                }
            }
            Event::End(ref e) => {
                if e.name().as_ref() == b"Contents" {
                    in_contents = false;
                }
                curr.clear();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(page)
}

/// List every key of a public bucket through the anonymous `ListObjectsV2`
/// call, following continuation tokens.
pub fn list_bucket(bucket: &str) -> Result<Vec<String>, BucketError> {
    let client = reqwest::blocking::Client::new();
    let url = format!("https://{bucket}.s3.amazonaws.com/");

    let mut keys = Vec::new();
    let mut continuation: Option<String> = None;
    loop {
        let mut request = client.get(&url).query(&[("list-type", "2")]);
        if let Some(token) = &continuation {
            request = request.query(&[("continuation-token", token.as_str())]);
        }
        let response = request.send()?;
        if !response.status().is_success() {
            return Err(BucketError::Status(response.status().as_u16()));
        }
        let page = parse_listing_page(&response.text()?)?;
        debug!(keys = page.keys.len(), "listing page received");
        keys.extend(page.keys);
        if !page.truncated {
            break;
        }
        match page.continuation {
            Some(token) => continuation = Some(token),
            None => break,
        }
    }
    info!(bucket, keys = keys.len(), "bucket listing complete");
    Ok(keys)
}

/// Read a newline-delimited key listing from a local file.
pub fn read_listing_file(path: &Path) -> Result<Vec<String>, BucketError> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>iride-lot2</Name>
  <IsTruncated>true</IsTruncated>
  <NextContinuationToken>token-1</NextContinuationToken>
  <Contents>
    <Key>data/SE-S3-01/SNT/20220101_20221231/sicilia/S3-01-SNT-02/p_01.zip</Key>
    <LastModified>2024-03-15T00:00:00.000Z</LastModified>
    <Size>1024</Size>
  </Contents>
  <Contents>
    <Key>data/SE-S3-01/SNT/20220101_20221231/sicilia/S3-01-SNT-02/</Key>
  </Contents>
</ListBucketResult>"#;

    #[test]
    fn listing_page_parses_keys_and_pagination() {
        let page = parse_listing_page(PAGE).unwrap();
        assert_eq!(page.keys.len(), 2);
        assert!(page.keys[0].ends_with("p_01.zip"));
        assert!(page.truncated);
        assert_eq!(page.continuation.as_deref(), Some("token-1"));
    }

    #[test]
    fn final_page_stops_the_loop() {
        let body = PAGE
            .replace("<IsTruncated>true</IsTruncated>", "<IsTruncated>false</IsTruncated>")
            .replace("<NextContinuationToken>token-1</NextContinuationToken>", "");
        let page = parse_listing_page(&body).unwrap();
        assert!(!page.truncated);
        assert!(page.continuation.is_none());
    }

    #[test]
    fn listing_file_drops_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing.txt");
        std::fs::write(&path, "a/b/c.zip\n\n  \nd/e/f.zip\n").unwrap();
        let keys = read_listing_file(&path).unwrap();
        assert_eq!(keys, vec!["a/b/c.zip", "d/e/f.zip"]);
    }
}
