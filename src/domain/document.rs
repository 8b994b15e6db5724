use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

/// Keys the scraper fills in `other_data`
pub mod other_data_keys {
    pub const VERSION: &str = "version";
    pub const CATEGORY: &str = "category";
    pub const SUB_CATEGORY: &str = "sub_category";
    pub const FILENAME: &str = "filename";
}

/// One discovered document, as handed to the host platform.
///
/// Host-owned fields (`doc_id`, `abstract_text`, `text`, `local_link`,
/// `load_date`) are always `None` when produced by a scrape pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SppDocument {
    pub doc_id: Option<i64>,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub text: Option<String>,
    pub web_link: String,
    pub local_link: Option<String>,
    pub other_data: HashMap<String, serde_json::Value>,
    /// `DateTime::<Utc>::MIN_UTC` when the publication date is unknown
    pub pub_date: DateTime<Utc>,
    pub load_date: Option<DateTime<Utc>>,
}

impl SppDocument {
    /// Sentinel publication date for documents without a recognizable date
    pub const UNKNOWN_PUB_DATE: DateTime<Utc> = DateTime::<Utc>::MIN_UTC;

    /// Build a record the way a scrape pass does: only the scraped fields set
    pub fn scraped(
        title: impl Into<String>,
        web_link: impl Into<String>,
        other_data: HashMap<String, serde_json::Value>,
        pub_date: DateTime<Utc>,
    ) -> Self {
        Self {
            doc_id: None,
            title: title.into(),
            abstract_text: None,
            text: None,
            web_link: web_link.into(),
            local_link: None,
            other_data,
            pub_date,
            load_date: None,
        }
    }

    /// Identity hash used by the host for duplicate and novelty checks.
    ///
    /// SHA-256 over `title_weblink_timestamp`, recomputed on every call.
    /// The timestamp is written as a float in seconds, `1614556800.0`.
    pub fn hash(&self) -> [u8; 32] {
        let concat_name = format!(
            "{}_{}_{}",
            self.title,
            self.web_link,
            float_timestamp(&self.pub_date)
        );
        Sha256::digest(concat_name.as_bytes()).into()
    }

    /// Hex rendering of [`SppDocument::hash`]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash())
    }

    /// False when the page gave no recognizable date and `pub_date` holds
    /// [`SppDocument::UNKNOWN_PUB_DATE`]
    pub fn pub_date_known(&self) -> bool {
        self.pub_date != Self::UNKNOWN_PUB_DATE
    }

    /// String value of an `other_data` entry, if present
    pub fn other_str(&self, key: &str) -> Option<&str> {
        self.other_data.get(key).and_then(serde_json::Value::as_str)
    }
}

/// Seconds since the epoch in shortest float form: `0.0`, `1614556800.5`
#[allow(clippy::cast_precision_loss)]
fn float_timestamp(date: &DateTime<Utc>) -> String {
    match date.timestamp_subsec_micros() {
        0 => format!("{}.0", date.timestamp()),
        _ => format!("{:?}", date.timestamp_micros() as f64 / 1e6),
    }
}

impl fmt::Display for SppDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Find document | name: {} | link to web: {} | publication date: {}",
            self.title, self.web_link, self.pub_date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(title: &str, link: &str, pub_date: DateTime<Utc>) -> SppDocument {
        SppDocument::scraped(title, link, HashMap::new(), pub_date)
    }

    #[test]
    fn hash_is_stable_for_identical_identity_fields() {
        let date = Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap();
        let a = sample("PCI DSS", "https://example.com/a.pdf", date);
        let mut b = sample("PCI DSS", "https://example.com/a.pdf", date);
        b.other_data
            .insert(other_data_keys::VERSION.to_string(), "v4.0".into());
        b.doc_id = Some(7);

        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.hash_hex().len(), 64);
    }

    #[test]
    fn hash_changes_with_each_identity_field() {
        let date = Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap();
        let base = sample("PCI DSS", "https://example.com/a.pdf", date);

        let other_title = sample("SAQ A", "https://example.com/a.pdf", date);
        let other_link = sample("PCI DSS", "https://example.com/b.pdf", date);
        let other_date = sample(
            "PCI DSS",
            "https://example.com/a.pdf",
            Utc.with_ymd_and_hms(2022, 3, 1, 0, 0, 0).unwrap(),
        );

        assert_ne!(base.hash(), other_title.hash());
        assert_ne!(base.hash(), other_link.hash());
        assert_ne!(base.hash(), other_date.hash());
    }

    #[test]
    fn hash_matches_known_sha256_of_concatenation() {
        let date = Utc.timestamp_opt(0, 0).unwrap();
        let doc = sample("t", "l", date);
        let expected: [u8; 32] = Sha256::digest(b"t_l_0.0").into();
        assert_eq!(doc.hash(), expected);
    }

    #[test]
    fn hash_writes_the_timestamp_as_float_seconds() {
        let doc = sample("t", "l", Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(
            doc.hash_hex(),
            "271303d452d2a6a523b881d44336904a6acdb9207dc40a53e2fe91b82d8a0b0a"
        );

        let half_second = Utc.timestamp_opt(1_614_556_800, 500_000_000).unwrap();
        assert_eq!(float_timestamp(&half_second), "1614556800.5");
        assert_eq!(
            float_timestamp(&SppDocument::UNKNOWN_PUB_DATE),
            format!("{}.0", SppDocument::UNKNOWN_PUB_DATE.timestamp())
        );
    }

    #[test]
    fn sentinel_date_is_reported_unknown() {
        let doc = sample("t", "l", SppDocument::UNKNOWN_PUB_DATE);
        assert!(!doc.pub_date_known());
        // the sentinel still hashes deterministically
        assert_eq!(doc.hash(), sample("t", "l", SppDocument::UNKNOWN_PUB_DATE).hash());
    }

    #[test]
    fn display_matches_discovery_log_line() {
        let date = Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap();
        let doc = sample("SAQ A", "https://example.com/saq.pdf", date);
        assert_eq!(
            doc.to_string(),
            "Find document | name: SAQ A | link to web: https://example.com/saq.pdf | publication date: 2021-03-01 00:00:00 UTC"
        );
    }
}
