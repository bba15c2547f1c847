//! Person records and their enriched index documents

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::names::VariantSet;

/// A person record as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameRecord {
    #[serde(default)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "dob_format")]
    pub dob: Option<NaiveDate>,
}

impl NameRecord {
    pub fn new(id: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            middle_name: None,
            city: None,
            state: None,
            dob: None,
        }
    }

    pub fn with_middle_name(mut self, middle_name: impl Into<String>) -> Self {
        self.middle_name = Some(middle_name.into());
        self
    }

    pub fn with_location(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self.state = Some(state.into());
        self
    }

    pub fn with_dob(mut self, dob: NaiveDate) -> Self {
        self.dob = Some(dob);
        self
    }

    /// "First Middle Last"
    pub fn display_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// A record plus everything derived from it for matching
///
/// Built fresh on every index call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedDocument {
    #[serde(flatten)]
    pub record: NameRecord,
    pub first_variants: VariantSet,
    pub last_variants: VariantSet,
    pub phonetic_first: VariantSet,
    pub phonetic_last: VariantSet,
    pub tokens: VariantSet,
}

impl EnrichedDocument {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }
}

/// Dates serialize as `YYYY-MM-DD`; full timestamps are accepted on input
mod dob_format {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(dob: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match dob {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        if let Ok(date) = NaiveDate::parse_from_str(raw, FORMAT) {
            return Ok(Some(date));
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Some(stamp.date_naive()));
        }
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Some(stamp.date()));
        }

        Err(serde::de::Error::custom(format!("invalid date of birth: {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_is_camel_case() {
        let record = NameRecord::new("p1", "Robert", "Smith")
            .with_location("Austin", "TX")
            .with_dob(NaiveDate::from_ymd_opt(1980, 2, 29).unwrap());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["firstName"], "Robert");
        assert_eq!(json["dob"], "1980-02-29");
        assert!(json.get("middleName").is_none());
    }

    #[test]
    fn test_record_parses_minimal_and_timestamped() {
        let minimal: NameRecord =
            serde_json::from_str(r#"{"firstName":"Liz","lastName":"Morrison"}"#).unwrap();
        assert!(minimal.id.is_empty());
        assert!(minimal.dob.is_none());

        let stamped: NameRecord = serde_json::from_str(
            r#"{"id":"7","firstName":"A","lastName":"B","dob":"1975-06-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(stamped.dob, NaiveDate::from_ymd_opt(1975, 6, 1));
    }

    #[test]
    fn test_bad_dob_rejected() {
        let parsed: Result<NameRecord, _> =
            serde_json::from_str(r#"{"firstName":"A","lastName":"B","dob":"someday"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_display_name() {
        let record = NameRecord::new("1", "Mary", "Jones").with_middle_name("Ann");
        assert_eq!(record.display_name(), "Mary Ann Jones");
        assert_eq!(NameRecord::new("2", "Cher", "").display_name(), "Cher");
    }

    #[test]
    fn test_document_flattens_record() {
        let doc = EnrichedDocument {
            record: NameRecord::new("p1", "Bob", "Smith"),
            first_variants: ["Bob", "robert"].into_iter().collect(),
            last_variants: ["Smith"].into_iter().collect(),
            phonetic_first: ["PP"].into_iter().collect(),
            phonetic_last: ["SM0", "XMT"].into_iter().collect(),
            tokens: ["Bob", "robert", "Smith", "PP", "SM0", "XMT"].into_iter().collect(),
        };

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["id"], "p1");
        assert_eq!(json["phoneticLast"][1], "XMT");

        let back: EnrichedDocument = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
        assert!(back.has_token("ROBERT"));
    }
}
