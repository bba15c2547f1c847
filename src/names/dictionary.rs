//! Seed nickname dictionaries
//!
//! A seed is a list of canonical names, each with the nicknames that link to
//! it. Two on-disk formats are understood:
//! - JSON: `{"elizabeth": ["liz", "beth"], ...}`
//! - CSV: one `canonical,nickname` pair per row

use crate::core::error::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Fallback dictionary used when no file is configured or it fails to load
pub const BUILTIN_JSON: &str = r#"{
  "elizabeth": ["liz", "beth", "lizzy", "eliza"],
  "william": ["bill", "will", "billy"],
  "robert": ["rob", "bob", "bobby"],
  "margaret": ["maggie", "meg", "peggy"],
  "katherine": ["kat", "kate", "kathy", "cathy"],
  "john": ["jack"],
  "henry": ["harry"]
}"#;

/// Canonical name with its nicknames, as read from the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedEntry {
    pub canonical: String,
    pub nicknames: Vec<String>,
}

/// Load a seed from a dictionary file, picking the format by extension
pub fn load(path: &Path) -> Result<Vec<SeedEntry>> {
    let text = std::fs::read_to_string(path)?;
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        Ok(parse_csv(&text))
    } else {
        parse_json(&text)
    }
}

/// The built-in default seed
pub fn builtin() -> Vec<SeedEntry> {
    parse_json(BUILTIN_JSON).unwrap_or_default()
}

/// Parse a JSON object of canonical -> nicknames
///
/// A bare string value counts as a single nickname; values of any other type
/// are skipped. Only a document that is not an object at all is an error.
pub fn parse_json(text: &str) -> Result<Vec<SeedEntry>> {
    let root: Value = serde_json::from_str(text)?;
    let object = root.as_object().ok_or_else(|| Error::ConfigError {
        message: "nickname dictionary must be a JSON object".to_string(),
    })?;

    let entries = object
        .iter()
        .map(|(canonical, value)| {
            let nicknames = match value {
                Value::Array(items) => items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(str::to_string)
                    .collect(),
                Value::String(single) => vec![single.clone()],
                _ => Vec::new(),
            };
            SeedEntry {
                canonical: canonical.clone(),
                nicknames,
            }
        })
        .collect();

    Ok(entries)
}

/// Parse `canonical,nickname` rows
///
/// Cells are trimmed and stripped of surrounding quotes. Rows without two
/// non-empty cells are dropped.
pub fn parse_csv(text: &str) -> Vec<SeedEntry> {
    text.lines()
        .filter_map(|line| {
            let mut cells = line
                .split(',')
                .map(|cell| cell.trim().trim_matches('"').trim());
            let canonical = cells.next().filter(|c| !c.is_empty())?;
            let nickname = cells.next().filter(|n| !n.is_empty())?;
            Some(SeedEntry {
                canonical: canonical.to_string(),
                nicknames: vec![nickname.to_string()],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_has_defaults() {
        let seed = builtin();
        assert_eq!(seed.len(), 7);
        let robert = seed.iter().find(|e| e.canonical == "robert").unwrap();
        assert_eq!(robert.nicknames, vec!["rob", "bob", "bobby"]);
    }

    #[test]
    fn test_parse_json_lenient_values() {
        let seed = parse_json(r#"{"henry": "harry", "odd": 3, "john": ["jack", 7]}"#).unwrap();
        let henry = seed.iter().find(|e| e.canonical == "henry").unwrap();
        assert_eq!(henry.nicknames, vec!["harry"]);
        let odd = seed.iter().find(|e| e.canonical == "odd").unwrap();
        assert!(odd.nicknames.is_empty());
        let john = seed.iter().find(|e| e.canonical == "john").unwrap();
        assert_eq!(john.nicknames, vec!["jack"]);
    }

    #[test]
    fn test_parse_json_rejects_non_object() {
        assert!(parse_json(r#"["liz"]"#).is_err());
        assert!(parse_json("not json").is_err());
    }

    #[test]
    fn test_parse_csv_rows() {
        let seed = parse_csv("william,bill\n\"robert\" , \"bob\"\nlonely\n,empty\n\n");
        assert_eq!(seed.len(), 2);
        assert_eq!(seed[1].canonical, "robert");
        assert_eq!(seed[1].nicknames, vec!["bob"]);
    }

    #[test]
    fn test_load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("names.csv");
        let mut file = std::fs::File::create(&csv_path).unwrap();
        writeln!(file, "margaret,peggy").unwrap();
        let seed = load(&csv_path).unwrap();
        assert_eq!(seed[0].canonical, "margaret");

        let json_path = dir.path().join("names.json");
        std::fs::write(&json_path, r#"{"margaret": ["meg"]}"#).unwrap();
        let seed = load(&json_path).unwrap();
        assert_eq!(seed[0].nicknames, vec!["meg"]);

        assert!(load(&dir.path().join("missing.json")).is_err());
    }
}
