//! Records and record sets parsed from pack resources
//!
//! A pack is comma-delimited text: the first line names the fields, every
//! following non-blank line is one record. Two parsers are available:
//!
//! - [`ParseMode::Naive`] splits each line on `,` with no quoting support.
//!   A comma inside a value starts a new field.
//! - [`ParseMode::Quoted`] follows RFC 4180 via the `csv` crate, so
//!   `"a, b"` stays a single value.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::Cursor;

/// Field separator for pack resources
pub const DELIMITER: char = ',';

/// Name of the field holding the renderable reference
pub const REFERENCE_FIELD: &str = "analysis_url";

/// How record lines are split into fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Plain split on the delimiter
    #[default]
    Naive,
    /// RFC 4180 quoting and escaping
    Quoted,
}

/// One labeled record, fields kept in header order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Zip row values against header names by position
    ///
    /// Missing trailing values leave their fields absent; surplus values are
    /// dropped. Names and values are trimmed.
    pub fn from_row<'a, I>(headers: &[String], values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut record = Record::default();
        for (name, value) in headers.iter().zip(values) {
            record.insert(name, value.trim());
        }
        record
    }

    /// Set a field, replacing an earlier field of the same name in place
    pub fn insert(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The renderable reference, if present and non-empty
    pub fn reference(&self) -> Option<&str> {
        self.get(REFERENCE_FIELD).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Ordered records of one pack, in input line order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl RecordSet {
    /// Parse pack text with the given mode; neither mode rejects input
    pub fn parse(text: &str, mode: ParseMode) -> Self {
        match mode {
            ParseMode::Naive => Self::parse_naive(text),
            ParseMode::Quoted => Self::parse_quoted(text),
        }
    }

    /// Split on newlines and the delimiter; never fails
    pub fn parse_naive(text: &str) -> Self {
        let mut lines = text.split('\n');

        let headers: Vec<String> = lines
            .next()
            .unwrap_or_default()
            .split(DELIMITER)
            .map(|h| h.trim().to_string())
            .collect();

        let records = lines
            .filter(|line| !line.trim().is_empty())
            .map(|line| Record::from_row(&headers, line.split(DELIMITER)))
            .collect();

        Self { headers, records }
    }

    /// RFC 4180 parsing; rows of different widths are accepted
    ///
    /// Unbalanced quotes are read leniently (a dangling quote runs to the end
    /// of input), so this never fails either.
    pub fn parse_quoted(text: &str) -> Self {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER as u8)
            .has_headers(false)
            .flexible(true)
            .from_reader(Cursor::new(text.as_bytes()));

        let mut headers: Option<Vec<String>> = None;
        let mut records = Vec::new();

        // A flexible reader over UTF-8 text has no failing rows
        for row in reader.records().filter_map(Result::ok) {
            match &headers {
                None => headers = Some(row.iter().map(|h| h.trim().to_string()).collect()),
                Some(names) => {
                    // A whitespace-only line reads as a single blank field
                    if row.len() == 1 && row[0].trim().is_empty() {
                        continue;
                    }
                    records.push(Record::from_row(names, row.iter()));
                }
            }
        }

        Self {
            headers: headers.unwrap_or_default(),
            records,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACK: &str = "q,analysis_url\na,http://x\nb,http://y\nc,http://z";

    #[test]
    fn test_parse_simple_pack() {
        let set = RecordSet::parse_naive(PACK);

        assert_eq!(set.len(), 3);
        assert_eq!(set.headers(), ["q", "analysis_url"]);

        let first = set.get(0).unwrap();
        assert_eq!(first.get("q"), Some("a"));
        assert_eq!(first.get("analysis_url"), Some("http://x"));
        assert_eq!(set.get(2).unwrap().reference(), Some("http://z"));
    }

    #[test]
    fn test_record_count_matches_data_lines() {
        let text = " fen , analysis_url ,elo\n1, u1 ,800\n\n2,u2,900\n   \n3,u3,1000\n";
        let set = RecordSet::parse_naive(text);

        assert_eq!(set.len(), 3);
        for record in set.iter() {
            assert_eq!(record.len(), 3);
            assert!(record.get("fen").is_some());
            assert!(record.get("analysis_url").is_some());
            assert!(record.get("elo").is_some());
        }
        assert_eq!(set.get(0).unwrap().get("analysis_url"), Some("u1"));
    }

    #[test]
    fn test_crlf_line_endings_are_trimmed() {
        let set = RecordSet::parse_naive("q,analysis_url\r\na,http://x\r\n");

        assert_eq!(set.headers(), ["q", "analysis_url"]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().reference(), Some("http://x"));
    }

    #[test]
    fn test_short_row_lacks_trailing_fields() {
        let set = RecordSet::parse_naive("q,analysis_url\na\nb,http://y,extra");

        let short = set.get(0).unwrap();
        assert_eq!(short.len(), 1);
        assert_eq!(short.reference(), None);

        let long = set.get(1).unwrap();
        assert_eq!(long.len(), 2);
        assert_eq!(long.reference(), Some("http://y"));
    }

    #[test]
    fn test_empty_reference_is_treated_as_missing() {
        let set = RecordSet::parse_naive("q,analysis_url\na,");
        let record = set.get(0).unwrap();

        assert_eq!(record.get("analysis_url"), Some(""));
        assert_eq!(record.reference(), None);
    }

    #[test]
    fn test_duplicate_header_keeps_last_value() {
        let set = RecordSet::parse_naive("x,x\n1,2");
        let record = set.get(0).unwrap();

        assert_eq!(record.len(), 1);
        assert_eq!(record.get("x"), Some("2"));
    }

    #[test]
    fn test_empty_text_yields_no_records() {
        assert!(RecordSet::parse_naive("").is_empty());
        assert!(RecordSet::parse_naive("q,analysis_url\n").is_empty());
        assert!(RecordSet::parse_quoted("").is_empty());
    }

    #[test]
    fn test_naive_splits_inside_quotes() {
        let set = RecordSet::parse_naive("q,analysis_url\n\"a, b\",http://x");
        let record = set.get(0).unwrap();

        assert_eq!(record.get("q"), Some("\"a"));
        assert_eq!(record.get("analysis_url"), Some("b\""));
    }

    #[test]
    fn test_quoted_keeps_embedded_delimiter() {
        let set =
            RecordSet::parse(" q ,analysis_url\n\"a, b\", http://x \n\n  \nc,http://z", ParseMode::Quoted);

        assert_eq!(set.headers(), ["q", "analysis_url"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().get("q"), Some("a, b"));
        assert_eq!(set.get(0).unwrap().reference(), Some("http://x"));
        assert_eq!(set.get(1).unwrap().reference(), Some("http://z"));
    }

    #[test]
    fn test_quoted_matches_naive_on_plain_input() {
        let naive = RecordSet::parse(PACK, ParseMode::Naive);
        let quoted = RecordSet::parse(PACK, ParseMode::Quoted);
        assert_eq!(naive, quoted);
    }

    #[test]
    fn test_parse_sample_pack() {
        let set = RecordSet::parse_naive(include_str!("../../samples/puzzles_Endgame_n3.csv"));

        assert_eq!(set.len(), 3);
        assert!(set.iter().all(|r| r
            .reference()
            .is_some_and(|url| url.starts_with("https://lichess.org/analysis/"))));
        assert_eq!(
            set.get(1).unwrap().get("fen"),
            Some("8/8/8/4k3/8/8/4P3/4K3 w - - 0 1")
        );
    }

    #[test]
    fn test_quoted_unbalanced_quote_is_lenient() {
        let set = RecordSet::parse_quoted("q,analysis_url\n\"a,http://x\nb,http://y");

        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().get("q"), Some("a,http://x\nb,http://y"));
        assert_eq!(set.get(0).unwrap().reference(), None);
    }

    #[test]
    fn test_record_serializes_as_ordered_object() {
        let set = RecordSet::parse_naive(PACK);
        let json = serde_json::to_string(set.get(1).unwrap()).unwrap();
        assert_eq!(json, r#"{"q":"b","analysis_url":"http://y"}"#);
    }
}
