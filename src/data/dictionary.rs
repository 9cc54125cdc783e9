//! Column Dictionary Module
//! Parses the survey's column dictionary file and maps original variable
//! codes to normalized column names.

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to read dictionary '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Column code already exists: {0}")]
    DuplicateCode(String),
    #[error("Column name already exists: {0}")]
    DuplicateName(String),
    #[error("Dictionary contains no column records")]
    Empty,
}

/// One dictionary record: original code, normalized name, description.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnEntry {
    pub code: String,
    pub name: String,
    pub description: String,
}

/// Ordered column dictionary with lookup by original code and by
/// normalized name.
///
/// The dictionary file stores one record per line *pair*: the second line
/// continues the description, with its first four characters being padding.
/// A record whitespace-splits into code, short name and description; the
/// normalized name is `<first char of code>_<short name>` (the leading
/// character groups variables by survey topic).
pub struct ColumnDictionary {
    entries: Vec<ColumnEntry>,
    by_code: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl ColumnDictionary {
    /// Read and parse a dictionary file.
    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        let text = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse dictionary text. A trailing unpaired line is ignored.
    pub fn parse(text: &str) -> Result<Self, DictionaryError> {
        let lines: Vec<&str> = text.lines().collect();

        let mut entries: Vec<ColumnEntry> = Vec::new();
        let mut by_code: HashMap<String, usize> = HashMap::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();

        for pair in lines.chunks_exact(2) {
            // Continuation line resumes after four characters of padding.
            let continuation = pair[1].get(4..).unwrap_or("").trim();
            let record = format!("{}{}", pair[0], continuation);

            let mut fields = record.split_whitespace();
            let (Some(code), Some(short)) = (fields.next(), fields.next()) else {
                continue;
            };
            let description = fields.collect::<Vec<_>>().join(" ");

            let Some(topic) = code.chars().next() else {
                continue;
            };
            let name = format!("{}_{}", topic, short);

            if by_code.contains_key(code) {
                return Err(DictionaryError::DuplicateCode(code.to_string()));
            }
            if by_name.contains_key(&name) {
                return Err(DictionaryError::DuplicateName(name));
            }

            by_code.insert(code.to_string(), entries.len());
            by_name.insert(name.clone(), entries.len());
            entries.push(ColumnEntry {
                code: code.to_string(),
                name,
                description,
            });
        }

        if entries.is_empty() {
            return Err(DictionaryError::Empty);
        }

        Ok(Self {
            entries,
            by_code,
            by_name,
        })
    }

    /// Normalized name for an original variable code.
    pub fn nice_name(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(|&i| self.entries[i].name.as_str())
    }

    /// Original code for a normalized name.
    pub fn orig_code(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(|&i| self.entries[i].code.as_str())
    }

    /// Description for a normalized name.
    pub fn description(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(|&i| self.entries[i].description.as_str())
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[ColumnEntry] {
        &self.entries
    }

    /// Entries sorted by original code (the screening order).
    pub fn codes_sorted(&self) -> Vec<&ColumnEntry> {
        let mut sorted: Vec<&ColumnEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.code.cmp(&b.code));
        sorted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
D033 KCAL TOTAL CALORIE \n    INTAKE (KCAL/DAY)\n\
M005 ALLCAc MORTALITY ALL CANCERS \n    AGES 0-64 (CUMULATIVE)\n\
P002 SBP MEAN SYSTOLIC \n    BLOOD PRESSURE\n";

    #[test]
    fn parses_two_line_records() {
        let dict = ColumnDictionary::parse(SAMPLE).unwrap();
        assert_eq!(dict.len(), 3);

        assert_eq!(dict.nice_name("D033"), Some("D_KCAL"));
        assert_eq!(dict.nice_name("M005"), Some("M_ALLCAc"));
        assert_eq!(dict.orig_code("P_SBP"), Some("P002"));
        assert_eq!(
            dict.description("D_KCAL"),
            Some("TOTAL CALORIE INTAKE (KCAL/DAY)")
        );
    }

    #[test]
    fn continuation_padding_is_discarded() {
        // First four characters of the continuation line never reach the
        // description.
        let dict = ColumnDictionary::parse("X001 VAR ONE \nXXXXTWO\n").unwrap();
        assert_eq!(dict.description("X_VAR"), Some("ONE TWO"));
    }

    #[test]
    fn trailing_unpaired_line_is_ignored() {
        let text = format!("{}Z999 ORPHAN NO CONTINUATION\n", SAMPLE);
        let dict = ColumnDictionary::parse(&text).unwrap();
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.nice_name("Z999"), None);
    }

    #[test]
    fn short_records_are_skipped() {
        let text = format!("{}\n\n", SAMPLE);
        let dict = ColumnDictionary::parse(&text).unwrap();
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn duplicate_code_is_rejected() {
        let text = "A001 FIRST X\n    \nA001 SECOND Y\n    \n";
        match ColumnDictionary::parse(text) {
            Err(DictionaryError::DuplicateCode(code)) => assert_eq!(code, "A001"),
            other => panic!("expected duplicate code error, got {:?}", other.err()),
        }
    }

    #[test]
    fn duplicate_name_is_rejected() {
        // Distinct codes, same topic letter and short name.
        let text = "A001 VAR X\n    \nA002 VAR Y\n    \n";
        match ColumnDictionary::parse(text) {
            Err(DictionaryError::DuplicateName(name)) => assert_eq!(name, "A_VAR"),
            other => panic!("expected duplicate name error, got {:?}", other.err()),
        }
    }

    #[test]
    fn empty_dictionary_is_rejected() {
        assert!(matches!(
            ColumnDictionary::parse(""),
            Err(DictionaryError::Empty)
        ));
    }

    #[test]
    fn codes_sorted_orders_by_code() {
        let text = "B002 LATER X\n    \nA009 EARLIER Y\n    \n";
        let dict = ColumnDictionary::parse(text).unwrap();
        let codes: Vec<&str> = dict.codes_sorted().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["A009", "B002"]);
    }
}
