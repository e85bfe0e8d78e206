//! The IPA sign table and its Unicode lookups.

use crate::reader::{read_rows, read_rows_from_path, Row};
use crate::signs::{normalize_name, IpaSign, SignKind};
use crate::{raw_data, IpaError, IpaResult};
use itertools::Itertools;
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

/// Fields per line: type, description, unicode.
pub const IPA_FIELDS: usize = 3;
pub const CODEPOINT_SEPARATOR: char = ' ';
pub const COMPOUND_OPERATOR: char = '+';
pub const NOT_AVAILABLE: &str = "N/A";

static IPA_TABLE: LazyLock<IpaTable> = LazyLock::new(|| {
    match IpaTable::parse(raw_data::IPA_DATA_NAME, raw_data::IPA_DATA) {
        Ok(table) => table,
        Err(e) => panic!("the built-in IPA table cannot be loaded: {}", e),
    }
});

/// The table built from the data bundled with the crate, loaded on first use.
pub fn ipa_table() -> &'static IpaTable {
    &IPA_TABLE
}

/// All signs of a data resource, plus lookups in both directions.
///
/// Every Unicode key maps to exactly one sign. A sign may have several keys;
/// the first one listed in the resource is its primary representation and
/// the only one reachable from its canonical representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpaTable {
    signs: Vec<IpaSign>,
    unicode_to_ipa: HashMap<String, usize>,
    ipa_to_unicode: HashMap<String, String>,
    max_key_length: usize,
}

impl IpaTable {
    /// Loads a table from the text of a resource. `source` names it in errors.
    pub fn parse(source: &str, text: &str) -> IpaResult<Self> {
        let rows = read_rows(source, text.as_bytes(), Some(IPA_FIELDS))?;
        Self::from_rows(source, rows)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> IpaResult<Self> {
        let source = path.as_ref().display().to_string();
        let rows = read_rows_from_path(path, Some(IPA_FIELDS))?;
        Self::from_rows(&source, rows)
    }

    pub fn from_rows(source: &str, rows: Vec<Row>) -> IpaResult<Self> {
        let mut table = Self::default();
        for row in rows {
            table.push_row(source, row)?;
        }
        for (kind, count) in table.signs.iter().counts_by(|s| s.kind()).into_iter().sorted() {
            debug!("'{}': {} {} signs", source, count, kind);
        }
        info!(
            "loaded {} IPA signs from '{}' ({} codepoint keys, longest {})",
            table.signs.len(),
            source,
            table.unicode_to_ipa.len(),
            table.max_key_length
        );
        Ok(table)
    }

    fn push_row(&mut self, source: &str, row: Row) -> IpaResult<()> {
        let (tag, description, unicode) = match row.fields.as_slice() {
            [tag, description, unicode] => (tag, description, unicode),
            _ => {
                return Err(IpaError::MalformedRow {
                    path: source.to_string(),
                    line: row.line,
                    expected: IPA_FIELDS,
                    found: row.len(),
                    content: row.content.clone(),
                })
            }
        };
        let kind = SignKind::from_str(tag).map_err(|_| IpaError::UnknownType {
            path: source.to_string(),
            line: row.line,
            kind: tag.to_string(),
            content: row.content.clone(),
        })?;
        let name = normalize_name(description, tag);
        let mut sign = IpaSign::new(kind, &name, &name).map_err(|e| IpaError::InvalidSign {
            path: source.to_string(),
            line: row.line,
            content: row.content.clone(),
            source: Box::new(e),
        })?;

        let index = self.signs.len();
        let mut primary_set = false;
        for codepoint in unicode.split(CODEPOINT_SEPARATOR) {
            let Some(key) = decode(source, &row, codepoint)? else {
                continue;
            };
            if self.unicode_to_ipa.contains_key(&key) {
                return Err(IpaError::DuplicateCodepoint {
                    path: source.to_string(),
                    line: row.line,
                    codepoint: codepoint.to_string(),
                    content: row.content.clone(),
                });
            }
            self.max_key_length = self.max_key_length.max(key.chars().count());
            if !primary_set {
                primary_set = true;
                self.ipa_to_unicode
                    .insert(sign.canonical_representation().to_string(), key.clone());
                sign.unicode_repr = Some(key.clone());
            }
            self.unicode_to_ipa.insert(key, index);
        }
        self.signs.push(sign);
        Ok(())
    }

    /// Every sign, in resource order.
    pub fn signs(&self) -> &[IpaSign] {
        &self.signs
    }

    pub fn signs_of_kind(&self, kind: SignKind) -> impl Iterator<Item = &IpaSign> + '_ {
        self.signs.iter().filter(move |s| s.kind() == kind)
    }

    /// The sign spelled exactly as `key`.
    pub fn get(&self, key: &str) -> Option<&IpaSign> {
        self.unicode_to_ipa.get(key).map(|&i| &self.signs[i])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.unicode_to_ipa.contains_key(key)
    }

    pub fn unicode_to_ipa(&self) -> impl Iterator<Item = (&str, &IpaSign)> + '_ {
        self.unicode_to_ipa
            .iter()
            .map(|(key, &i)| (key.as_str(), &self.signs[i]))
    }

    pub fn key_count(&self) -> usize {
        self.unicode_to_ipa.len()
    }

    /// Canonical representation to primary Unicode spelling.
    pub fn ipa_to_unicode(&self) -> &HashMap<String, String> {
        &self.ipa_to_unicode
    }

    pub fn unicode_for(&self, canonical: &str) -> Option<&str> {
        self.ipa_to_unicode.get(canonical).map(String::as_str)
    }

    /// The sign with the given canonical representation, if it has a spelling.
    pub fn sign_for(&self, canonical: &str) -> Option<&IpaSign> {
        self.unicode_for(canonical).and_then(|key| self.get(key))
    }

    /// Length in chars of the longest key, the widest window a greedy
    /// matcher ever has to try.
    pub fn max_key_length(&self) -> usize {
        self.max_key_length
    }
}

/// Turns one alternative of the unicode column into its key.
///
/// Empty and `N/A` alternatives have no key.
fn decode(source: &str, row: &Row, codepoint: &str) -> IpaResult<Option<String>> {
    if codepoint.is_empty() || codepoint.contains(NOT_AVAILABLE) {
        return Ok(None);
    }
    codepoint
        .split(COMPOUND_OPERATOR)
        .map(|hex| {
            u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| IpaError::InvalidCodepoint {
                    path: source.to_string(),
                    line: row.line,
                    codepoint: codepoint.to_string(),
                    content: row.content.clone(),
                })
        })
        .collect::<IpaResult<String>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load(text: &str) -> IpaResult<IpaTable> {
        IpaTable::parse("test.dat", text)
    }

    #[test]
    fn one_sign_per_data_line() {
        let text = "\
# header
consonant,Voiceless Bilabial Plosive,0070

vowel,Close Front Unrounded,0069
diacritic,Aspirated,02B0
";
        let table = load(text).unwrap();
        assert_eq!(table.signs().len(), 3);
        assert_eq!(table.key_count(), 3);
        assert_eq!(table.ipa_to_unicode().len(), 3);
        assert_eq!(table.max_key_length(), 1);
        assert_eq!(table.get("p").unwrap().name(), "Voiceless Bilabial Plosive consonant");
        assert_eq!(table.unicode_for("close front unrounded vowel"), Some("i"));
    }

    #[test]
    fn duplicate_codepoint_fails_the_load() {
        let text = "\
consonant,Voiceless Palatal Plosive,0063
consonant,Voiceless Velar Plosive,0063
";
        let err = load(text).unwrap_err();
        match &err {
            IpaError::DuplicateCodepoint {
                path,
                line,
                codepoint,
                content,
            } => {
                assert_eq!(path, "test.dat");
                assert_eq!(*line, 2);
                assert_eq!(codepoint, "0063");
                assert_eq!(content, "consonant,Voiceless Velar Plosive,0063");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn duplicate_within_one_row_fails_too() {
        let err = load("consonant,Voiceless Palatal Plosive,0063 0063\n").unwrap_err();
        assert!(matches!(err, IpaError::DuplicateCodepoint { .. }));
    }

    #[test]
    fn not_available_sign_has_no_key() {
        let text = "\
consonant,Voiced Glottal Plosive,N/A
consonant,Voiceless Glottal Plosive,0294
";
        let table = load(text).unwrap();
        assert_eq!(table.signs().len(), 2);
        let missing = &table.signs()[0];
        assert_eq!(missing.unicode_repr(), None);
        assert!(table.unicode_to_ipa().all(|(_, s)| s != missing));
        assert_eq!(
            table.unicode_for(missing.canonical_representation()),
            None
        );
        assert_eq!(table.key_count(), 1);
    }

    #[test]
    fn compound_key_is_the_concatenation() {
        let table = load("consonant,Voiceless Bilabial Plosive,0070+0361\n").unwrap();
        let keys = table.unicode_to_ipa().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(keys, vec!["\u{0070}\u{0361}"]);
        assert_eq!(keys[0].chars().count(), 2);
        assert_eq!(table.max_key_length(), 2);
        assert_eq!(table.signs()[0].unicode_repr(), Some("p\u{0361}"));
    }

    #[test]
    fn unknown_type_names_the_tag() {
        let err = load("xyz,Some Thing,0041\n").unwrap_err();
        match &err {
            IpaError::UnknownType { kind, content, .. } => {
                assert_eq!(kind, "xyz");
                assert_eq!(content, "xyz,Some Thing,0041");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("'xyz'"));
    }

    #[test]
    fn arity_mismatch_is_a_malformed_row() {
        let text = "\
consonant,Voiceless Bilabial Plosive,0070
consonant,Bilabial Plosive
";
        let err = load(text).unwrap_err();
        assert!(matches!(
            err,
            IpaError::MalformedRow { line: 2, expected: 3, found: 2, .. }
        ));
    }

    #[test]
    fn unparseable_properties_are_propagated() {
        let err = load("vowel,Front Rounded,0079\n").unwrap_err();
        match &err {
            IpaError::InvalidSign { line, source, .. } => {
                assert_eq!(*line, 1);
                assert!(matches!(
                    **source,
                    IpaError::InvalidProperties { kind: SignKind::Vowel, .. }
                ));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("vowel,Front Rounded,0079"));
    }

    #[test]
    fn invalid_hex_is_rejected() {
        for spec in ["00ZZ", "0070++0062", "D800", "110000"] {
            let err = load(&format!("consonant,Voiceless Bilabial Plosive,{spec}\n")).unwrap_err();
            assert!(
                matches!(err, IpaError::InvalidCodepoint { ref codepoint, .. } if codepoint == spec),
                "{spec}"
            );
        }
    }

    #[test]
    fn primary_is_the_first_decodable_alternative() {
        let table = load("vowel,Close Front Unrounded,N/A 0069 0131\n").unwrap();
        let sign = &table.signs()[0];
        assert_eq!(sign.unicode_repr(), Some("i"));
        assert_eq!(table.unicode_for("close front unrounded vowel"), Some("i"));
        assert_eq!(table.key_count(), 2);
        assert!(std::ptr::eq(table.get("\u{0131}").unwrap(), sign));
    }

    #[test]
    fn max_key_length_covers_secondary_keys() {
        let table = load("suprasegmental,Major Group,2016 007C+007C+007C\n").unwrap();
        assert_eq!(table.signs()[0].unicode_repr(), Some("\u{2016}"));
        assert_eq!(table.max_key_length(), 3);
    }

    #[test]
    fn carriage_return_separated_rows_all_load() {
        let text = "consonant,Voiceless Bilabial Plosive,0070\rvowel,Close Front Unrounded,0069\rtone,High Level,0301\r";
        let table = load(text).unwrap();
        assert_eq!(table.signs().len(), 3);
        assert!(table.get("p").unwrap().is_consonant());
        assert!(table.get("i").unwrap().is_vowel());
        assert!(table.get("\u{0301}").unwrap().is_tone());
    }

    #[test]
    fn empty_alternatives_are_ignored() {
        let table = load("tone,High Level,0301  02E6\n").unwrap();
        assert_eq!(table.key_count(), 2);
    }

    #[test]
    fn builtin_table_counts() {
        let table = ipa_table();
        let lines = read_rows(raw_data::IPA_DATA_NAME, raw_data::IPA_DATA.as_bytes(), None)
            .unwrap()
            .len();
        assert_eq!(table.signs().len(), lines);
        assert_eq!(table.signs().len(), 181);
        assert_eq!(table.key_count(), 200);
        assert_eq!(table.ipa_to_unicode().len(), 177);
        assert_eq!(table.signs_of_kind(SignKind::Vowel).count(), 30);
        assert_eq!(table.signs_of_kind(SignKind::Tone).count(), 10);
    }

    #[test]
    fn builtin_table_primary_keys_round_trip() {
        let table = ipa_table();
        for sign in table.signs() {
            if let Some(key) = sign.unicode_repr() {
                assert_eq!(table.unicode_for(sign.canonical_representation()), Some(key));
                assert!(std::ptr::eq(table.get(key).unwrap(), sign));
                assert_eq!(
                    table.sign_for(sign.canonical_representation()).unwrap().canonical_representation(),
                    sign.canonical_representation()
                );
            }
        }
    }

    #[test]
    fn builtin_table_max_key_length_is_reached() {
        let table = ipa_table();
        let max = table.max_key_length();
        assert_eq!(max, 4);
        assert!(table.unicode_to_ipa().all(|(k, _)| k.chars().count() <= max));
        assert!(table.unicode_to_ipa().any(|(k, _)| k.chars().count() == max));
    }

    #[test]
    fn builtin_table_alternatives() {
        let table = ipa_table();
        let g = table.get("g").unwrap();
        assert_eq!(g.unicode_repr(), Some("\u{0261}"));
        assert_eq!(g.canonical_representation(), "voiced velar plosive consonant");
        assert!(std::ptr::eq(g, table.get("\u{0261}").unwrap()));

        let ts = table.get("\u{02A6}").unwrap();
        assert_eq!(ts.unicode_repr(), Some("t\u{0361}s"));

        let major = table.get("||").unwrap();
        assert_eq!(major.unicode_repr(), Some("\u{2016}"));
        assert!(major.is_suprasegmental());

        let missing = table
            .signs()
            .iter()
            .filter(|s| s.unicode_repr().is_none())
            .map(|s| s.name())
            .collect::<Vec<_>>();
        assert_eq!(
            missing,
            vec![
                "Voiced Labio-dental Plosive consonant",
                "Voiced Pharyngeal Plosive consonant",
                "Voiced Glottal Plosive consonant",
                "Voiced Pharyngeal Lateral Approximant consonant",
            ]
        );
    }

    #[test]
    fn loading_twice_gives_equal_tables() {
        let a = IpaTable::parse(raw_data::IPA_DATA_NAME, raw_data::IPA_DATA).unwrap();
        let b = IpaTable::parse(raw_data::IPA_DATA_NAME, raw_data::IPA_DATA).unwrap();
        assert_eq!(a, b);
        assert_eq!(&a, ipa_table());
    }

    #[test]
    fn from_path_names_the_file_in_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "consonant,Bilabial Plosive").unwrap();
        let err = IpaTable::from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn from_path_reads_every_row() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "consonant,Voiceless Bilabial Plosive,0070\r\nvowel,Open Front Unrounded,0061\r\n"
        )
        .unwrap();
        let table = IpaTable::from_path(file.path()).unwrap();
        assert_eq!(table.signs().len(), 2);
        assert!(table.get("a").unwrap().is_vowel());
    }
}
