//! # Domain Model: Subjects, Entries and Blob Naming
//!
//! This module defines the core data structures of the journal: [`Subject`],
//! [`Entry`], and the helpers that keep storage names stable.
//!
//! ## Subjects and Namespaces
//!
//! Every user keeps one dataset per subject. Blobs belonging to a dataset are
//! scoped by per-user namespaces derived from the subject key:
//!
//! ```text
//! data/data_chemie_<user>.csv      # the dataset itself
//! word_chemie/<user>/              # generated documents
//! bilder_chemie/<user>/            # uploaded images
//! anhang_chemie/<user>/            # uploaded attachments + rendered extras
//! ```
//!
//! ## The Entry Row
//!
//! [`Entry`] is one row of the dataset. The wire column names are the German
//! names the files have always used (`titel`, `datum`, `anhaenge`, ...), so
//! existing datasets stay readable. Columns added over time (`semester`)
//! default to empty for rows written before the column existed.
//!
//! ## The `anhaenge` Column
//!
//! The attachment list is one string column holding a JSON array. Older files
//! carry a Python-style literal list (`['a.pdf', 'b.pdf']`) instead; the codec
//! accepts that on read as a migration path. Anything unparseable becomes an
//! empty list — a broken cell must never take the whole dataset down.
//!
//! ## Blob Naming
//!
//! Uploads are stored under `<YYYYMMDDHHMMSS>_<uuid8>_<sanitized-name>`. The
//! sortable timestamp keeps listings chronological, the random suffix makes
//! concurrent uploads collision-free, and sanitization folds whitespace,
//! umlauts and path separators out of user-provided filenames.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace holding the per-user dataset files.
pub const DATA_NAMESPACE: &str = "data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Chemie,
    Haematologie,
    KlinischeChemie,
}

impl Subject {
    pub const ALL: [Subject; 3] = [
        Subject::Chemie,
        Subject::Haematologie,
        Subject::KlinischeChemie,
    ];

    /// Stable key used in folder and file names.
    pub fn key(&self) -> &'static str {
        match self {
            Subject::Chemie => "chemie",
            Subject::Haematologie => "haematologie",
            Subject::KlinischeChemie => "klinische_chemie",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Subject::Chemie => "Chemie",
            Subject::Haematologie => "Hämatologie",
            Subject::KlinischeChemie => "Klinische Chemie",
        }
    }

    /// Parses a user-supplied subject name. Accepts the folder key as well
    /// as the spelling with spaces ("klinische chemie").
    pub fn from_key(key: &str) -> Option<Subject> {
        match key.trim().to_lowercase().replace(' ', "_").as_str() {
            "chemie" => Some(Subject::Chemie),
            "haematologie" => Some(Subject::Haematologie),
            "klinische_chemie" => Some(Subject::KlinischeChemie),
            _ => None,
        }
    }

    /// Backing filename of this subject's dataset for one user.
    ///
    /// Callers may pass any other filename to [`crate::store::Dataset::load`]
    /// (e.g. the legacy global `data_chemie.csv`); this is only the default.
    pub fn dataset_filename(&self, username: &str) -> String {
        format!("data_{}_{}.csv", self.key(), username)
    }

    pub fn documents_namespace(&self, username: &str) -> String {
        format!("word_{}/{}", self.key(), username)
    }

    pub fn images_namespace(&self, username: &str) -> String {
        format!("bilder_{}/{}", self.key(), username)
    }

    pub fn attachments_namespace(&self, username: &str) -> String {
        format!("anhang_{}/{}", self.key(), username)
    }
}

/// One saved journal entry. Field names are English, column names stay the
/// German ones found in existing dataset files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "titel")]
    pub title: String,

    #[serde(rename = "datum")]
    pub date: String,

    #[serde(rename = "beschreibung", default)]
    pub description: String,

    #[serde(rename = "material", default)]
    pub material: String,

    #[serde(rename = "fragen", default)]
    pub questions: String,

    #[serde(rename = "arbeitsschritte", default)]
    pub steps: String,

    #[serde(rename = "ziel", default)]
    pub goal: String,

    /// Blob names in the subject's attachment namespace, in upload order.
    /// Duplicates are possible in old files and are dropped at read time.
    #[serde(rename = "anhaenge", default, with = "attachment_list")]
    pub attachments: Vec<String>,

    #[serde(rename = "semester", default)]
    pub semester: String,

    /// Name of the generated primary document, empty if none was produced.
    #[serde(rename = "dateiname", default)]
    pub document: String,

    #[serde(rename = "zeit", default)]
    pub saved_at: String,
}

impl Entry {
    /// Case-insensitive match over title and date, the two fields the
    /// overview search covers.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term) || self.date.contains(&term)
    }
}

/// Serde codec for the `anhaenge` column: JSON array in one string cell.
pub(crate) mod attachment_list {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(names: &[String], ser: S) -> Result<S::Ok, S::Error> {
        let encoded = serde_json::to_string(names).map_err(serde::ser::Error::custom)?;
        ser.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
        let raw = String::deserialize(de)?;
        Ok(super::parse_attachment_list(&raw))
    }
}

/// Parses an attachment-list cell. JSON first, then the legacy literal-list
/// form; a cell that is neither yields an empty list rather than an error.
pub fn parse_attachment_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if let Ok(names) = serde_json::from_str::<Vec<String>>(trimmed) {
        return names;
    }
    let inner = match trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(inner) => inner,
        None => return Vec::new(),
    };
    inner
        .split(',')
        .map(|part| part.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Folds a user-provided filename into a storage-safe form: spaces become
/// underscores, path separators become dashes, umlauts are transliterated.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            ' ' => out.push('_'),
            '/' | '\\' => out.push('-'),
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'Ä' => out.push_str("Ae"),
            'Ö' => out.push_str("Oe"),
            'Ü' => out.push_str("Ue"),
            'ß' => out.push_str("ss"),
            _ => out.push(ch),
        }
    }
    out
}

/// Generates a collision-resistant blob name for an upload:
/// `<YYYYMMDDHHMMSS>_<uuid8>_<sanitized-original-name>`.
pub fn generated_blob_name(original: &str) -> String {
    let stamp = Utc::now().format("%Y%m%d%H%M%S");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", stamp, &suffix[..8], sanitize_filename(original))
}

/// Timestamp format used for the `zeit` column.
pub fn save_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
