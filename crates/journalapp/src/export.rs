use crate::error::Result;
use crate::model::{sanitize_filename, Entry};
use crate::store::NamedBlob;
use chrono::Utc;

/// A generated document ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Output of one render pass.
///
/// The primary document lands in the subject's document namespace and its
/// name is recorded in the entry's `dateiname` column. Extras land in the
/// attachment namespace and are appended to the entry's attachment list.
#[derive(Debug)]
pub struct RenderedDocuments {
    pub primary: DocumentArtifact,
    pub extras: Vec<DocumentArtifact>,
}

/// Document-generation collaborator.
///
/// The core only hands over structured entry fields plus resolved image
/// bytes and stores whatever named blobs come back; concrete Word/PDF
/// layouts live behind this seam.
pub trait DocumentRenderer {
    fn render(&self, entry: &Entry, images: &[NamedBlob]) -> Result<RenderedDocuments>;
}

/// Built-in renderer producing a plain-text summary of the entry.
pub struct TextRenderer;

impl DocumentRenderer for TextRenderer {
    fn render(&self, entry: &Entry, images: &[NamedBlob]) -> Result<RenderedDocuments> {
        let mut body = String::new();
        body.push_str(&format!("Praktikum: {}\n", entry.title));
        body.push_str(&format!("Datum: {}\n", entry.date));
        if !entry.semester.is_empty() {
            body.push_str(&format!("Semester: {}\n", entry.semester));
        }

        for (heading, text) in [
            ("Beschreibung", &entry.description),
            ("Material", &entry.material),
            ("Vorbereitung + Fragen", &entry.questions),
            ("Arbeitsschritte", &entry.steps),
            ("Ziel", &entry.goal),
        ] {
            if text.is_empty() {
                continue;
            }
            body.push_str(&format!("\n{}\n{}\n", heading, text));
        }

        if !images.is_empty() {
            body.push_str("\nBilder:\n");
            for image in images {
                body.push_str(&format!("  - {}\n", image.name));
            }
        }

        let stamp = Utc::now().format("%Y%m%d%H%M%S");
        let safe_title = sanitize_filename(entry.title.trim());
        let primary = DocumentArtifact {
            filename: format!("{}_{}.txt", stamp, safe_title),
            bytes: body.into_bytes(),
        };

        Ok(RenderedDocuments {
            primary,
            extras: Vec::new(),
        })
    }
}
