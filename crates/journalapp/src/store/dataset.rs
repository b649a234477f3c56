use super::BlobStore;
use crate::error::{JournalError, Result};
use crate::model::Entry;

/// The ordered collection of entries for one (user, subject) pair, backed by
/// a delimited-text file in the blob store.
///
/// The dataset is session-scoped: it is loaded once, mutated in memory, and
/// written back as a whole on `save`. There is at most one active writer per
/// (user, subject) because datasets are user-scoped.
pub struct Dataset {
    namespace: String,
    filename: String,
    entries: Vec<Entry>,
}

impl Dataset {
    /// Loads the backing file if present; a missing or empty file yields an
    /// empty dataset without persisting anything.
    ///
    /// The filename is caller-supplied so that migrations between filename
    /// patterns stay a configuration concern.
    pub fn load<B: BlobStore>(store: &B, namespace: &str, filename: &str) -> Result<Self> {
        Self::load_with_default(store, namespace, filename, Vec::new())
    }

    /// Like [`Dataset::load`], but initializes to `default` when the backing
    /// file does not exist. The default is not persisted; that happens on the
    /// next explicit [`Dataset::save`].
    pub fn load_with_default<B: BlobStore>(
        store: &B,
        namespace: &str,
        filename: &str,
        default: Vec<Entry>,
    ) -> Result<Self> {
        let entries = match store.read(namespace, filename) {
            Ok(bytes) => parse_csv(&bytes)?,
            Err(err) if err.is_not_found() => default,
            Err(err) => return Err(err),
        };
        Ok(Self {
            namespace: namespace.to_string(),
            filename: filename.to_string(),
            entries,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds one entry in memory; nothing is persisted until [`Dataset::save`].
    pub fn append(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Serializes the full dataset back to the backing file, overwriting it.
    ///
    /// A failed write leaves the in-memory entries untouched, so the caller
    /// can retry without losing data.
    pub fn save<B: BlobStore>(&self, store: &B) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for entry in &self.entries {
            writer.serialize(entry)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| JournalError::Store(err.to_string()))?;

        store.ensure_namespace(&self.namespace)?;
        store.write(&self.namespace, &self.filename, &bytes)
    }

    /// Drops entries whose primary document or any attachment no longer
    /// exists in the blob store. If anything was dropped, the reduced
    /// dataset is persisted. Returns the number of dropped entries.
    pub fn reconcile<B: BlobStore>(
        &mut self,
        store: &B,
        documents_ns: &str,
        attachments_ns: &str,
    ) -> Result<usize> {
        // Check first, mutate after: a failing existence check must leave
        // the in-memory entries untouched.
        let mut intact = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            intact.push(entry_is_intact(store, entry, documents_ns, attachments_ns)?);
        }

        let dropped = intact.iter().filter(|ok| !**ok).count();
        if dropped == 0 {
            return Ok(0);
        }

        let mut flags = intact.into_iter();
        self.entries.retain(|entry| {
            let keep = flags.next().unwrap_or(true);
            if !keep {
                tracing::info!(title = %entry.title, "dropping entry referencing missing files");
            }
            keep
        });

        self.save(store)?;
        Ok(dropped)
    }
}

fn entry_is_intact<B: BlobStore>(
    store: &B,
    entry: &Entry,
    documents_ns: &str,
    attachments_ns: &str,
) -> Result<bool> {
    if !entry.document.is_empty() && !store.exists(documents_ns, &entry.document)? {
        return Ok(false);
    }
    for name in &entry.attachments {
        if !store.exists(attachments_ns, name)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<Entry>> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut entries = Vec::new();
    for row in reader.deserialize() {
        entries.push(row?);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBlobStore;

    const DATA_NS: &str = "data";
    const DOCS_NS: &str = "word_chemie/melina";
    const ATTACH_NS: &str = "anhang_chemie/melina";

    fn entry(title: &str) -> Entry {
        Entry {
            title: title.to_string(),
            date: "2025-01-01".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_missing_file_yields_empty_dataset() {
        let store = MemBlobStore::new();
        let dataset = Dataset::load(&store, DATA_NS, "nonexistent.csv").unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_load_with_default_is_not_persisted() {
        let store = MemBlobStore::new();
        let dataset =
            Dataset::load_with_default(&store, DATA_NS, "neu.csv", vec![entry("Vorlage")])
                .unwrap();
        assert_eq!(dataset.len(), 1);

        // Only an explicit save writes the backing file.
        assert!(!store.exists(DATA_NS, "neu.csv").unwrap());
        dataset.save(&store).unwrap();
        assert!(store.exists(DATA_NS, "neu.csv").unwrap());
    }

    #[test]
    fn test_append_save_reload_roundtrip() {
        let store = MemBlobStore::new();
        let mut dataset = Dataset::load(&store, DATA_NS, "data_chemie_melina.csv").unwrap();

        let mut original = entry("Titration");
        original.description = "NaOH gegen HCl".to_string();
        original.semester = "3".to_string();
        original.attachments = vec!["a.pdf".to_string(), "b.pdf".to_string()];
        original.document = "20250101_abc_Titration.txt".to_string();
        dataset.append(original.clone());
        dataset.save(&store).unwrap();

        let reloaded = Dataset::load(&store, DATA_NS, "data_chemie_melina.csv").unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.entries()[0], original);
    }

    #[test]
    fn test_single_row_survives_save_and_reload() {
        let store = MemBlobStore::new();
        let mut dataset = Dataset::load(&store, DATA_NS, "data_chemie_melina.csv").unwrap();
        dataset.append(Entry {
            title: "Test".to_string(),
            date: "2025-01-01".to_string(),
            attachments: vec![],
            ..Default::default()
        });
        dataset.save(&store).unwrap();

        let reloaded = Dataset::load(&store, DATA_NS, "data_chemie_melina.csv").unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.entries()[0].title, "Test");
    }

    #[test]
    fn test_empty_attachment_list_roundtrips() {
        let store = MemBlobStore::new();
        let mut dataset = Dataset::load(&store, DATA_NS, "d.csv").unwrap();
        dataset.append(entry("Ohne Anhang"));
        dataset.save(&store).unwrap();

        let reloaded = Dataset::load(&store, DATA_NS, "d.csv").unwrap();
        assert!(reloaded.entries()[0].attachments.is_empty());
    }

    #[test]
    fn test_loads_file_without_semester_column() {
        let store = MemBlobStore::new();
        let legacy = "titel,datum,anhaenge\nBlutbild,2024-11-02,\"['alt.pdf']\"\n";
        store.write(DATA_NS, "legacy.csv", legacy.as_bytes()).unwrap();

        let dataset = Dataset::load(&store, DATA_NS, "legacy.csv").unwrap();
        assert_eq!(dataset.len(), 1);
        let entry = &dataset.entries()[0];
        assert_eq!(entry.title, "Blutbild");
        assert_eq!(entry.semester, "");
        assert_eq!(entry.attachments, vec!["alt.pdf"]);
    }

    #[test]
    fn test_loads_unparseable_attachment_cell_as_empty() {
        let store = MemBlobStore::new();
        let broken = "titel,datum,anhaenge\nKaputt,2024-11-02,not-a-list\n";
        store.write(DATA_NS, "broken.csv", broken.as_bytes()).unwrap();

        let dataset = Dataset::load(&store, DATA_NS, "broken.csv").unwrap();
        assert!(dataset.entries()[0].attachments.is_empty());
    }

    #[test]
    fn test_reconcile_drops_entry_with_missing_document() {
        let store = MemBlobStore::new();
        store.write(DOCS_NS, "doc1.txt", b"1").unwrap();
        store.write(DOCS_NS, "doc3.txt", b"3").unwrap();

        let mut dataset = Dataset::load(&store, DATA_NS, "d.csv").unwrap();
        for (title, doc) in [("eins", "doc1.txt"), ("zwei", "doc2.txt"), ("drei", "doc3.txt")] {
            let mut e = entry(title);
            e.document = doc.to_string();
            dataset.append(e);
        }
        dataset.save(&store).unwrap();

        let dropped = dataset.reconcile(&store, DOCS_NS, ATTACH_NS).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.entries()[0].title, "eins");
        assert_eq!(dataset.entries()[1].title, "drei");

        // The reduced dataset was persisted.
        let reloaded = Dataset::load(&store, DATA_NS, "d.csv").unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_reconcile_drops_entry_with_missing_attachment() {
        let store = MemBlobStore::new();
        store.write(ATTACH_NS, "vorhanden.pdf", b"x").unwrap();

        let mut dataset = Dataset::load(&store, DATA_NS, "d.csv").unwrap();
        let mut ok = entry("ok");
        ok.attachments = vec!["vorhanden.pdf".to_string()];
        let mut bad = entry("bad");
        bad.attachments = vec!["vorhanden.pdf".to_string(), "weg.pdf".to_string()];
        dataset.append(ok);
        dataset.append(bad);
        dataset.save(&store).unwrap();

        let dropped = dataset.reconcile(&store, DOCS_NS, ATTACH_NS).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.entries()[0].title, "ok");
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let store = MemBlobStore::new();
        let mut dataset = Dataset::load(&store, DATA_NS, "d.csv").unwrap();
        let mut gone = entry("weg");
        gone.document = "missing.txt".to_string();
        dataset.append(entry("bleibt"));
        dataset.append(gone);
        dataset.save(&store).unwrap();

        let first = dataset.reconcile(&store, DOCS_NS, ATTACH_NS).unwrap();
        let second = dataset.reconcile(&store, DOCS_NS, ATTACH_NS).unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 0);
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_reconcile_without_drops_does_not_rewrite() {
        let store = MemBlobStore::new();
        let mut dataset = Dataset::load(&store, DATA_NS, "d.csv").unwrap();
        dataset.append(entry("nur text"));
        dataset.save(&store).unwrap();

        // A rewrite would fail loudly now.
        store.set_simulate_write_error(true);
        let dropped = dataset.reconcile(&store, DOCS_NS, ATTACH_NS).unwrap();
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_failed_save_keeps_in_memory_entries() {
        let store = MemBlobStore::new();
        let mut dataset = Dataset::load(&store, DATA_NS, "d.csv").unwrap();
        dataset.append(entry("wichtig"));

        store.set_simulate_write_error(true);
        assert!(dataset.save(&store).is_err());
        assert_eq!(dataset.len(), 1);

        // Retry after the backend recovers.
        store.set_simulate_write_error(false);
        dataset.save(&store).unwrap();
        let reloaded = Dataset::load(&store, DATA_NS, "d.csv").unwrap();
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_save_empty_dataset_roundtrips() {
        let store = MemBlobStore::new();
        let dataset = Dataset::load(&store, DATA_NS, "leer.csv").unwrap();
        dataset.save(&store).unwrap();

        let reloaded = Dataset::load(&store, DATA_NS, "leer.csv").unwrap();
        assert!(reloaded.is_empty());
    }
}
