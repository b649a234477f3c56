use crate::error::Result;
use crate::model::{Subject, DATA_NAMESPACE};
use crate::store::{BlobStore, Dataset};
use std::collections::HashMap;

/// Per-session state: the logged-in user and the datasets loaded so far.
///
/// Created at login, discarded at logout. Datasets are loaded lazily on
/// first access and cached for the rest of the session; the cache is the
/// only place in-memory entries live, so there is exactly one writable copy
/// per (user, subject).
pub struct SessionContext {
    username: String,
    datasets: HashMap<Subject, Dataset>,
}

impl SessionContext {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            datasets: HashMap::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the cached dataset for a subject, loading it on first access.
    pub fn dataset_mut<B: BlobStore>(
        &mut self,
        store: &B,
        subject: Subject,
    ) -> Result<&mut Dataset> {
        use std::collections::hash_map::Entry::{Occupied, Vacant};

        match self.datasets.entry(subject) {
            Occupied(slot) => Ok(slot.into_mut()),
            Vacant(slot) => {
                let filename = subject.dataset_filename(&self.username);
                let dataset = Dataset::load(store, DATA_NAMESPACE, &filename)?;
                Ok(slot.insert(dataset))
            }
        }
    }

    /// Drops the cached dataset so the next access reloads from storage.
    pub fn invalidate(&mut self, subject: Subject) {
        self.datasets.remove(&subject);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entry;
    use crate::store::MemBlobStore;

    #[test]
    fn test_dataset_is_cached_per_subject() {
        let store = MemBlobStore::new();
        let mut session = SessionContext::new("melina");

        let dataset = session.dataset_mut(&store, Subject::Chemie).unwrap();
        dataset.append(Entry {
            title: "nur im Speicher".to_string(),
            ..Default::default()
        });

        // Second access returns the same in-memory dataset, not a reload.
        let dataset = session.dataset_mut(&store, Subject::Chemie).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let store = MemBlobStore::new();
        let mut session = SessionContext::new("melina");

        let dataset = session.dataset_mut(&store, Subject::Chemie).unwrap();
        dataset.append(Entry {
            title: "verworfen".to_string(),
            ..Default::default()
        });

        session.invalidate(Subject::Chemie);
        let dataset = session.dataset_mut(&store, Subject::Chemie).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_subjects_are_isolated() {
        let store = MemBlobStore::new();
        let mut session = SessionContext::new("melina");

        session
            .dataset_mut(&store, Subject::Chemie)
            .unwrap()
            .append(Entry {
                title: "Chemie".to_string(),
                ..Default::default()
            });

        let haema = session.dataset_mut(&store, Subject::Haematologie).unwrap();
        assert!(haema.is_empty());
    }
}
