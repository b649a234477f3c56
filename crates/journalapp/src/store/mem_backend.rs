use super::BlobStore;
use crate::error::{JournalError, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// In-memory blob store for testing.
///
/// Uses `RefCell` for interior mutability since the journal core is
/// single-threaded. Besides plain storage it can simulate the two failure
/// modes the real backend exhibits: write failures and replication lag.
pub struct MemBlobStore {
    namespaces: RefCell<HashSet<String>>,
    blobs: RefCell<HashMap<(String, String), Vec<u8>>>,
    simulate_write_error: RefCell<bool>,
    delayed_reads: RefCell<HashMap<(String, String), u32>>,
}

impl Default for MemBlobStore {
    fn default() -> Self {
        Self {
            namespaces: RefCell::new(HashSet::new()),
            blobs: RefCell::new(HashMap::new()),
            simulate_write_error: RefCell::new(false),
            delayed_reads: RefCell::new(HashMap::new()),
        }
    }
}

impl MemBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Makes the next `count` reads of a blob report NotFound even if the
    /// blob exists, modelling replication lag after a write. Existence
    /// checks are unaffected.
    pub fn delay_reads(&self, namespace: &str, name: &str, count: u32) {
        self.delayed_reads
            .borrow_mut()
            .insert((namespace.to_string(), name.to_string()), count);
    }
}

impl BlobStore for MemBlobStore {
    fn ensure_namespace(&self, namespace: &str) -> Result<()> {
        self.namespaces.borrow_mut().insert(namespace.to_string());
        Ok(())
    }

    fn exists(&self, namespace: &str, name: &str) -> Result<bool> {
        let key = (namespace.to_string(), name.to_string());
        Ok(self.blobs.borrow().contains_key(&key))
    }

    fn list(&self, namespace: &str) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .blobs
            .borrow()
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    fn read(&self, namespace: &str, name: &str) -> Result<Vec<u8>> {
        let key = (namespace.to_string(), name.to_string());

        {
            let mut delayed = self.delayed_reads.borrow_mut();
            if let Some(remaining) = delayed.get_mut(&key) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(JournalError::not_found(namespace, name));
                }
            }
        }

        self.blobs
            .borrow()
            .get(&key)
            .cloned()
            .ok_or_else(|| JournalError::not_found(namespace, name))
    }

    fn write(&self, namespace: &str, name: &str, bytes: &[u8]) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(JournalError::Store("Simulated write error".to_string()));
        }
        self.namespaces.borrow_mut().insert(namespace.to_string());
        self.blobs
            .borrow_mut()
            .insert((namespace.to_string(), name.to_string()), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, namespace: &str, name: &str) -> Result<()> {
        let key = (namespace.to_string(), name.to_string());
        self.blobs.borrow_mut().remove(&key);
        Ok(())
    }
}
