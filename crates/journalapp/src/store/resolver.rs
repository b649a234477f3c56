use super::BlobStore;
use crate::error::Result;
use crate::retry::RetryPolicy;
use std::collections::HashSet;

/// Outcome of resolving one attachment name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Vec<u8>),
    /// Not found even after the retry budget; surfaced per item, never as a
    /// batch failure.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttachment {
    pub name: String,
    pub resolution: Resolution,
}

impl ResolvedAttachment {
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.resolution {
            Resolution::Resolved(bytes) => Some(bytes),
            Resolution::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.resolution, Resolution::Missing)
    }
}

/// Fetches attachment bytes for presentation and download, tolerating the
/// store's replication lag through a bounded retry per name.
pub struct AttachmentResolver {
    policy: RetryPolicy,
}

impl Default for AttachmentResolver {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl AttachmentResolver {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Resolves each name to its bytes or a `Missing` marker.
    ///
    /// Names are de-duplicated preserving first occurrence order. A name
    /// that stays absent after the retry budget is marked missing; hard I/O
    /// errors abort the batch.
    pub fn resolve_all<B: BlobStore>(
        &self,
        store: &B,
        namespace: &str,
        names: &[String],
    ) -> Result<Vec<ResolvedAttachment>> {
        let mut seen = HashSet::new();
        let unique: Vec<&String> = names.iter().filter(|name| seen.insert((*name).clone())).collect();

        let mut results = Vec::with_capacity(unique.len());
        for name in unique {
            match self.policy.run(|| store.read(namespace, name)) {
                Ok(bytes) => results.push(ResolvedAttachment {
                    name: name.clone(),
                    resolution: Resolution::Resolved(bytes),
                }),
                Err(err) if err.is_not_found() => {
                    tracing::warn!(namespace, name = %name, "attachment still missing after retries");
                    results.push(ResolvedAttachment {
                        name: name.clone(),
                        resolution: Resolution::Missing,
                    });
                }
                Err(err) => return Err(err),
            }
        }
        Ok(results)
    }
}
