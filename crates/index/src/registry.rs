//! The type registry.
//!
//! A map from type path to [`RegisteredType`] behind a single
//! `parking_lot::Mutex`. Every read and write takes the same lock, so a
//! search never observes half of a register/unregister pair. Entries are
//! `Arc`s: readers get cheap snapshots that stay valid after the lock is
//! released, and nothing inside the lock ever calls back out.
//!
//! The mutex is not reentrant. Extractors and any other caller-supplied
//! code run before the lock is taken, never while it is held.
//!
//! The registry is an ordinary value. Share it with `Arc<TypeRegistry>`.

use crate::error::IndexError;
use crate::metadata::{Indexable, MetadataExtractor, TypeMetadata};
use crate::registered_type::RegisteredType;
use crate::tag::Tag;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
pub struct TypeRegistry {
    types: Mutex<BTreeMap<String, Arc<RegisteredType>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot, replacing any earlier registration of the same path.
    pub fn register<T: Into<Tag>>(
        &self,
        metadata: TypeMetadata,
        tags: impl IntoIterator<Item = T>,
        instructions: impl Into<String>,
    ) -> Arc<RegisteredType> {
        let entry = Arc::new(RegisteredType::new(metadata, tags, instructions));
        let path = entry.path().to_string();
        let replaced = self.types.lock().insert(path.clone(), entry.clone());
        debug!(path = %path, replaced = replaced.is_some(), "Registered type");
        entry
    }

    /// Extract metadata with `extractor`, then register it.
    pub fn register_with<E, T>(
        &self,
        extractor: &E,
        source: &E::Source,
        tags: impl IntoIterator<Item = T>,
        instructions: impl Into<String>,
    ) -> Result<Arc<RegisteredType>, IndexError>
    where
        E: MetadataExtractor,
        T: Into<Tag>,
    {
        let metadata = extractor.extract(source)?;
        Ok(self.register(metadata, tags, instructions))
    }

    /// Register a type that describes itself.
    pub fn register_type<I: Indexable, T: Into<Tag>>(
        &self,
        tags: impl IntoIterator<Item = T>,
        instructions: impl Into<String>,
    ) -> Arc<RegisteredType> {
        self.register(I::type_metadata(), tags, instructions)
    }

    /// Remove a path. Returns the removed entry, if there was one.
    pub fn unregister(&self, path: &str) -> Option<Arc<RegisteredType>> {
        let removed = self.types.lock().remove(path);
        if removed.is_some() {
            debug!(path, "Unregistered type");
        }
        removed
    }

    pub fn unregister_type<I: Indexable>(&self) -> Option<Arc<RegisteredType>> {
        self.unregister(&I::type_path())
    }

    pub fn get(&self, path: &str) -> Option<Arc<RegisteredType>> {
        self.types.lock().get(path).cloned()
    }

    pub fn get_type<I: Indexable>(&self) -> Option<Arc<RegisteredType>> {
        self.get(&I::type_path())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.types.lock().contains_key(path)
    }

    /// Snapshot of every entry, ordered by path.
    pub fn get_all(&self) -> Vec<Arc<RegisteredType>> {
        self.types.lock().values().cloned().collect()
    }

    /// Filter by tags, then by a case-insensitive substring of `query` in
    /// name, docstring, instructions or module.
    ///
    /// Tags match ANY by default, ALL when `require_all_tags` is set. An
    /// empty tag list or an empty/absent query does not filter.
    pub fn search(
        &self,
        query: Option<&str>,
        tags: &[Tag],
        require_all_tags: bool,
    ) -> Vec<Arc<RegisteredType>> {
        let needle = query.filter(|q| !q.is_empty()).map(str::to_lowercase);
        let types = self.types.lock();
        types
            .values()
            .filter(|t| {
                tags.is_empty()
                    || if require_all_tags {
                        t.has_all_tags(tags)
                    } else {
                        t.has_any_tag(tags)
                    }
            })
            .filter(|t| match &needle {
                Some(needle) => matches_query(t, needle),
                None => true,
            })
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.types.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.types.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.lock().is_empty()
    }

    /// How many types carry each tag, most used first, ties by tag.
    pub fn tag_counts(&self) -> Vec<(Tag, usize)> {
        let mut counts: BTreeMap<Tag, usize> = BTreeMap::new();
        for entry in self.types.lock().values() {
            for tag in entry.tags() {
                *counts.entry(tag.clone()).or_default() += 1;
            }
        }
        let mut counts: Vec<(Tag, usize)> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Number of registered types per module.
    pub fn types_by_module(&self) -> BTreeMap<String, usize> {
        let mut modules = BTreeMap::new();
        for entry in self.types.lock().values() {
            *modules.entry(entry.module().to_string()).or_default() += 1;
        }
        modules
    }
}

fn matches_query(entry: &RegisteredType, needle: &str) -> bool {
    [
        entry.name(),
        entry.docstring(),
        entry.instructions(),
        entry.module(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRegistry(registered={})", self.len())
    }
}
