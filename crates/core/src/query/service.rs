//! Thread-safe query service over the document cache.

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use tracing::{debug, info};

use super::QueryError;
use super::index_set::IndexSet;
use crate::cache::CacheReader;
use crate::cancel::CancelToken;
use crate::document::{AttrValue, Document};

/// A consistent view of one index generation.
///
/// Lookups through a snapshot never see a refresh that happens after it was
/// taken.
#[derive(Debug, Clone)]
pub struct QuerySnapshot(Arc<IndexSet>);

impl Deref for QuerySnapshot {
    type Target = IndexSet;

    fn deref(&self) -> &IndexSet {
        &self.0
    }
}

/// Answers lookups by id, path, basename, file class and frontmatter value.
///
/// Any number of threads may query while one thread refreshes. A refresh
/// builds a complete new [`IndexSet`] off to the side and then replaces the
/// current one in a single assignment, so readers see either the old set or
/// the new one. Overlapping refreshes install in the order they started
/// reading the cache; a slower, older listing is discarded.
pub struct QueryService {
    reader: Arc<dyn CacheReader>,
    current: RwLock<Installed>,
    tickets: AtomicU64,
}

/// The live index set and the refresh ticket that produced it.
struct Installed {
    set: Arc<IndexSet>,
    ticket: u64,
}

impl QueryService {
    /// Create a service with empty indices. Call
    /// [`refresh_from_cache`](Self::refresh_from_cache) to load documents.
    pub fn new(reader: Arc<dyn CacheReader>) -> Self {
        Self {
            reader,
            current: RwLock::new(Installed { set: Arc::new(IndexSet::default()), ticket: 0 }),
            tickets: AtomicU64::new(0),
        }
    }

    /// Create a service and load the cache once.
    pub fn load(reader: Arc<dyn CacheReader>, cancel: &CancelToken) -> Result<Self, QueryError> {
        let service = Self::new(reader);
        service.refresh_from_cache(cancel)?;
        Ok(service)
    }

    /// Rebuild every index from the cache and swap it in.
    ///
    /// Returns the number of documents now being served. On error the current
    /// indices stay in place.
    pub fn refresh_from_cache(&self, cancel: &CancelToken) -> Result<usize, QueryError> {
        let start = Instant::now();
        cancel.check()?;

        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let documents = self.reader.list()?;
        let next = IndexSet::build(documents, 0);

        // The guarded value is replaced in one assignment, never
        // half-written, so a poisoned lock still holds a valid set.
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if current.ticket > ticket {
            debug!(ticket, installed = current.ticket, "discarding superseded cache listing");
            return Ok(current.set.len());
        }
        let generation = current.set.generation() + 1;
        let next = Arc::new(next.with_generation(generation));
        let count = next.len();
        *current = Installed { set: next, ticket };
        drop(current);

        info!(
            documents = count,
            generation,
            duration_ms = start.elapsed().as_millis() as u64,
            "query indices refreshed"
        );
        Ok(count)
    }

    /// The current index generation, shared with the caller.
    pub fn snapshot(&self) -> QuerySnapshot {
        QuerySnapshot(Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner).set))
    }

    pub fn generation(&self) -> u64 {
        self.snapshot().generation()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn by_id(&self, id: &str) -> Result<Arc<Document>, QueryError> {
        let result = self.snapshot().by_id(id);
        if result.is_err() {
            debug!(id, "document id not found");
        }
        result
    }

    pub fn by_path(&self, path: &str) -> Result<Arc<Document>, QueryError> {
        let result = self.snapshot().by_path(path);
        if result.is_err() {
            debug!(path, "document path not found");
        }
        result
    }

    pub fn by_basename(&self, basename: &str) -> Vec<Arc<Document>> {
        self.snapshot().by_basename(basename)
    }

    pub fn by_file_class(&self, file_class: &str) -> Vec<Arc<Document>> {
        self.snapshot().by_file_class(file_class)
    }

    pub fn by_frontmatter(&self, field: &str, value: &AttrValue) -> Vec<Arc<Document>> {
        self.snapshot().by_frontmatter(field, value)
    }

    pub fn file_classes(&self) -> Vec<String> {
        self.snapshot().file_classes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentId, Frontmatter};
    use crate::cache::CacheError;
    use crate::testing::MemoryCache;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, mpsc};
    use std::thread;

    fn doc(id: &str, file_class: &str) -> Document {
        let mut fields = BTreeMap::new();
        fields.insert("fileClass".to_string(), AttrValue::from(file_class));
        Document::new(DocumentId::from(id), Frontmatter::from_fields(fields))
    }

    fn service_with(docs: &[Document]) -> (Arc<MemoryCache>, QueryService) {
        let cache = Arc::new(MemoryCache::default());
        for d in docs {
            cache.insert(d.clone());
        }
        let service = QueryService::new(cache.clone());
        (cache, service)
    }

    #[test]
    fn test_new_service_is_empty() {
        let (_, service) = service_with(&[doc("a.md", "x")]);
        assert!(service.is_empty());
        assert_eq!(service.generation(), 0);
        assert!(service.by_id("a.md").unwrap_err().is_not_found());
    }

    #[test]
    fn test_refresh_loads_documents() {
        let (_, service) = service_with(&[doc("a.md", "x"), doc("b/a.md", "y")]);

        assert_eq!(service.refresh_from_cache(&CancelToken::new()).unwrap(), 2);

        assert_eq!(service.generation(), 1);
        assert_eq!(service.by_basename("a").len(), 2);
        assert_eq!(service.by_file_class("y")[0].id.as_str(), "b/a.md");
        assert_eq!(service.file_classes(), vec!["x", "y"]);
    }

    #[test]
    fn test_not_found_vs_empty_collection() {
        let (_, service) = service_with(&[doc("a.md", "x")]);
        service.refresh_from_cache(&CancelToken::new()).unwrap();

        assert!(matches!(
            service.by_id("missing.md"),
            Err(QueryError::NotFound { kind: "id", .. })
        ));
        assert!(service.by_file_class("missing").is_empty());
    }

    #[test]
    fn test_refresh_picks_up_cache_changes() {
        let (cache, service) = service_with(&[doc("a.md", "x")]);
        service.refresh_from_cache(&CancelToken::new()).unwrap();

        cache.insert(doc("b.md", "x"));
        assert_eq!(service.by_file_class("x").len(), 1);

        service.refresh_from_cache(&CancelToken::new()).unwrap();
        assert_eq!(service.by_file_class("x").len(), 2);
        assert_eq!(service.generation(), 2);
    }

    #[test]
    fn test_failed_refresh_keeps_previous_indices() {
        let cache = Arc::new(MemoryCache { fail_list: true, ..Default::default() });
        let service = QueryService::new(cache.clone());

        let err = service.refresh_from_cache(&CancelToken::new()).unwrap_err();

        assert!(matches!(err, QueryError::Cache(_)));
        assert_eq!(service.generation(), 0);
    }

    #[test]
    fn test_failed_refresh_after_success_keeps_documents() {
        let (_, service) = service_with(&[doc("a.md", "x")]);
        service.refresh_from_cache(&CancelToken::new()).unwrap();

        let broken = QueryService {
            reader: Arc::new(MemoryCache { fail_list: true, ..Default::default() }),
            current: RwLock::new(Installed { set: Arc::clone(&service.snapshot().0), ticket: 1 }),
            tickets: AtomicU64::new(1),
        };
        assert!(broken.refresh_from_cache(&CancelToken::new()).is_err());
        assert_eq!(broken.by_id("a.md").unwrap().file_class(), "x");
        assert_eq!(broken.generation(), 1);
    }

    #[test]
    fn test_cancelled_refresh_does_not_read() {
        let (_, service) = service_with(&[doc("a.md", "x")]);
        let cancel = CancelToken::new();
        cancel.cancel();

        assert!(matches!(service.refresh_from_cache(&cancel), Err(QueryError::Cancelled(_))));
        assert!(service.is_empty());
    }

    #[test]
    fn test_snapshot_is_stable_across_refresh() {
        let (cache, service) = service_with(&[doc("a.md", "x")]);
        service.refresh_from_cache(&CancelToken::new()).unwrap();
        let snapshot = service.snapshot();

        cache.insert(doc("b.md", "x"));
        service.refresh_from_cache(&CancelToken::new()).unwrap();

        assert_eq!(snapshot.by_file_class("x").len(), 1);
        assert_eq!(service.by_file_class("x").len(), 2);
    }

    /// Reader whose first listing blocks until released and returns stale
    /// data; later listings return fresh data at once.
    struct GatedReader {
        calls: AtomicU64,
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl CacheReader for GatedReader {
        fn read(&self, id: &DocumentId) -> Result<Document, CacheError> {
            Err(CacheError::NotFound { id: id.clone() })
        }

        fn list(&self) -> Result<Vec<Document>, CacheError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.entered.lock().unwrap().send(()).unwrap();
                self.release.lock().unwrap().recv().unwrap();
                return Ok(vec![doc("old.md", "x")]);
            }
            Ok(vec![doc("new.md", "x")])
        }
    }

    #[test]
    fn test_overlapping_refreshes_keep_newest_listing() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let reader = GatedReader {
            calls: AtomicU64::new(0),
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        };
        let service = Arc::new(QueryService::new(Arc::new(reader)));

        let slow = {
            let service = Arc::clone(&service);
            thread::spawn(move || service.refresh_from_cache(&CancelToken::new()))
        };
        entered_rx.recv().unwrap();

        assert_eq!(service.refresh_from_cache(&CancelToken::new()).unwrap(), 1);
        release_tx.send(()).unwrap();
        assert_eq!(slow.join().unwrap().unwrap(), 1);

        assert_eq!(service.generation(), 1);
        assert!(service.by_id("new.md").is_ok());
        assert!(service.by_id("old.md").unwrap_err().is_not_found());

        service.refresh_from_cache(&CancelToken::new()).unwrap();
        assert_eq!(service.generation(), 2);
    }
}
