use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde_json::Value;

use crate::error::AcadifyError;

/// Cache tag: a resource kind plus an optional entity id. A read
/// provides tags, a write invalidates tags; after a successful write,
/// every cached read whose provided tags intersect the invalidated
/// set is evicted and refetched on next use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub kind: TagKind,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Course,
    CreatorCourse,
    PublishedCourse,
    Lecture,
    Purchase,
    User,
    Progress,
    Contact,
    Roadmap,
}

impl Tag {
    /// Coarse tag covering every entity of the kind.
    pub fn list(kind: TagKind) -> Self {
        Tag { kind, id: None }
    }

    pub fn entity(kind: TagKind, id: impl Into<String>) -> Self {
        Tag {
            kind,
            id: Some(id.into()),
        }
    }

    /// Intersection rule: same kind, and either side without an id
    /// matches any id of that kind.
    pub fn matches(&self, other: &Tag) -> bool {
        if self.kind != other.kind {
            return false;
        }
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

struct CacheEntry {
    value: Value,
    tags: Vec<Tag>,
}

type SharedFetch = Shared<BoxFuture<'static, Result<Value, Arc<AcadifyError>>>>;

/// Single source of truth for server-derived data. Stores raw JSON
/// per endpoint key; identical in-flight queries share one underlying
/// fetch, so overlapping consumers never issue a duplicate request.
#[derive(Default)]
pub struct TagCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    inflight: Mutex<HashMap<String, SharedFetch>>,
    // bumped on reset so fetches that resolve after a wipe cannot
    // write stale authenticated data back
    generation: AtomicU64,
}

impl TagCache {
    pub fn new() -> Self {
        TagCache::default()
    }

    pub fn lookup(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .get(key)
            .map(|entry| entry.value.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serves from cache when fresh, otherwise joins or starts the
    /// underlying fetch. `tags` become the entry's provided tags.
    pub async fn query<F>(
        &self,
        key: &str,
        tags: Vec<Tag>,
        fetch: F,
    ) -> Result<Value, AcadifyError>
    where
        F: Future<Output = Result<Value, AcadifyError>> + Send + 'static,
    {
        if let Some(value) = self.lookup(key) {
            log::trace!("cache hit: {}", key);
            return Ok(value);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let (shared, started_here) = {
            let mut inflight = self.inflight.lock().expect("cache lock poisoned");
            match inflight.get(key) {
                Some(existing) => {
                    log::trace!("joining in-flight fetch: {}", key);
                    (existing.clone(), false)
                }
                None => {
                    let shared = fetch.map(|r| r.map_err(Arc::new)).boxed().shared();
                    inflight.insert(key.to_string(), shared.clone());
                    (shared, true)
                }
            }
        };

        let result = shared.await;
        if started_here {
            self.inflight
                .lock()
                .expect("cache lock poisoned")
                .remove(key);
        }

        match result {
            Ok(value) => {
                if self.generation.load(Ordering::SeqCst) == generation {
                    self.entries.lock().expect("cache lock poisoned").insert(
                        key.to_string(),
                        CacheEntry {
                            value: value.clone(),
                            tags,
                        },
                    );
                }
                Ok(value)
            }
            // a failed fetch caches nothing
            Err(err) => Err(AcadifyError::new(&err.message)),
        }
    }

    /// Evicts every entry whose provided tags intersect `tags`.
    pub fn invalidate(&self, tags: &[Tag]) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| {
            !entry
                .tags
                .iter()
                .any(|provided| tags.iter().any(|t| t.matches(provided)))
        });
        let evicted = before - entries.len();
        if evicted > 0 {
            log::debug!("invalidated {} cached queries", evicted);
        }
    }

    /// Wipes everything, including in-flight joins. Fetches already
    /// running resolve to their callers but are not written back.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().expect("cache lock poisoned").clear();
        self.inflight.lock().expect("cache lock poisoned").clear();
        log::debug!("cache reset");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    fn fetch_counted(
        counter: Arc<AtomicUsize>,
        value: Value,
    ) -> impl Future<Output = Result<Value, AcadifyError>> + Send + 'static {
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(value)
        }
    }

    #[test]
    fn tag_matching_is_intersection() {
        let all_courses = Tag::list(TagKind::Course);
        let course_1 = Tag::entity(TagKind::Course, "c1");
        let course_2 = Tag::entity(TagKind::Course, "c2");
        let lecture_1 = Tag::entity(TagKind::Lecture, "c1");

        // a coarse invalidation hits every id of the kind
        assert!(all_courses.matches(&course_1));
        assert!(all_courses.matches(&course_2));
        // an id invalidation hits the same id and coarse providers
        assert!(course_1.matches(&course_1));
        assert!(course_1.matches(&all_courses));
        assert!(!course_1.matches(&course_2));
        // kinds never cross
        assert!(!course_1.matches(&lecture_1));
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let cache = TagCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let value = cache
                .query(
                    "course/published",
                    vec![Tag::list(TagKind::PublishedCourse)],
                    fetch_counted(calls.clone(), json!({"courses": []})),
                )
                .await
                .unwrap();
            assert_eq!(value, json!({"courses": []}));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_identical_queries_share_one_fetch() {
        let cache = Arc::new(TagCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .query(
                        "user/profile",
                        vec![Tag::list(TagKind::User)],
                        fetch_counted(calls, json!({"user": {"name": "a"}})),
                    )
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), json!({"user": {"name": "a"}}));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_evicts_by_tag_intersection() {
        let cache = TagCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .query(
                "course/c1",
                vec![Tag::entity(TagKind::Course, "c1")],
                fetch_counted(calls.clone(), json!(1)),
            )
            .await
            .unwrap();
        cache
            .query(
                "course/c2",
                vec![Tag::entity(TagKind::Course, "c2")],
                fetch_counted(calls.clone(), json!(2)),
            )
            .await
            .unwrap();
        cache
            .query(
                "roadmap",
                vec![Tag::list(TagKind::Roadmap)],
                fetch_counted(calls.clone(), json!(3)),
            )
            .await
            .unwrap();

        // an edit of course c1 leaves c2 and the roadmap untouched
        cache.invalidate(&[Tag::entity(TagKind::Course, "c1")]);
        assert!(cache.lookup("course/c1").is_none());
        assert!(cache.lookup("course/c2").is_some());
        assert!(cache.lookup("roadmap").is_some());

        // a purchase invalidates the whole Course kind
        cache.invalidate(&[Tag::list(TagKind::Course)]);
        assert!(cache.lookup("course/c2").is_none());
        assert!(cache.lookup("roadmap").is_some());
    }

    #[tokio::test]
    async fn failed_fetch_caches_nothing() {
        let cache = TagCache::new();
        let result = cache
            .query("course/broken", vec![Tag::list(TagKind::Course)], async {
                Err(AcadifyError::new("boom"))
            })
            .await;
        assert!(result.is_err());
        assert!(cache.lookup("course/broken").is_none());

        // the key is retryable after the failure
        let value = cache
            .query("course/broken", vec![Tag::list(TagKind::Course)], async {
                Ok(json!("recovered"))
            })
            .await
            .unwrap();
        assert_eq!(value, json!("recovered"));
    }

    #[tokio::test]
    async fn reset_wipes_everything() {
        let cache = TagCache::new();
        cache
            .query("roadmap", vec![Tag::list(TagKind::Roadmap)], async {
                Ok(json!([]))
            })
            .await
            .unwrap();
        assert_eq!(cache.len(), 1);

        cache.reset();
        assert!(cache.is_empty());
    }
}
