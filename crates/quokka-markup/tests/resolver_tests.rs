//! Tests for the stock content resolvers.

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use quokka_common::{Error, ErrorKind, Result};
use quokka_markup::include::resolvers::{
    CachingResolver, CompositeResolver, FileSystemResolver, MapResolver, PrefixResolver,
};
use quokka_markup::{ContentResolver, IncludeKind, ResolverContext};

fn root_context() -> ResolverContext {
    ResolverContext::root(IncludeKind::Mjml)
}

/// Resolver that counts calls and echoes the path.
struct Counting {
    calls: AtomicUsize,
}

impl ContentResolver for Counting {
    fn resolve(&self, path: &str, _context: &ResolverContext) -> Result<String> {
        let _ = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("content of {path}"))
    }
}

fn counting() -> Arc<Counting> {
    Arc::new(Counting {
        calls: AtomicUsize::new(0),
    })
}

// ========== FileSystemResolver ==========

#[test]
fn test_filesystem_reads_relative_to_base() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("partials")).unwrap();
    fs::write(dir.path().join("partials/header.mjml"), "<mj-spacer />").unwrap();

    let resolver = FileSystemResolver::new(dir.path()).unwrap();
    let content = resolver.resolve("partials/header.mjml", &root_context()).unwrap();
    assert_eq!(content, "<mj-spacer />");
}

#[test]
fn test_filesystem_rejects_escape() {
    let outer = tempfile::tempdir().unwrap();
    let base = outer.path().join("templates");
    fs::create_dir(&base).unwrap();
    fs::write(outer.path().join("secret.txt"), "nope").unwrap();

    let resolver = FileSystemResolver::new(&base).unwrap();
    let err = resolver.resolve("../secret.txt", &root_context()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Include);
    assert_eq!(err.to_string(), "Include path escapes base directory");
}

#[test]
fn test_filesystem_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let resolver = FileSystemResolver::new(dir.path()).unwrap();
    let err = resolver.resolve("nope.mjml", &root_context()).unwrap_err();
    assert_eq!(err.to_string(), "Include file not found: nope.mjml");
}

#[test]
fn test_filesystem_missing_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    let err = FileSystemResolver::new(dir.path().join("absent")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

// ========== Composite / Prefix ==========

#[test]
fn test_composite_falls_through_include_errors() {
    let first: Arc<dyn ContentResolver> = Arc::new(MapResolver::new().with("a", "A"));
    let second: Arc<dyn ContentResolver> = Arc::new(MapResolver::new().with("b", "B"));
    let composite = CompositeResolver::new(vec![first, second]).unwrap();

    assert_eq!(composite.resolve("a", &root_context()).unwrap(), "A");
    assert_eq!(composite.resolve("b", &root_context()).unwrap(), "B");
    let err = composite.resolve("c", &root_context()).unwrap_err();
    assert_eq!(err.to_string(), "Template not found in map: c");
}

#[test]
fn test_composite_stops_on_other_errors() {
    let failing: Arc<dyn ContentResolver> = Arc::new(|_: &str, _: &ResolverContext| -> Result<String> {
        Err(Error::Validation("broken".to_string()))
    });
    let backup: Arc<dyn ContentResolver> = Arc::new(MapResolver::new().with("a", "A"));
    let composite = CompositeResolver::new(vec![failing, backup]).unwrap();
    let err = composite.resolve("a", &root_context()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_composite_requires_delegates() {
    assert!(CompositeResolver::new(Vec::new()).is_err());
}

#[test]
fn test_prefix_routes_and_strips() {
    let memory: Arc<dyn ContentResolver> = Arc::new(MapResolver::new().with("footer", "F"));
    let router = PrefixResolver::builder().route("mem:", memory).build();

    assert_eq!(router.resolve("mem:footer", &root_context()).unwrap(), "F");
    let err = router.resolve("file:footer", &root_context()).unwrap_err();
    assert_eq!(err.to_string(), "No resolver matched prefix for path: file:footer");

    let fallback = counting();
    let router = PrefixResolver::builder().fallback(fallback.clone()).build();
    assert_eq!(
        router.resolve("x", &root_context()).unwrap(),
        "content of x"
    );
    assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
}

// ========== CachingResolver ==========

#[test]
fn test_cache_hits_skip_delegate() {
    let delegate = counting();
    let cache = CachingResolver::builder(delegate.clone()).build().unwrap();

    for _ in 0..3 {
        assert_eq!(cache.resolve("a", &root_context()).unwrap(), "content of a");
    }
    assert_eq!(delegate.calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_key_includes_context() {
    let delegate = counting();
    let cache = CachingResolver::builder(delegate.clone()).build().unwrap();
    let _ = cache.resolve("a", &root_context()).unwrap();
    let _ = cache.resolve("a", &ResolverContext::nested(IncludeKind::Mjml, "parent", 1)).unwrap();
    let _ = cache
        .resolve("a", &ResolverContext::root(IncludeKind::Css))
        .unwrap();
    assert_eq!(delegate.calls.load(Ordering::SeqCst), 3);

    cache.invalidate("a");
    assert!(cache.is_empty());
}

#[test]
fn test_cache_expiry() {
    let delegate = counting();
    let cache = CachingResolver::builder(delegate.clone())
        .ttl(Duration::from_millis(1))
        .build()
        .unwrap();
    let _ = cache.resolve("a", &root_context()).unwrap();
    std::thread::sleep(Duration::from_millis(10));
    let _ = cache.resolve("a", &root_context()).unwrap();
    assert_eq!(delegate.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_cache_evicts_oldest_quarter() {
    let delegate = counting();
    let cache = CachingResolver::builder(delegate)
        .max_entries(8)
        .build()
        .unwrap();
    for i in 0..8 {
        let _ = cache.resolve(&format!("p{i}"), &root_context()).unwrap();
    }
    assert_eq!(cache.len(), 8);
    let _ = cache.resolve("p8", &root_context()).unwrap();
    // 8 / 4 = 2 evicted, then one inserted.
    assert_eq!(cache.len(), 7);

    cache.invalidate_all();
    assert!(cache.is_empty());
}

#[test]
fn test_cache_builder_validation() {
    let err = CachingResolver::builder(counting())
        .ttl(Duration::ZERO)
        .build()
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(CachingResolver::builder(counting()).max_entries(0).build().is_err());
}
