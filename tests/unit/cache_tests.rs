/*!
 * Tests for translation cache functionality
 */

use typeshift::translation::cache::TranslationCache;

#[test]
fn test_cache_withDisabled_shouldNotStore() {
    let cache = TranslationCache::new(false);
    cache.store("hello", "en", "fr", "bonjour");
    assert!(cache.get("hello", "en", "fr").is_none());
    assert!(!cache.is_enabled());
}

#[test]
fn test_cache_withDifferentLanguages_shouldMiss() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");

    assert!(cache.get("hello", "de", "fr").is_none());
    assert!(cache.get("hello", "en", "es").is_none());
    assert_eq!(cache.get("hello", "en", "fr").as_deref(), Some("bonjour"));
}

#[test]
fn test_cache_stats_shouldTrackHitRate() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");
    cache.get("hello", "en", "fr");
    cache.get("goodbye", "en", "fr");

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_cache_clear_shouldResetEntriesAndCounters() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");
    cache.get("hello", "en", "fr");
    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.stats().hits, 0);
}

#[test]
fn test_cache_store_shouldOverwriteEntry() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "salut");
    cache.store("hello", "en", "fr", "bonjour");
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("hello", "en", "fr").as_deref(), Some("bonjour"));
}
