//! Integration tests: age-based cache sweeping.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration as StdDuration;

use chrono::Duration;
use tempfile::TempDir;
use test_utils::time::{demo_init_time, hourly_valid_times};
use test_utils::{ManualClock, MemoryFileSystem};
use vt_cache::{CacheConfig, CacheJanitor, JanitorStats, ValidTimeCache, ValidTimeCacheEntry};

fn setup(max_age_seconds: u64) -> (TempDir, Arc<ManualClock>, Arc<ValidTimeCache>) {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(demo_init_time()));
    let cache = ValidTimeCache::with_parts(
        CacheConfig::new(dir.path().join("vt"), max_age_seconds),
        clock.clone(),
        Arc::new(MemoryFileSystem::new()),
    );
    (dir, clock, Arc::new(cache))
}

fn source(n: usize) -> PathBuf {
    PathBuf::from(format!("/data/mss/file_{}.nc", n))
}

#[test]
fn zero_max_age_deletes_every_entry() {
    let (_dir, _clock, cache) = setup(3600);
    for n in 0..5 {
        cache.save(source(n), demo_init_time(), hourly_valid_times(1)).unwrap();
    }
    assert_eq!(cache.len().unwrap(), 5);

    let stats = CacheJanitor::new(cache.clone()).service_cache(0).unwrap();

    assert_eq!(stats.scanned, 5);
    assert_eq!(stats.deleted, 5);
    assert!(cache.is_empty().unwrap());
}

#[test]
fn large_max_age_leaves_store_unchanged() {
    let (_dir, clock, cache) = setup(3600);
    for n in 0..3 {
        cache.save(source(n), demo_init_time(), vec![]).unwrap();
    }
    clock.advance(Duration::hours(5));
    let before = cache.entry_files().unwrap();

    let stats = CacheJanitor::new(cache.clone()).service_cache(6 * 3600).unwrap();

    assert_eq!(stats.deleted, 0);
    assert_eq!(cache.entry_files().unwrap(), before);
}

#[test]
fn unbounded_max_age_keeps_everything() {
    let (_dir, clock, cache) = setup(3600);
    for n in 0..3 {
        cache.save(source(n), demo_init_time(), vec![]).unwrap();
    }
    clock.advance(Duration::days(3650));

    let stats = CacheJanitor::new(cache.clone()).service_cache(u64::MAX).unwrap();

    assert_eq!(stats.scanned, 3);
    assert_eq!(stats.deleted, 0);
    assert_eq!(cache.len().unwrap(), 3);
}

#[test]
fn only_old_entries_are_deleted() {
    let (_dir, clock, cache) = setup(3600);
    cache.save(source(0), demo_init_time(), vec![]).unwrap();
    clock.advance(Duration::hours(2));
    cache.save(source(1), demo_init_time(), vec![]).unwrap();
    clock.advance(Duration::minutes(30));

    let stats = CacheJanitor::new(cache.clone()).service_cache(3600).unwrap();

    assert_eq!(stats.deleted, 1);
    assert!(cache.lookup(source(0)).is_none());
    assert!(cache.lookup(source(1)).is_some());
}

#[test]
fn second_sweep_deletes_nothing() {
    let (_dir, clock, cache) = setup(3600);
    cache.save(source(0), demo_init_time(), vec![]).unwrap();
    clock.advance(Duration::hours(1));
    cache.save(source(1), demo_init_time(), vec![]).unwrap();
    clock.advance(Duration::minutes(30));
    let janitor = CacheJanitor::new(cache.clone());

    let first = janitor.service_cache(3600).unwrap();
    let after_first = cache.entry_files().unwrap();
    let second = janitor.service_cache(3600).unwrap();

    assert_eq!(first.deleted, 1);
    assert_eq!(second, JanitorStats { scanned: 1, ..JanitorStats::default() });
    assert_eq!(cache.entry_files().unwrap(), after_first);
}

#[test]
fn corrupt_records_are_deleted_and_foreign_files_ignored() {
    let (dir, _clock, cache) = setup(3600);
    cache.save(source(0), demo_init_time(), vec![]).unwrap();
    let corrupt = cache.cache_file_path(source(1));
    fs::write(&corrupt, b"garbage").unwrap();
    let foreign = dir.path().join("vt").join("notes.txt");
    fs::write(&foreign, b"keep me").unwrap();

    let stats = CacheJanitor::new(cache.clone()).service_cache(3600).unwrap();

    assert_eq!(stats.scanned, 2);
    assert_eq!(stats.corrupt_deleted, 1);
    assert_eq!(stats.deleted, 0);
    assert!(!corrupt.exists());
    assert!(foreign.exists());
    assert_eq!(cache.len().unwrap(), 1);
}

#[test]
fn missing_cache_directory_is_empty() {
    let (_dir, _clock, cache) = setup(3600);
    let stats = CacheJanitor::new(cache).service_cache(0).unwrap();
    assert_eq!(stats, JanitorStats::default());
}

#[test]
fn run_once_uses_configured_max_age() {
    let (_dir, clock, cache) = setup(60);
    cache.save(source(0), demo_init_time(), vec![]).unwrap();
    clock.advance(Duration::seconds(61));

    let stats = CacheJanitor::new(cache.clone()).run_once().unwrap();
    assert_eq!(stats.deleted, 1);
}

#[test]
fn sweeping_alongside_saves_and_lookups_keeps_store_consistent() {
    let (dir, _clock, cache) = setup(3600);
    let stop = Arc::new(AtomicBool::new(false));

    let sweeper = {
        let cache = cache.clone();
        let stop = stop.clone();
        thread::spawn(move || {
            let janitor = CacheJanitor::new(cache);
            let mut sweeps = 0u32;
            while !stop.load(Ordering::Relaxed) {
                janitor.service_cache(0).unwrap();
                sweeps += 1;
            }
            sweeps
        })
    };

    let writers: Vec<_> = (0..4)
        .map(|i| {
            let cache = cache.clone();
            thread::spawn(move || {
                for n in 0..50u32 {
                    let path = source(i);
                    let times = hourly_valid_times(n % 5);
                    cache.save(&path, demo_init_time(), times.clone()).unwrap();
                    // A concurrent sweep may have removed it; anything read back is whole.
                    if let Some(entry) = cache.lookup(&path) {
                        assert_eq!(entry.source_path, path);
                        assert_eq!(entry.init_time, demo_init_time());
                        assert_eq!(entry.valid_times, times);
                    }
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }
    stop.store(true, Ordering::Relaxed);
    assert!(sweeper.join().unwrap() > 0);

    let cache_dir = dir.path().join("vt");
    let leftovers: Vec<_> = fs::read_dir(&cache_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".vt_"))
        .collect();
    assert!(leftovers.is_empty(), "temporary files left behind: {:?}", leftovers);

    for record in cache.entry_files().unwrap() {
        let bytes = fs::read(&record).unwrap();
        serde_json::from_slice::<ValidTimeCacheEntry>(&bytes).unwrap();
    }
}

#[tokio::test]
async fn background_task_sweeps_periodically() {
    let (_dir, _clock, cache) = setup(0);
    cache.save(source(0), demo_init_time(), vec![]).unwrap();

    let task = tokio::spawn(CacheJanitor::new(cache.clone()).run_forever(StdDuration::from_millis(10)));
    let mut purged = false;
    for _ in 0..100 {
        tokio::time::sleep(StdDuration::from_millis(10)).await;
        if cache.is_empty().unwrap() {
            purged = true;
            break;
        }
    }
    task.abort();

    assert!(purged, "janitor task did not purge the cache");
}
