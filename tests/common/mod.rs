//! Shared test utilities for battlefield integration tests
#![allow(dead_code)]

use conquest::{Battlefield, LevelLadder, MemoryStore, Registry, SqliteStore};
use tempfile::TempDir;

/// The page-loading setup: one maneuver worth 1000 points, a single and a
/// repeatable medallion, and a 10000-point linear ladder
pub fn page_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_maneuver("LoadedPage", 1000).unwrap();
    registry
        .register_medallion("PageLoader", false, [("LoadedPage", 20)])
        .unwrap();
    registry
        .register_medallion("SiteLoader", true, [("LoadedPage", 5)])
        .unwrap();
    registry.set_levels(LevelLadder::linear(1000, 10000));
    registry
}

/// Creates a battlefield backed by a SQLite file in a fresh temp dir
pub fn sqlite_battlefield(registry: Registry) -> (TempDir, Battlefield<SqliteStore>) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SqliteStore::open(&dir.path().join("history.db")).expect("Failed to open store");
    (dir, Battlefield::new(registry, store))
}

pub fn memory_battlefield(registry: Registry) -> Battlefield<MemoryStore> {
    Battlefield::new(registry, MemoryStore::new())
}
