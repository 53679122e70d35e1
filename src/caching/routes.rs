//! Cache of simplified routes, keyed by route spec.

use super::lru::Lru;
use crate::geometry::point::LatLon;
use crate::routing::RouteSpec;
use anyhow::Context;
use log::debug;
use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

/// Number of routes kept in memory.
const MEMORY_CAPACITY: usize = 16;

/// Cache of simplified routes, with a bounded in-memory layer and an optional
/// on-disk layer surviving across runs.
pub struct RouteCache {
    /// In-memory layer.
    memory: Lru<String, Vec<LatLon>>,
    /// Directory of the on-disk layer, if configured.
    disk_root: Option<PathBuf>,
}

impl RouteCache {
    /// Initializes the cache, attaching an on-disk layer under the given
    /// directory when one is provided.
    pub fn new(cache_directory: Option<&str>) -> anyhow::Result<Self> {
        let disk_root = match cache_directory {
            Some(directory) => {
                let root = PathBuf::from(directory).join("routes");
                fs::create_dir_all(&root).with_context(|| {
                    format!("Failed to create the route cache at: {}", root.display())
                })?;
                Some(root)
            }
            None => None,
        };
        Ok(Self {
            memory: Lru::with_capacity(MEMORY_CAPACITY),
            disk_root,
        })
    }

    /// Creates a cache with no on-disk layer.
    pub fn in_memory() -> Self {
        Self {
            memory: Lru::with_capacity(MEMORY_CAPACITY),
            disk_root: None,
        }
    }

    /// Looks up the simplified route for the given spec.
    pub fn get(&mut self, spec: &RouteSpec) -> Option<Vec<LatLon>> {
        let key = spec.cache_key();
        if let Some(points) = self.memory.get(&key) {
            debug!("Route cache hit (memory): {key}");
            return Some(points.clone());
        }

        let path = self.route_path(&key)?;
        let file = File::open(path).ok()?;
        let points: Vec<LatLon> = serde_json::from_reader(BufReader::new(file)).ok()?;
        debug!("Route cache hit (disk): {key}");
        self.memory.put(key, points.clone());
        Some(points)
    }

    /// Stores the simplified route for the given spec.
    pub fn put(&mut self, spec: &RouteSpec, points: &[LatLon]) -> anyhow::Result<()> {
        let key = spec.cache_key();
        if let Some(path) = self.route_path(&key) {
            let file = File::create(&path).with_context(|| {
                format!("Failed to create route cache file: {}", path.display())
            })?;
            serde_json::to_writer(BufWriter::new(file), points)
                .with_context(|| format!("Failed to serialize cached route: {key}"))?;
        }
        self.memory.put(key, points.to_vec());
        Ok(())
    }

    /// Computes the on-disk path for the given cache key, if an on-disk layer
    /// is configured.
    fn route_path(&self, key: &str) -> Option<PathBuf> {
        let root = self.disk_root.as_ref()?;
        let file: String = key
            .chars()
            .map(|c| match c {
                '|' | ',' | '.' => '_',
                c => c,
            })
            .collect();
        Some(root.join(format!("{file}.json")))
    }
}
