//! JSON-file-backed store of saved rides.

use super::Ride;
use anyhow::Context;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Saved rides, loaded from and written back to a single JSON file.
pub struct RideStore {
    /// Path of the backing file.
    path: PathBuf,
    /// In-memory state, written back after each mutation.
    inner: StoreFile,
}

/// On-disk representation of the store.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    /// Identifier to assign to the next inserted ride.
    next_id: u64,
    /// Saved rides, in insertion order.
    rides: Vec<Ride>,
}

impl RideStore {
    /// Opens the store at the given path, starting empty if the file doesn't
    /// exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open ride store: {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse ride store: {}", path.display()))?
        } else {
            debug!("Starting an empty ride store at: {}", path.display());
            StoreFile {
                next_id: 1,
                rides: Vec::new(),
            }
        };
        Ok(Self { path, inner })
    }

    /// Inserts a ride, assigning its identifier and, when the name is empty,
    /// the default `Route {id}` name. Returns the assigned identifier.
    pub fn insert(&mut self, mut ride: Ride) -> anyhow::Result<u64> {
        let id = self.inner.next_id;
        self.inner.next_id += 1;
        ride.id = id;
        if ride.name.is_empty() {
            ride.name = format!("Route {id}");
        }
        self.inner.rides.push(ride);
        self.save()?;
        Ok(id)
    }

    /// Obtains the ride with the given identifier.
    pub fn get(&self, id: u64) -> Option<&Ride> {
        self.inner.rides.iter().find(|ride| ride.id == id)
    }

    /// Deletes the ride with the given identifier. Returns whether it
    /// existed.
    pub fn delete(&mut self, id: u64) -> anyhow::Result<bool> {
        let before = self.inner.rides.len();
        self.inner.rides.retain(|ride| ride.id != id);
        if self.inner.rides.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Renames the ride with the given identifier. Returns whether it
    /// existed.
    pub fn rename(&mut self, id: u64, name: &str) -> anyhow::Result<bool> {
        match self.get_mut(id) {
            Some(ride) => {
                ride.name = name.to_owned();
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Updates the user-editable fields of a ride. Returns whether it
    /// existed.
    pub fn update_details(
        &mut self,
        id: u64,
        description: Option<String>,
        rating: Option<u8>,
    ) -> anyhow::Result<bool> {
        match self.get_mut(id) {
            Some(ride) => {
                if description.is_some() {
                    ride.description = description;
                }
                if rating.is_some() {
                    ride.rating = rating;
                }
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Updates the stats recorded at the end of a tracked ride. Returns
    /// whether it existed.
    pub fn update_tracking(
        &mut self,
        id: u64,
        distance_meters: u32,
        duration_seconds: u64,
        avg_speed_kmh: Option<f64>,
        difficulty: u8,
    ) -> anyhow::Result<bool> {
        match self.get_mut(id) {
            Some(ride) => {
                ride.distance_meters = distance_meters;
                ride.duration_seconds = duration_seconds;
                ride.avg_speed_kmh = avg_speed_kmh;
                ride.difficulty = Some(difficulty);
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns all rides, newest first.
    pub fn all(&self) -> Vec<&Ride> {
        let mut rides: Vec<&Ride> = self.inner.rides.iter().collect();
        rides.sort_by(|a, b| b.id.cmp(&a.id));
        rides
    }

    /// Returns all rides, in creation order.
    pub fn all_by_creation(&self) -> Vec<&Ride> {
        let mut rides: Vec<&Ride> = self.inner.rides.iter().collect();
        rides.sort_by_key(|ride| ride.created_at);
        rides
    }

    /// Returns the rides created within the given window (inclusive), in
    /// creation order.
    pub fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Ride> {
        let mut rides: Vec<&Ride> = self
            .inner
            .rides
            .iter()
            .filter(|ride| ride.created_at >= start && ride.created_at <= end)
            .collect();
        rides.sort_by_key(|ride| ride.created_at);
        rides
    }

    /// Obtains a mutable reference to the ride with the given identifier.
    fn get_mut(&mut self, id: u64) -> Option<&mut Ride> {
        self.inner.rides.iter_mut().find(|ride| ride.id == id)
    }

    /// Writes the store back to its backing file.
    fn save(&self) -> anyhow::Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create ride store: {}", self.path.display()))?;
        serde_json::to_writer(BufWriter::new(file), &self.inner)
            .with_context(|| format!("Failed to serialize ride store: {}", self.path.display()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::point::LatLon;
    use crate::routing::{Direction, Profile};
    use chrono::TimeZone;

    fn ride(name: &str, distance_meters: u32, created_at: DateTime<Utc>) -> Ride {
        Ride {
            id: 0,
            name: name.to_owned(),
            start: LatLon {
                lat: 47.37,
                lon: 8.54,
            },
            spec_length_meters: distance_meters,
            spec_profile: Profile::Regular,
            spec_seed: 1,
            spec_direction: Direction::Clockwise,
            distance_meters,
            duration_seconds: 3600,
            avg_speed_kmh: None,
            difficulty: Some(2),
            description: None,
            rating: None,
            created_at,
            polyline: None,
        }
    }

    fn timestamp(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn insert_assigns_id_and_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RideStore::open(dir.path().join("rides.json")).unwrap();

        let id = store.insert(ride("", 20_000, timestamp(1, 9))).unwrap();
        assert_eq!(id, 1);
        assert_eq!(store.get(1).unwrap().name, "Route 1");

        let id = store.insert(ride("Lakeside", 15_000, timestamp(2, 9))).unwrap();
        assert_eq!(id, 2);
        assert_eq!(store.get(2).unwrap().name, "Lakeside");
    }

    #[test]
    fn store_survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rides.json");

        {
            let mut store = RideStore::open(&path).unwrap();
            store.insert(ride("", 20_000, timestamp(1, 9))).unwrap();
            store.delete(1).unwrap();
            store.insert(ride("", 10_000, timestamp(2, 9))).unwrap();
        }

        let store = RideStore::open(&path).unwrap();
        // Identifiers are not reused after a delete.
        assert!(store.get(1).is_none());
        assert_eq!(store.get(2).unwrap().name, "Route 2");
    }

    #[test]
    fn delete_missing_ride() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RideStore::open(dir.path().join("rides.json")).unwrap();
        assert!(!store.delete(42).unwrap());
    }

    #[test]
    fn rename_and_update_details() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RideStore::open(dir.path().join("rides.json")).unwrap();
        let id = store.insert(ride("", 20_000, timestamp(1, 9))).unwrap();

        assert!(store.rename(id, "Morning loop").unwrap());
        assert!(store
            .update_details(id, Some("Hilly".to_owned()), Some(4))
            .unwrap());
        // Absent fields are left untouched.
        assert!(store.update_details(id, None, None).unwrap());

        let ride = store.get(id).unwrap();
        assert_eq!(ride.name, "Morning loop");
        assert_eq!(ride.description.as_deref(), Some("Hilly"));
        assert_eq!(ride.rating, Some(4));
    }

    #[test]
    fn update_tracking_stats() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RideStore::open(dir.path().join("rides.json")).unwrap();
        let id = store.insert(ride("", 20_000, timestamp(1, 9))).unwrap();

        assert!(store
            .update_tracking(id, 21_500, 4_000, Some(19.35), 2)
            .unwrap());
        let ride = store.get(id).unwrap();
        assert_eq!(ride.distance_meters, 21_500);
        assert_eq!(ride.duration_seconds, 4_000);
        assert_eq!(ride.avg_speed_kmh, Some(19.35));
        assert_eq!(ride.difficulty, Some(2));
    }

    #[test]
    fn listing_orders() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RideStore::open(dir.path().join("rides.json")).unwrap();
        store.insert(ride("a", 1_000, timestamp(3, 9))).unwrap();
        store.insert(ride("b", 2_000, timestamp(1, 9))).unwrap();
        store.insert(ride("c", 3_000, timestamp(2, 9))).unwrap();

        let newest_first: Vec<&str> = store.all().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(newest_first, ["c", "b", "a"]);

        let by_creation: Vec<&str> = store
            .all_by_creation()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(by_creation, ["b", "c", "a"]);

        let window: Vec<&str> = store
            .between(timestamp(1, 0), timestamp(2, 23))
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(window, ["b", "c"]);
    }
}
