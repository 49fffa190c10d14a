use crate::snapshot::SnapshotFile;
use ahash::AHashMap;
use async_trait::async_trait;
use nearby_core::{
    ArtisanId, ArtisanRecord, BoundingBox, CandidateSource, Coordinate, Error, LocationStore, Result,
};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// In-memory artisan records with optional JSON snapshot persistence
pub struct ArtisanStore {
    artisans: Arc<RwLock<AHashMap<ArtisanId, ArtisanRecord>>>,
    snapshot: Option<SnapshotFile>,
    online: AtomicBool,
}

impl ArtisanStore {
    /// A store that lives only in memory
    pub fn in_memory() -> Self {
        Self {
            artisans: Arc::new(RwLock::new(AHashMap::new())),
            snapshot: None,
            online: AtomicBool::new(true),
        }
    }

    /// Open a store backed by `<data_dir>/artisans.json`, loading it if present
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)?;

        let snapshot = SnapshotFile::new(data_dir);
        let mut artisans = AHashMap::new();
        if let Some(data) = snapshot
            .load()
            .map_err(|e| Error::Serialization(format!("{:#}", e)))?
        {
            for record in data.artisans {
                if artisans.insert(record.id, record).is_some() {
                    warn!("Duplicate artisan id in snapshot; keeping the last record");
                }
            }
            info!("Loaded {} artisans from {:?}", artisans.len(), snapshot.path());
        }

        Ok(Self {
            artisans: Arc::new(RwLock::new(artisans)),
            snapshot: Some(snapshot),
            online: AtomicBool::new(true),
        })
    }

    /// Insert or replace a record, returning the previous one
    pub fn upsert(&self, record: ArtisanRecord) -> Option<ArtisanRecord> {
        self.artisans.write().insert(record.id, record)
    }

    #[inline]
    pub fn get(&self, id: ArtisanId) -> Option<ArtisanRecord> {
        self.artisans.read().get(&id).cloned()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.artisans.read().len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artisans.read().is_empty()
    }

    /// Mark the store reachable or not; while offline every retrieval fails.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }

    #[inline]
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Write the snapshot, if this store has one
    pub fn save(&self) -> Result<()> {
        let artisans: Vec<ArtisanRecord> = self.artisans.read().values().cloned().collect();
        self.write_snapshot(artisans)
    }

    fn write_snapshot(&self, mut artisans: Vec<ArtisanRecord>) -> Result<()> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };
        artisans.sort_by_key(|a| a.id);
        let count = artisans.len();
        snapshot
            .save(artisans)
            .map_err(|e| Error::Serialization(format!("{:#}", e)))?;
        info!("Saved {} artisans to {:?}", count, snapshot.path());
        Ok(())
    }

    /// Persist the relocated record before committing it to memory.
    ///
    /// The write lock is held across the snapshot write so concurrent updates
    /// cannot interleave. The write is a blocking file replace; snapshots are
    /// small enough that this stays on the calling worker.
    fn relocate(
        &self,
        id: ArtisanId,
        coordinate: Coordinate,
        location: Option<String>,
    ) -> Result<ArtisanRecord> {
        let mut artisans = self.artisans.write();
        let mut updated = artisans
            .get(&id)
            .cloned()
            .ok_or(Error::ArtisanNotFound(id.0))?;
        updated.coordinate = Some(coordinate);
        if location.is_some() {
            updated.location = location;
        }

        if self.snapshot.is_some() {
            let records = artisans
                .values()
                .filter(|a| a.id != id)
                .cloned()
                .chain(std::iter::once(updated.clone()))
                .collect();
            self.write_snapshot(records)?;
        }
        artisans.insert(id, updated.clone());
        Ok(updated)
    }

    fn ensure_online(&self) -> Result<()> {
        if self.is_online() {
            Ok(())
        } else {
            Err(Error::retrieval("artisan store is offline"))
        }
    }
}

#[async_trait]
impl CandidateSource for ArtisanStore {
    async fn candidates_within(&self, region: &BoundingBox) -> Result<Vec<ArtisanRecord>> {
        self.ensure_online()?;
        let artisans = self.artisans.read();
        Ok(artisans
            .values()
            .filter(|a| a.coordinate.map(|c| region.contains(c)).unwrap_or(false))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LocationStore for ArtisanStore {
    async fn set_location(
        &self,
        id: ArtisanId,
        coordinate: Coordinate,
        location: Option<String>,
    ) -> Result<ArtisanRecord> {
        self.ensure_online()?;
        self.relocate(id, coordinate, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn seeded() -> ArtisanStore {
        let store = ArtisanStore::in_memory();
        store.upsert(ArtisanRecord::new(1, "near").with_coordinate(coord(40.01, -73.0)));
        store.upsert(ArtisanRecord::new(2, "far").with_coordinate(coord(45.0, -73.0)));
        store.upsert(ArtisanRecord::new(3, "nowhere"));
        store
    }

    #[tokio::test]
    async fn test_candidates_within_box() {
        let store = seeded();
        let region = BoundingBox::around(coord(40.0, -73.0), 10.0);
        let candidates = store.candidates_within(&region).await.unwrap();
        let ids: Vec<u64> = candidates.iter().map(|a| a.id.0).collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn test_offline_store_fails_retrieval() {
        let store = seeded();
        store.set_online(false);
        let region = BoundingBox::around(coord(40.0, -73.0), 10.0);
        let err = store.candidates_within(&region).await.unwrap_err();
        assert!(matches!(err, Error::Retrieval(_)));

        store.set_online(true);
        assert!(store.candidates_within(&region).await.is_ok());
    }

    #[tokio::test]
    async fn test_set_location_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtisanStore::open(dir.path()).unwrap();
        store.upsert(ArtisanRecord::new(3, "nowhere"));

        let updated = store
            .set_location(ArtisanId(3), coord(51.5, -0.12), Some("London".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.coordinate, Some(coord(51.5, -0.12)));
        assert_eq!(updated.location.as_deref(), Some("London"));

        let reopened = ArtisanStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get(ArtisanId(3)), Some(updated));
    }

    #[tokio::test]
    async fn test_set_location_failed_save_leaves_record_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtisanStore::open(dir.path()).unwrap();
        store.upsert(ArtisanRecord::new(3, "nowhere").with_location("Paris"));

        // A non-empty directory where the snapshot file belongs makes the replace fail
        let blocker = dir.path().join(crate::snapshot::SNAPSHOT_FILENAME);
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), b"x").unwrap();

        let result = store
            .set_location(ArtisanId(3), coord(51.5, -0.12), Some("London".to_string()))
            .await;
        assert!(matches!(result, Err(Error::Serialization(_))));

        let record = store.get(ArtisanId(3)).unwrap();
        assert_eq!(record.coordinate, None);
        assert_eq!(record.location.as_deref(), Some("Paris"));

        let region = BoundingBox::around(coord(51.5, -0.12), 10.0);
        assert!(store.candidates_within(&region).await.unwrap().is_empty());
    }

    #[test]
    fn test_open_rejects_out_of_range_rating() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(crate::snapshot::SNAPSHOT_FILENAME),
            r#"{"artisans": [{"id": 1, "name": "x", "rating": 9.0}]}"#,
        )
        .unwrap();
        assert!(matches!(
            ArtisanStore::open(dir.path()),
            Err(Error::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_set_location_unknown_artisan() {
        let store = seeded();
        let err = store
            .set_location(ArtisanId(42), coord(0.0, 0.0), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ArtisanNotFound(42)));
    }

    #[test]
    fn test_save_without_snapshot_is_noop() {
        let store = seeded();
        assert!(store.save().is_ok());
        assert_eq!(store.len(), 3);
        assert!(!store.is_empty());
    }
}
