use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::analyzers::canonicalize;
use crate::TrackRecord;

/// Case-folded, whitespace-collapsed (artist, album) pair. Tracks missing
/// either tag never get a key and stay out of album grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AlbumKey {
    pub artist: String,
    pub album: String,
}

impl AlbumKey {
    pub fn for_record(record: &TrackRecord) -> Option<Self> {
        let artist = record.artist.as_deref()?;
        let album = record.album.as_deref()?;
        Some(Self {
            artist: canonicalize(artist),
            album: canonicalize(album),
        })
    }
}

/// All tracks sharing an AlbumKey, in ingestion order, with running totals.
/// Track members are indices into the pipeline's record store.
#[derive(Debug, Clone, Serialize)]
pub struct AlbumGroup {
    pub key: AlbumKey,
    pub display_artist: String,
    pub display_album: String,
    pub tracks: Vec<usize>,
    pub total_duration_secs: f64,
    pub total_size_bytes: u64,
    pub cover_hashes: BTreeSet<String>,
}

impl AlbumGroup {
    fn new(key: AlbumKey, record: &TrackRecord) -> Self {
        Self {
            key,
            // First raw spelling seen wins for display purposes.
            display_artist: record.artist.clone().unwrap_or_default(),
            display_album: record.album.clone().unwrap_or_default(),
            tracks: Vec::new(),
            total_duration_secs: 0.0,
            total_size_bytes: 0,
            cover_hashes: BTreeSet::new(),
        }
    }

    fn push(&mut self, index: usize, record: &TrackRecord) {
        self.tracks.push(index);
        self.total_duration_secs += record.duration_secs.unwrap_or(0.0);
        self.total_size_bytes += record.size_bytes;
        if let Some(hash) = &record.cover_art_hash {
            self.cover_hashes.insert(hash.clone());
        }
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.display_artist, self.display_album)
    }
}

/// One ranked name in a top-K list.
#[derive(Debug, Clone, Serialize)]
pub struct TopEntry {
    pub name: String,
    pub count: u64,
    #[serde(skip)]
    first_seen: u64,
}

/// Bounded top-K counter. Holds only the K tracked names and their counts,
/// never the full distribution: a name observed for the first time while the
/// table is full enters only if its count beats the current floor. Rank
/// churn below the table is therefore unobservable; counts are exact for any
/// name that stayed tracked.
#[derive(Debug)]
struct TopK {
    k: usize,
    entries: Vec<TopEntry>,
    tick: u64,
}

impl TopK {
    fn new(k: usize) -> Self {
        Self {
            k,
            entries: Vec::with_capacity(k),
            tick: 0,
        }
    }

    fn observe(&mut self, name: &str) {
        self.tick += 1;
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            entry.count += 1;
            return;
        }
        let fresh = TopEntry {
            name: name.to_string(),
            count: 1,
            first_seen: self.tick,
        };
        if self.entries.len() < self.k {
            self.entries.push(fresh);
            return;
        }
        // The floor is the weakest tracked entry: lowest count, and among
        // equal counts the latest-inserted (earlier insertions win ties).
        if let Some(floor) = self.entries.iter_mut().min_by(|a, b| {
            a.count
                .cmp(&b.count)
                .then(b.first_seen.cmp(&a.first_seen))
        }) {
            if fresh.count > floor.count {
                *floor = fresh;
            }
        }
    }

    fn into_ranked(mut self) -> Vec<TopEntry> {
        self.entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(a.first_seen.cmp(&b.first_seen))
        });
        self.entries
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MissingTagCounts {
    pub artist: usize,
    pub album: usize,
    pub title: usize,
    pub duration: usize,
}

/// Frozen library-wide statistics produced by `finalize`.
#[derive(Debug, Clone, Serialize)]
pub struct LibrarySnapshot {
    pub total_tracks: usize,
    pub total_albums: usize,
    pub total_duration_secs: f64,
    pub total_size_bytes: u64,
    pub top_artists: Vec<TopEntry>,
    pub top_composers: Vec<TopEntry>,
    pub missing_tags: MissingTagCounts,
    pub skipped_files: usize,
}

/// Ingests records one at a time and keeps running state only: totals,
/// bounded top-K tables and album groups. Memory stays proportional to the
/// number of distinct albums, never to library audio content.
pub struct StreamingAggregator {
    total_tracks: usize,
    total_duration_secs: f64,
    total_size_bytes: u64,
    top_artists: TopK,
    top_composers: TopK,
    albums: HashMap<AlbumKey, AlbumGroup>,
    missing: MissingTagCounts,
    skipped: usize,
}

impl StreamingAggregator {
    pub fn new(top_k: usize) -> Self {
        Self {
            total_tracks: 0,
            total_duration_secs: 0.0,
            total_size_bytes: 0,
            top_artists: TopK::new(top_k),
            top_composers: TopK::new(top_k),
            albums: HashMap::new(),
            missing: MissingTagCounts::default(),
            skipped: 0,
        }
    }

    /// O(1) update for one record. `index` is the record's position in the
    /// pipeline's store and becomes its album-group membership handle.
    pub fn ingest(&mut self, index: usize, record: &TrackRecord) {
        self.total_tracks += 1;
        // Zero and negative durations still count toward the total; the
        // anomaly pass flags them.
        self.total_duration_secs += record.duration_secs.unwrap_or(0.0);
        self.total_size_bytes += record.size_bytes;

        match &record.artist {
            Some(artist) => self.top_artists.observe(artist),
            None => self.missing.artist += 1,
        }
        match &record.composer {
            Some(composer) => self.top_composers.observe(composer),
            None => {}
        }
        if record.album.is_none() {
            self.missing.album += 1;
        }
        if record.title.is_none() {
            self.missing.title += 1;
        }
        if record.duration_secs.is_none() {
            self.missing.duration += 1;
        }

        if let Some(key) = AlbumKey::for_record(record) {
            self.albums
                .entry(key.clone())
                .or_insert_with(|| AlbumGroup::new(key, record))
                .push(index, record);
        }
    }

    pub fn note_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Freezes the running state. Albums come back sorted by key so report
    /// ordering never depends on ingestion order.
    pub fn finalize(self) -> (LibrarySnapshot, Vec<AlbumGroup>) {
        let mut albums: Vec<AlbumGroup> = self.albums.into_values().collect();
        albums.sort_by(|a, b| a.key.cmp(&b.key));

        let snapshot = LibrarySnapshot {
            total_tracks: self.total_tracks,
            total_albums: albums.len(),
            total_duration_secs: self.total_duration_secs,
            total_size_bytes: self.total_size_bytes,
            top_artists: self.top_artists.into_ranked(),
            top_composers: self.top_composers.into_ranked(),
            missing_tags: self.missing,
            skipped_files: self.skipped,
        };
        (snapshot, albums)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn record(artist: Option<&str>, album: Option<&str>, duration: Option<f64>) -> TrackRecord {
        TrackRecord {
            path: PathBuf::from("/music/x.mp3"),
            artist: artist.map(String::from),
            album: album.map(String::from),
            title: Some("t".to_string()),
            composer: None,
            duration_secs: duration,
            sample_rate_hz: Some(44_100),
            bit_depth: Some(16),
            codec: "mp3".to_string(),
            size_bytes: 1_000,
            cover_art_hash: None,
        }
    }

    fn ingest_all(aggregator: &mut StreamingAggregator, records: &[TrackRecord]) {
        for (index, record) in records.iter().enumerate() {
            aggregator.ingest(index, record);
        }
    }

    #[test]
    fn totals_include_zero_and_negative_durations() {
        let mut aggregator = StreamingAggregator::new(10);
        let records = vec![
            record(Some("A"), Some("X"), Some(120.0)),
            record(Some("A"), Some("X"), Some(0.0)),
            record(Some("A"), Some("X"), Some(-3.0)),
            record(Some("A"), Some("X"), None),
        ];
        ingest_all(&mut aggregator, &records);
        let (snapshot, _) = aggregator.finalize();
        assert_eq!(snapshot.total_tracks, 4);
        assert_eq!(snapshot.total_duration_secs, 117.0);
        assert_eq!(snapshot.total_size_bytes, 4_000);
        assert_eq!(snapshot.missing_tags.duration, 1);
    }

    #[test]
    fn track_without_artist_or_album_is_excluded_from_grouping_but_counted() {
        let mut aggregator = StreamingAggregator::new(10);
        let records = vec![
            record(None, None, Some(60.0)),
            record(Some("A"), Some("X"), Some(60.0)),
        ];
        ingest_all(&mut aggregator, &records);
        let (snapshot, albums) = aggregator.finalize();
        assert_eq!(snapshot.total_tracks, 2);
        assert_eq!(snapshot.total_albums, 1);
        assert_eq!(albums[0].tracks, vec![1]);
        assert_eq!(snapshot.missing_tags.artist, 1);
        assert_eq!(snapshot.missing_tags.album, 1);
    }

    #[test]
    fn album_key_folds_case_and_whitespace() {
        let mut aggregator = StreamingAggregator::new(10);
        let records = vec![
            record(Some("Linkin Park"), Some("Meteora"), Some(60.0)),
            record(Some("linkin  PARK"), Some(" METEORA "), Some(60.0)),
        ];
        ingest_all(&mut aggregator, &records);
        let (snapshot, albums) = aggregator.finalize();
        assert_eq!(snapshot.total_albums, 1);
        assert_eq!(albums[0].tracks, vec![0, 1]);
        // First raw spelling seen is kept for display.
        assert_eq!(albums[0].display_album, "Meteora");
    }

    #[test]
    fn album_group_keeps_running_totals_and_distinct_art() {
        let mut aggregator = StreamingAggregator::new(10);
        let mut first = record(Some("A"), Some("X"), Some(100.0));
        first.cover_art_hash = Some("aaaa".to_string());
        let mut second = record(Some("A"), Some("X"), Some(50.0));
        second.cover_art_hash = Some("bbbb".to_string());
        let mut third = record(Some("A"), Some("X"), Some(25.0));
        third.cover_art_hash = Some("aaaa".to_string());
        ingest_all(&mut aggregator, &[first, second, third]);
        let (_, albums) = aggregator.finalize();
        assert_eq!(albums[0].total_duration_secs, 175.0);
        assert_eq!(albums[0].total_size_bytes, 3_000);
        assert_eq!(albums[0].cover_hashes.len(), 2);
    }

    #[test]
    fn top_list_is_bounded_and_breaks_ties_by_first_seen() {
        let mut aggregator = StreamingAggregator::new(3);
        let names = ["a", "b", "c", "b", "c", "c", "a"];
        for (index, name) in names.iter().enumerate() {
            aggregator.ingest(index, &record(Some(name), Some("X"), Some(1.0)));
        }
        let (snapshot, _) = aggregator.finalize();
        let ranked: Vec<(&str, u64)> = snapshot
            .top_artists
            .iter()
            .map(|e| (e.name.as_str(), e.count))
            .collect();
        // a and b both have 2 plays; a was seen first.
        assert_eq!(ranked, vec![("c", 3), ("a", 2), ("b", 2)]);
    }

    #[test]
    fn full_table_ignores_names_that_cannot_beat_the_floor() {
        let mut topk = TopK::new(2);
        topk.observe("a");
        topk.observe("a");
        topk.observe("b");
        // Table is full; a first observation of "c" cannot beat b's count.
        topk.observe("c");
        let ranked = topk.into_ranked();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "a");
        assert_eq!(ranked[1].name, "b");
    }

    #[test]
    fn skipped_files_are_counted_separately_from_tracks() {
        let mut aggregator = StreamingAggregator::new(10);
        aggregator.ingest(0, &record(Some("A"), Some("X"), Some(1.0)));
        aggregator.note_skipped();
        aggregator.note_skipped();
        let (snapshot, _) = aggregator.finalize();
        assert_eq!(snapshot.total_tracks, 1);
        assert_eq!(snapshot.skipped_files, 2);
    }
}
