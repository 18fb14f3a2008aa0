//! Zone registry - the ordered, user-editable collection of zone entries
//!
//! Each entry pairs a resolved zone with its currently displayed wall-clock
//! time. Order is presentation order: entries are appended by "add city" and
//! moved by drag-and-drop, never removed.

use chrono::{DateTime, Timelike, Utc};

use crate::time_engine::{resolve_zone, WallTime, ZoneSource};

/// Error type for registry mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The submitted name did not resolve to any zone.
    UnknownZone(String),
    /// A zone with the same id is already on the board.
    DuplicateZone(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::UnknownZone(name) => write!(f, "Unknown time zone: {}", name),
            RegistryError::DuplicateZone(name) => write!(f, "{} is already on the board", name),
        }
    }
}

impl std::error::Error for RegistryError {}

/// One row on the board: a zone and its displayed time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneEntry {
    /// Stable identifier, unique within the registry (lowercased name).
    pub id: String,
    /// Display label ("UTC", "IST", or an IANA name).
    pub name: String,
    pub source: ZoneSource,
    /// UTC offset in minutes, as last evaluated. Fractional-hour zones are
    /// exact here (IST is 330).
    pub offset_minutes: i32,
    /// Displayed wall-clock time for this zone.
    pub time: WallTime,
}

impl ZoneEntry {
    /// Offset from UTC in hours, possibly fractional (IST is 5.5).
    pub fn offset_hours(&self) -> f64 {
        self.offset_minutes as f64 / 60.0
    }

    /// The short label shown on the card ("Tokyo" for Asia/Tokyo).
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Registry id for a display name.
pub fn slug(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Ordered collection of zone entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneRegistry {
    entries: Vec<ZoneEntry>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with the two default entries, UTC and IST, both
    /// showing their local time at `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let mut registry = Self::new();
        for name in ["UTC", "IST"] {
            // The seed names come from the alias table, so add cannot fail.
            if let Err(e) = registry.add(name, now) {
                debug_assert!(false, "seed zone failed to resolve: {}", e);
            }
        }
        registry
    }

    pub fn entries(&self) -> &[ZoneEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ZoneEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Resolve `query` against the zone database and append a new entry
    /// showing that zone's local time at `at`.
    ///
    /// The registry is left untouched on failure, so the caller can keep the
    /// input text around for correction.
    pub fn add(&mut self, query: &str, at: DateTime<Utc>) -> Result<(), RegistryError> {
        let resolved =
            resolve_zone(query).ok_or_else(|| RegistryError::UnknownZone(query.to_string()))?;

        let id = slug(&resolved.name);
        if self.contains(&id) {
            return Err(RegistryError::DuplicateZone(resolved.name));
        }

        let offset_minutes = resolved.source.offset_minutes_at(at);
        let utc_minutes = (at.hour() * 60 + at.minute()) as i64;
        let time = WallTime::from_minutes(utc_minutes + offset_minutes as i64);

        self.entries.push(ZoneEntry {
            id,
            name: resolved.name,
            source: resolved.source,
            offset_minutes,
            time,
        });
        Ok(())
    }

    /// Move the entry at `from` to `to`, shifting everything between.
    ///
    /// `to == None` means the drag was cancelled or dropped outside a valid
    /// target; the order is left unchanged. Times and offsets are never
    /// touched, this is purely a presentation-order change.
    pub fn reorder(&mut self, from: usize, to: Option<usize>) {
        let Some(to) = to else { return };
        if from >= self.entries.len() {
            return;
        }
        let to = to.min(self.entries.len() - 1);
        if from == to {
            return;
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
    }

    /// Set the displayed time of the entry matching `id`.
    ///
    /// Unknown ids are ignored; ids are drawn from the live collection so a
    /// miss only happens if the caller raced a stale id.
    pub fn update(&mut self, id: &str, time: WallTime) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.time = time;
        }
    }

    /// Replace the whole entry set in one step.
    ///
    /// Propagation builds the full successor set and swaps it in here, so the
    /// presentation layer never observes a half-updated board.
    pub fn replace_entries(&mut self, entries: Vec<ZoneEntry>) {
        self.entries = entries;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, h, m, 0).unwrap()
    }

    #[test]
    fn test_seeded_registry() {
        let registry = ZoneRegistry::seeded(at_utc(10, 0));
        assert_eq!(registry.len(), 2);

        let utc = registry.get("utc").unwrap();
        assert_eq!(utc.name, "UTC");
        assert_eq!(utc.offset_minutes, 0);
        assert_eq!(utc.time, WallTime::new(10, 0).unwrap());

        let ist = registry.get("ist").unwrap();
        assert_eq!(ist.offset_minutes, 330);
        assert_eq!(ist.offset_hours(), 5.5);
        assert_eq!(ist.time, WallTime::new(15, 30).unwrap());
    }

    #[test]
    fn test_add_city_gets_local_time() {
        let mut registry = ZoneRegistry::seeded(at_utc(10, 0));
        registry.add("Tokyo", at_utc(10, 0)).unwrap();
        let entry = registry.get("asia/tokyo").unwrap();
        assert_eq!(entry.name, "Asia/Tokyo");
        assert_eq!(entry.time, WallTime::new(19, 0).unwrap());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_add_unknown_zone_leaves_registry_unchanged() {
        let mut registry = ZoneRegistry::seeded(at_utc(10, 0));
        let before = registry.clone();
        let err = registry.add("Atlantis", at_utc(10, 0)).unwrap_err();
        assert_eq!(err, RegistryError::UnknownZone("Atlantis".to_string()));
        assert_eq!(registry, before);
    }

    #[test]
    fn test_add_duplicate_is_rejected() {
        let mut registry = ZoneRegistry::seeded(at_utc(10, 0));
        let before = registry.clone();
        let err = registry.add("UTC", at_utc(10, 0)).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateZone("UTC".to_string()));
        assert_eq!(registry, before);

        // Case differences still collide on the slug.
        assert!(registry.add("Utc", at_utc(10, 0)).is_err());
    }

    #[test]
    fn test_reorder_moves_entry() {
        let mut registry = ZoneRegistry::seeded(at_utc(10, 0));
        registry.add("Tokyo", at_utc(10, 0)).unwrap();

        registry.reorder(2, Some(0));
        let ids: Vec<&str> = registry.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["asia/tokyo", "utc", "ist"]);
    }

    #[test]
    fn test_reorder_preserves_values() {
        let mut registry = ZoneRegistry::seeded(at_utc(10, 0));
        registry.add("Tokyo", at_utc(10, 0)).unwrap();
        let mut before = registry.entries().to_vec();

        registry.reorder(0, Some(2));

        let mut after = registry.entries().to_vec();
        before.sort_by(|a, b| a.id.cmp(&b.id));
        after.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(before, after);
    }

    #[test]
    fn test_cancelled_or_out_of_range_reorder_is_noop() {
        let mut registry = ZoneRegistry::seeded(at_utc(10, 0));
        let before = registry.clone();

        registry.reorder(0, None);
        assert_eq!(registry, before);

        registry.reorder(9, Some(0));
        assert_eq!(registry, before);

        // Past-the-end targets clamp to the last slot.
        registry.reorder(0, Some(9));
        let ids: Vec<&str> = registry.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["ist", "utc"]);
    }

    #[test]
    fn test_update_sets_time_and_ignores_unknown_id() {
        let mut registry = ZoneRegistry::seeded(at_utc(10, 0));
        registry.update("utc", WallTime::new(9, 0).unwrap());
        assert_eq!(registry.get("utc").unwrap().time, WallTime::new(9, 0).unwrap());

        let before = registry.clone();
        registry.update("nope", WallTime::new(1, 0).unwrap());
        assert_eq!(registry, before);
    }
}
