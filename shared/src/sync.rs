//! Time propagation - keeping every zone card consistent
//!
//! One edit (a time field, a slider, the date, or the minute tick) nominates
//! a single source entry; `propagate` recomputes every other entry from the
//! instant that source implies. There are no mutually triggering updates:
//! each event runs exactly one directional pass and the registry is swapped
//! wholesale, so the presentation layer only ever sees consistent state.

use chrono::{DateTime, NaiveDate, Timelike, Utc};

use crate::clock::ReferenceClock;
use crate::registry::{RegistryError, ZoneEntry, ZoneRegistry};
use crate::time_engine::WallTime;

/// Id of the entry that anchors date changes and clock ticks.
const ANCHOR_ID: &str = "utc";

/// Recompute all entries from the one named source, anchored at `date`.
///
/// The source keeps its edited time; every other entry gets the time-of-day
/// of the implied instant at its own offset, wrapped into 00:00-23:59 (a
/// midnight rollover only moves the date, which is a label concern).
/// IANA-backed entries also refresh their stored offset from the database at
/// that instant, so a date moved across a DST boundary is reflected in one
/// pass. An unknown source id returns the entries unchanged.
pub fn propagate(entries: &[ZoneEntry], source_id: &str, date: NaiveDate) -> Vec<ZoneEntry> {
    let Some(source) = entries.iter().find(|e| e.id == source_id) else {
        return entries.to_vec();
    };

    let instant = source
        .source
        .local_to_utc(source.time.on(date), source.offset_minutes);
    let utc_minutes = (instant.hour() * 60 + instant.minute()) as i64;

    entries
        .iter()
        .map(|entry| {
            let mut next = entry.clone();
            next.offset_minutes = entry.source.offset_minutes_at(instant);
            if entry.id != source.id {
                next.time = WallTime::from_minutes(utc_minutes + next.offset_minutes as i64);
            }
            next
        })
        .collect()
}

/// The synchronized board: reference clock plus zone registry, with the
/// event surface the presentation layer drives.
///
/// Every mutating method runs propagation to completion before returning.
#[derive(Debug, Clone)]
pub struct ZoneBoard {
    clock: ReferenceClock,
    registry: ZoneRegistry,
}

impl ZoneBoard {
    /// A board seeded with UTC and IST showing their local times at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            clock: ReferenceClock::new(now),
            registry: ZoneRegistry::seeded(now),
        }
    }

    pub fn entries(&self) -> &[ZoneEntry] {
        self.registry.entries()
    }

    pub fn get(&self, id: &str) -> Option<&ZoneEntry> {
        self.registry.get(id)
    }

    pub fn date(&self) -> NaiveDate {
        self.clock.date()
    }

    pub fn clock(&self) -> &ReferenceClock {
        &self.clock
    }

    /// A time field was committed for the given zone.
    pub fn edit_time(&mut self, id: &str, time: WallTime) {
        if !self.registry.contains(id) {
            return;
        }
        self.registry.update(id, time);
        self.propagate_from(id);
    }

    /// A slider was dragged to `minutes` past midnight for the given zone.
    pub fn slide(&mut self, id: &str, minutes: u32) {
        self.edit_time(id, WallTime::from_minutes(minutes as i64));
    }

    /// The reference date changed; re-anchor every zone on the new date.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.clock.set_date(date);
        if let Some(anchor) = self.anchor_id() {
            self.propagate_from(&anchor);
        }
    }

    /// Add a zone by free-form name, showing its local time at the instant
    /// the board currently displays.
    pub fn add_city(&mut self, query: &str) -> Result<(), RegistryError> {
        let at = self.board_instant();
        self.registry.add(query, at)
    }

    /// Move a card; `to == None` is a cancelled drag and changes nothing.
    pub fn reorder(&mut self, from: usize, to: Option<usize>) {
        self.registry.reorder(from, to);
    }

    /// Minute tick: advance the live clock, and unless the user is mid-edit,
    /// bring the anchor zone back to live time and propagate.
    pub fn tick(&mut self, now: DateTime<Utc>, edit_pending: bool) {
        self.clock.tick(now);
        if edit_pending {
            return;
        }
        if let Some(anchor) = self.anchor_id() {
            self.registry.update(&anchor, self.clock.utc_wall_time());
            self.propagate_from(&anchor);
        }
    }

    /// The UTC instant the board currently displays, implied by the anchor
    /// entry and the reference date.
    pub fn board_instant(&self) -> DateTime<Utc> {
        match self.anchor_id().and_then(|id| self.registry.get(&id)) {
            Some(anchor) => anchor
                .source
                .local_to_utc(anchor.time.on(self.clock.date()), anchor.offset_minutes),
            None => self.clock.utc_now(),
        }
    }

    /// The UTC seed anchors ticks and date changes; entries are never
    /// removed, so the fallback to the first entry is theoretical.
    fn anchor_id(&self) -> Option<String> {
        if self.registry.contains(ANCHOR_ID) {
            Some(ANCHOR_ID.to_string())
        } else {
            self.registry.entries().first().map(|e| e.id.clone())
        }
    }

    fn propagate_from(&mut self, id: &str) {
        let next = propagate(self.registry.entries(), id, self.clock.date());
        self.registry.replace_entries(next);
    }
}
