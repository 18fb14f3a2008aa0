//! Shared core for the Zone Board dashboard
//!
//! Holds everything that is not presentation: the reference clock, the
//! ordered zone registry, the propagation pass that keeps every card
//! consistent, zone-name resolution, and preference persistence. The board
//! app drives this through `ZoneBoard` and renders from its entry list.

pub mod clock;
pub mod config;
pub mod registry;
pub mod sync;
pub mod time_engine;

pub use clock::{MinuteTicker, ReferenceClock, TICK_PERIOD};
pub use config::{load_prefs, prefs_path, save_prefs, ConfigError, Prefs};
pub use registry::{slug, RegistryError, ZoneEntry, ZoneRegistry};
pub use sync::{propagate, ZoneBoard};
pub use time_engine::{
    format_offset, resolve_zone, search_zones, ResolvedZone, WallTime, ZoneSource,
    MINUTES_PER_DAY,
};
