//! Bar acquisition port.
//!
//! Implementations are the system's data collaborators (CSV archives,
//! exchange downloads). They must hand the engine a fully materialized,
//! timestamp-ascending series; the replay core never performs I/O itself.

use crate::domain::bar::Bar;
use crate::domain::error::ScalplabError;
use chrono::{DateTime, Utc};

pub trait DataPort {
    /// Fetch bars for `symbol` within `[start, end]`, timestamp ascending.
    fn fetch_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, ScalplabError>;

    fn list_symbols(&self) -> Result<Vec<String>, ScalplabError>;

    /// First/last timestamp and bar count for a symbol, if any data exists.
    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, ScalplabError>;
}
