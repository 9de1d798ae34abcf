//! List filter (query string)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// `?limit=&offset=&search=&dir=` plus optional coordinates for
/// distance-ranked warehouse listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListFilter {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub search: Option<String>,
    pub dir: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

impl ListFilter {
    /// Clamped limit (1..=MAX_LIMIT)
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    /// Anything other than `desc` (case-insensitive) sorts ascending
    pub fn dir(&self) -> SortDir {
        match self.dir.as_deref() {
            Some(d) if d.eq_ignore_ascii_case("desc") => SortDir::Desc,
            _ => SortDir::Asc,
        }
    }

    /// Trimmed, non-empty search term
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Both coordinates, when the caller asked for distance ranking
    pub fn coordinate(&self) -> Option<(Decimal, Decimal)> {
        self.latitude.zip(self.longitude)
    }
}
