//! Time block model.
//!
//! The week is divided into discrete blocks per weekday. Only blocks of
//! type [`BlockType::Class`] can receive assignments; breaks, lunch,
//! registration and homeroom slots exist for display and bell purposes.
//!
//! # Duration Model
//!
//! Sessions come in three discrete lengths (30/45/60 minutes). The
//! weekly-hour cost of a session is defined once, in
//! [`SessionDuration::hours`], and every consumer — the validator's
//! hour check and the generator's hour bookkeeping — goes through it.

use serde::{Deserialize, Serialize};

use super::SchoolLevel;

/// Discrete session length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionDuration {
    /// 30-minute session.
    Thirty,
    /// 45-minute session.
    FortyFive,
    /// 60-minute session.
    Sixty,
}

impl SessionDuration {
    /// Weekly-hour cost of one session of this length.
    ///
    /// Single authoritative mapping shared by hour validation and hour
    /// bookkeeping.
    #[inline]
    pub fn hours(&self) -> f64 {
        match self {
            SessionDuration::Thirty => 0.5,
            SessionDuration::FortyFive => 0.75,
            SessionDuration::Sixty => 1.0,
        }
    }

    /// Session length in minutes.
    #[inline]
    pub fn minutes(&self) -> u32 {
        match self {
            SessionDuration::Thirty => 30,
            SessionDuration::FortyFive => 45,
            SessionDuration::Sixty => 60,
        }
    }
}

/// What a block slot is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockType {
    /// Teaching slot — the only assignable kind.
    Class,
    Break,
    Lunch,
    Registration,
    Homeroom,
}

/// One scheduled period on a given weekday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeBlock {
    /// Unique block identifier.
    pub id: String,
    /// Weekday 1–5 (Monday–Friday).
    pub day_of_week: u8,
    /// Start time ("HH:MM").
    pub start_time: String,
    /// End time ("HH:MM").
    pub end_time: String,
    /// Session length category.
    pub duration: SessionDuration,
    /// Tier(s) the block belongs to.
    pub level: SchoolLevel,
    /// Slot usage.
    pub block_type: BlockType,
}

impl TimeBlock {
    /// Creates a class block applicable to both tiers.
    pub fn new(id: impl Into<String>, day_of_week: u8, duration: SessionDuration) -> Self {
        Self {
            id: id.into(),
            day_of_week,
            start_time: String::new(),
            end_time: String::new(),
            duration,
            level: SchoolLevel::Both,
            block_type: BlockType::Class,
        }
    }

    /// Sets the start/end times ("HH:MM").
    pub fn with_times(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_time = start.into();
        self.end_time = end.into();
        self
    }

    /// Sets the tier applicability.
    pub fn with_level(mut self, level: SchoolLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the slot usage.
    pub fn with_block_type(mut self, block_type: BlockType) -> Self {
        self.block_type = block_type;
        self
    }

    /// Whether assignments may be placed in this block.
    #[inline]
    pub fn is_assignable(&self) -> bool {
        self.block_type == BlockType::Class
    }
}
