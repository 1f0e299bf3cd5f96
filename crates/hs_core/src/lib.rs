//! # hs_core - Deterministic Hockey Game Reconciliation Engine
//!
//! This library fuses a game's play-by-play event feed and its
//! shift-chart feed — two independently-timestamped documents — into a
//! second-resolution on-ice reconstruction, then attributes every second
//! and every discrete event to the correct personnel under a situational
//! context (strength state and score differential).
//!
//! ## Features
//! - 100% deterministic: identical documents always yield identical rows
//! - Symmetric occupancy-driven strength classification
//! - Era-aware period durations (regular-season 3-on-3 overtime,
//!   playoff sudden death)
//! - Sparse situational stat tables with a fixed tabular output contract
//!
//! Fetching, caching, CSV writing, and persistence are external
//! collaborators: the engine consumes two already-parsed documents plus
//! a playoff flag and returns an in-memory aggregation.

pub mod engine;
pub mod error;
pub mod models;

// Re-export the engine entry point
pub use engine::reconcile_game;
pub use engine::situation::{classify_score, classify_strength};

pub use error::{GameError, Result};

// Re-export the data model
pub use models::{
    Event, EventPlayer, EventType, GameAggregation, OnIce, OnIceSide, PlayByPlayDocument,
    PlayerRecord, Role, ShiftDocument, ShiftInterval, SitKey, SituationStats, Stat, StatLine,
    StatRow, StrengthSit, TeamRecord, Venue, VenuePair, Zone, SCORE_SIT_CLAMP,
    TEAM_ROW_PLAYER_ID,
};
