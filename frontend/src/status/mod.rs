//! # Status Module
//!
//! Derived indicators computed from a snapshot and the caregiver's local
//! wall clock. Every function here is pure; callers pass "now" in.
//!
//! - **medication**: dose spacing rules and eligibility
//! - **feeding**: next-feeding estimate and urgency
//! - **care**: vitamin D, bath and belly-button indicators
//! - **diaper**: recency and per-day counts
//! - **sleep**: night durations and the nights to display
//! - **board**: `StatusBoard`, all of the above in one call

pub mod board;
pub mod care;
pub mod diaper;
pub mod feeding;
pub mod medication;
pub mod sleep;

pub use board::{MedicationStatus, StatusBoard};
pub use care::Indicator;
pub use diaper::DayStats;
pub use feeding::FeedingUrgency;
pub use medication::{MedicationRule, DEFAULT_RULES};
pub use sleep::NightView;
