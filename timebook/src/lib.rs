//! Time booking core: duration parsing, fuzzy candidate matching and the
//! searchable select used to pick projects and phases.

pub mod domain;
pub mod duration;
pub mod matcher;
pub mod select;

pub use duration::{format_duration, parse_duration, validate_booking_minutes, DurationError};
pub use matcher::{match_candidates, Candidate, MatchResult};
pub use select::{AcceptKey, KeyOutcome, SearchSelect, SelectState};
