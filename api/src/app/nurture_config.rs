//! Nurture sequence configuration constants
//!
//! Activity timing, CRM activity types and content defaults used by the
//! sequencer.

/// Hours until the priority follow-up after a positive response is due
pub const FOLLOW_UP_HOURS: i64 = 24;

/// Hours until the review of a negative response is due
pub const REVIEW_HOURS: i64 = 48;

/// CRM activity type for a positive-response follow-up
pub const FOLLOW_UP_ACTIVITY: &str = "follow_up";

/// CRM activity type for a negative-response review
pub const REVIEW_ACTIVITY: &str = "review";

pub const FOLLOW_UP_SUBJECT: &str = "Positive Sequence Response - Priority Follow-up";

pub const REVIEW_SUBJECT: &str = "Review Negative Sequence Response";

/// Value proposition used when none is given
pub const DEFAULT_VALUE_PROP: &str = "30% cost reduction";

/// Posts generated per platform when no count is given
pub const DEFAULT_POST_COUNT: u32 = 5;

/// Posts generated for a single sequence step
pub const STEP_POST_COUNT: u32 = 1;

/// Upper bound on `due_steps` results per call
pub const MAX_DUE_STEPS: u64 = 500;

