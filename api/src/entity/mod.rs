//! SeaORM entities
//!
//! Table models mirrored from `migrations/`.

pub mod nurture_sequences;
