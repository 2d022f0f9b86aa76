pub mod allocator;
pub mod capacity;
pub mod error;
pub mod reveal;
pub mod rng;
pub mod roster;
pub mod types;

pub use allocator::{fill_gaps, FillReport, TierFill};
pub use capacity::{parse_capacity, CapacityModel};
pub use error::DrawError;
pub use reveal::{infer_cursor, visible_winners, RevealCursor};
pub use rng::{seed_from_parts, DrawRng};
pub use roster::{normalize_batch, normalize_record, validate_batch, RawRecord, RawValue};
pub use types::{ParticipantRecord, Tier, Winner};
