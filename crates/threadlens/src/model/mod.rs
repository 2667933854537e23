//! Row model shared by every insight tab
//!
//! A [`Row`] carries the fields common to all tabs plus a tab-specific
//! [`Detail`]. The detail's JSON shape identifies which tab the row belongs to.

mod emotion;
mod practitioner;
mod row;
mod tab;

pub use emotion::Emotion;
pub use practitioner::PractitionerType;
pub use row::{Detail, Row};
pub use tab::Tab;
