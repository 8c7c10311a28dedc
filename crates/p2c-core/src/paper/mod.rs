//! Paper records and their moderation-relevant fields

mod model;

pub use model::{AdminStatus, ConfirmedBy, ImplementabilityStatus, Paper, PaperStatus, PaperView};
