//! Vote ledger records and vote requests

mod model;

pub use model::{ActionType, UpvoteAction, UserAction, VoteAction, VoteKind};
