pub mod catalog;
pub mod error;
pub mod insights;
pub mod normalize;
pub mod persistence;
pub mod protocol;
pub mod rank;
pub mod recency;
pub mod search;
pub mod server;
pub mod shortlist;
pub mod transport;
pub mod types;
