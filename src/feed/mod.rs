//! Paginated item feed: page cache plus response normalization.

pub mod cache;
pub mod normalize;

pub use cache::{FeedCache, HasMore, MergeOutcome, PageRequest, RequestTag};
