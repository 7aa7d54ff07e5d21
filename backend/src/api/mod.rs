//! Search index API calls and response shaping.

pub mod search;
