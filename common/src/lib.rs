//! Common library exports shared between the search backend and its clients.

extern crate serde;


pub mod search_query;
pub mod search_result;
pub mod text_highlight;
pub mod search_const;
