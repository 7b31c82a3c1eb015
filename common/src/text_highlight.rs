//! Highlighted spans of engine snippets.

use serde::{Deserialize, Serialize};


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightTextSpan {
    pub text: String,
    pub is_highlighted: bool,
    /// position among the highlighted spans of one snippet
    pub index: u64,
}
