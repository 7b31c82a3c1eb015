pub mod formatting;
pub mod more_like_this;
pub mod search;
pub mod thumbnails;
