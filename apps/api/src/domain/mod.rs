pub mod comment;
pub mod errors;
pub mod like;
pub mod post;
pub mod shared;
