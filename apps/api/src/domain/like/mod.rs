pub mod mark;
pub mod store;
pub mod target;
