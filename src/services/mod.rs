pub mod cache;
pub mod youtube;
