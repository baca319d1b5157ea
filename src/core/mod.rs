pub mod catalog;
pub mod engine;
pub mod index;
pub mod normalize;
pub mod scoring;
pub mod types;
