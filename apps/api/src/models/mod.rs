pub mod application;
pub mod candidate;
