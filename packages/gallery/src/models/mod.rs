pub mod catalog;
pub mod generation;
