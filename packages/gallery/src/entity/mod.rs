pub mod asset;
pub mod favorite;
pub mod viewer;
