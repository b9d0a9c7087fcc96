pub mod catalog;
pub mod favorite;
pub mod generation;

pub use catalog::CatalogService;
pub use favorite::FavoriteService;
pub use generation::{GenerationOrchestrator, GenerationSettings};
