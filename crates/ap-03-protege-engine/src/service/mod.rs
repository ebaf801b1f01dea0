//! Application service layer

pub mod engine;

pub use engine::ProtegeService;
