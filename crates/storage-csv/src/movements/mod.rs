//! CSV storage for capital movements.

mod repository;

pub use repository::MovementRepository;
