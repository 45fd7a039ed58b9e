//! Movements module - capital contributions and withdrawals.

mod movements_model;
mod movements_service;
mod movements_traits;


pub use movements_model::{
    CapitalMovement, IndexedMovement, MovementKind, MovementUpdate, NewMovement,
};
pub use movements_service::MovementService;
pub use movements_traits::{MovementRepositoryTrait, MovementServiceTrait};
