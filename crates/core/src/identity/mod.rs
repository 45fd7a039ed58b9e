//! Identity module - roles, the request context and the provider contract.

mod identity_model;
mod identity_traits;


pub use identity_model::{RequestContext, Role, UserIdentity};
pub use identity_traits::IdentityProviderTrait;
