use super::identity_model::UserIdentity;
use crate::errors::Result;

/// Contract for whatever authenticates users (a user file, an external directory...).
pub trait IdentityProviderTrait: Send + Sync {
    /// Verifies the credential and returns the user's role and assigned fund.
    ///
    /// Unknown users and wrong credentials both yield `Error::InvalidCredentials`.
    fn authenticate(&self, username: &str, credential: &str) -> Result<UserIdentity>;

    /// Lists every known identity.
    fn list_identities(&self) -> Vec<UserIdentity>;
}
