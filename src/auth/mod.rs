//! OAuth client-secret handling: the document model and the loading
//! collaborator that retrieves it from the resolved source.

mod loader;
mod secret;

pub use loader::{load_client_secret, CredentialError};
pub use secret::ClientSecret;
