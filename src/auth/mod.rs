pub mod authenticator;
pub mod credentials;

pub use authenticator::{sign_in, Authenticator, SignInResult};
pub use credentials::Credentials;
