use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

/// Sign-in identity. Immutable once handed to a client; the password only
/// leaves its secret wrapper when the sign-in body is built.
#[derive(Debug)]
pub struct Credentials {
    domain: String,
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(domain: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Raw sign-in parameters, checked against the `SignIn` schema before sending.
    pub(crate) fn to_raw(&self) -> Value {
        json!({
            "Domain": self.domain,
            "Username": self.username,
            "Password": self.password.expose_secret(),
        })
    }
}
