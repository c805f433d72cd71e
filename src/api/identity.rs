//! Identity provider seam
//!
//! Authentication lives outside the core. The storefront only asks whether
//! someone is signed in before letting them into checkout.

/// Source of the "is a user present" signal
pub trait IdentityProvider: Send + Sync {
    /// Identifier of the signed-in user (usually an email), if any
    fn current_user(&self) -> Option<&str>;

    /// Checks if a user is signed in
    fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// Short name for greetings: the part of an email before '@'
    fn display_name(&self) -> Option<&str> {
        self.current_user()
            .map(|user| user.split('@').next().unwrap_or(user))
    }
}

/// Fixed identity, for tests and demos
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIdentity {
    user: Option<String>,
}

impl StaticIdentity {
    /// An identity with a signed-in user
    pub fn signed_in(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
        }
    }

    /// An identity with nobody signed in
    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}
