use serde::Serialize;
use warp::{reject, Filter};

use crate::errors::BackendError;
use crate::normalization::normalize_text;
use crate::routes::rejection::{Context, Rejection};

/// Header carrying the authenticated user's email, set by the
/// authenticating proxy in front of this service.
pub const EMAIL_HEADER: &str = "x-forwarded-email";

/// Header carrying the user's display name, if the identity provider
/// supplied one.
pub const NAME_HEADER: &str = "x-forwarded-preferred-username";

/// Fallback header for the display name.
pub const USER_HEADER: &str = "x-forwarded-user";

/// A user resolved by the identity provider.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Identity {
    pub(crate) email: String,
    pub(crate) name: Option<String>,
}

impl Identity {
    /// Creates an identity. Returns `None` if the email is blank; a
    /// blank name is treated as absent.
    pub fn new(email: impl AsRef<str>, name: Option<String>) -> Option<Self> {
        let email = email.as_ref().trim();

        if email.is_empty() {
            return None;
        }

        let name = name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty());

        Some(Identity {
            email: email.to_owned(),
            name,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The key that identifies this user's reserved text: the display
    /// name if present, otherwise the email.
    pub fn user_key(&self) -> String {
        normalize_text(self.name.as_deref().unwrap_or(&self.email))
    }

    pub fn is_admin(&self, admin_email: &str) -> bool {
        self.email.eq_ignore_ascii_case(admin_email.trim())
    }
}

/// Extracts the [`Identity`] from the proxy headers, rejecting the
/// request if there is no email.
pub fn identity() -> impl Filter<Extract = (Identity,), Error = reject::Rejection> + Clone {
    use warp::header::optional;

    optional::<String>(EMAIL_HEADER)
        .and(optional::<String>(NAME_HEADER))
        .and(optional::<String>(USER_HEADER))
        .and_then(
            |email: Option<String>, name: Option<String>, user: Option<String>| async move {
                email
                    .and_then(|email| Identity::new(email, name.or(user)))
                    .ok_or_else(|| {
                        reject::custom(Rejection::new(
                            Context::authentication(),
                            BackendError::Unauthenticated,
                        ))
                    })
            },
        )
}
