use std::fmt;

use shared::domain::{Role, UserId};

/// Identity handed over by the external auth provider. The dashboard only
/// reads it; it never persists or refreshes the token.
#[derive(Clone, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user_id: Option<UserId>,
    pub role: Option<Role>,
    pub is_facilitator: bool,
}

impl Session {
    pub fn facilitator(token: impl Into<String>, user_id: UserId) -> Self {
        Self {
            token: Some(token.into()),
            user_id: Some(user_id),
            role: Some(Role::Volunteer),
            is_facilitator: true,
        }
    }

    /// Credentials for the facilitator endpoints, or `None` when the session
    /// does not belong to a signed-in facilitator.
    pub fn facilitator_credentials(&self) -> Option<Credentials> {
        let token = self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        let user_id = self.user_id?;
        if self.role != Some(Role::Volunteer) || !self.is_facilitator {
            return None;
        }
        Some(Credentials {
            token: token.to_string(),
            user_id,
        })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .field("is_facilitator", &self.is_facilitator)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub user_id: UserId,
}

impl Credentials {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_facilitator_session_yields_credentials() {
        let creds = Session::facilitator("tok", UserId(5))
            .facilitator_credentials()
            .expect("credentials");
        assert_eq!(creds.user_id, UserId(5));
        assert_eq!(creds.bearer(), "Bearer tok");
    }

    #[test]
    fn incomplete_sessions_yield_nothing() {
        assert!(Session::default().facilitator_credentials().is_none());

        let mut blank_token = Session::facilitator("  ", UserId(5));
        assert!(blank_token.facilitator_credentials().is_none());
        blank_token.token = Some("tok".into());
        assert!(blank_token.facilitator_credentials().is_some());

        let mut parent = Session::facilitator("tok", UserId(5));
        parent.role = Some(Role::Parent);
        assert!(parent.facilitator_credentials().is_none());

        let mut plain_volunteer = Session::facilitator("tok", UserId(5));
        plain_volunteer.is_facilitator = false;
        assert!(plain_volunteer.facilitator_credentials().is_none());

        let mut anonymous = Session::facilitator("tok", UserId(5));
        anonymous.user_id = None;
        assert!(anonymous.facilitator_credentials().is_none());
    }

    #[test]
    fn debug_output_never_contains_token() {
        let session = Session::facilitator("super-secret", UserId(1));
        assert!(!format!("{session:?}").contains("super-secret"));
        let creds = session.facilitator_credentials().expect("credentials");
        assert!(!format!("{creds:?}").contains("super-secret"));
    }
}
