use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::token_store::TokenStore;
use crate::auth::Role;

/// Where a denied navigation is sent.
pub const HOME_ROUTE: &str = "/home";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(&'static str),
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allow)
    }
}

#[derive(Debug, Deserialize)]
struct RoleClaim {
    #[serde(rename = "UserRole")]
    role: i16,
}

/// Decodes the payload segment only. The header and signature are not
/// inspected; the server verifies both.
pub fn peek_claims<T: DeserializeOwned>(token: &str) -> Option<T> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        tracing::debug!("Token does not have three segments");
        return None;
    };

    let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Token payload is not base64url: {}", e);
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!("Token payload is not the expected JSON: {}", e);
            None
        }
    }
}

/// `None` for anything that is not three dot-separated segments whose middle
/// one is base64url JSON carrying a numeric `UserRole` claim.
pub fn decode_role_claim(token: &str) -> Option<i16> {
    peek_claims::<RoleClaim>(token).map(|claim| claim.role)
}

/// Client-side route guard admitting a single role.
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard {
    required: Role,
}

pub const ADMIN_GUARD: RouteGuard = RouteGuard { required: Role::Admin };
pub const MANAGER_GUARD: RouteGuard = RouteGuard { required: Role::Manager };
pub const ALLOCATOR_GUARD: RouteGuard = RouteGuard { required: Role::Allocator };

impl RouteGuard {
    pub fn new(required: Role) -> Self {
        Self { required }
    }

    pub fn required(&self) -> Role {
        self.required
    }

    pub fn can_activate(&self, tokens: &dyn TokenStore) -> GuardOutcome {
        let Some(token) = tokens.token() else {
            return GuardOutcome::Redirect(HOME_ROUTE);
        };

        match decode_role_claim(&token) {
            Some(role) if role == self.required.as_i16() => GuardOutcome::Allow,
            _ => GuardOutcome::Redirect(HOME_ROUTE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{generate_jwt, Claims};
    use crate::client::token_store::MemoryTokenStore;

    fn token_for(role: Role) -> String {
        generate_jwt(&Claims::new(1, "ann".into(), role, 1), "any-secret").unwrap()
    }

    #[test]
    fn denies_without_token() {
        let store = MemoryTokenStore::new();
        assert_eq!(ADMIN_GUARD.can_activate(&store), GuardOutcome::Redirect(HOME_ROUTE));
    }

    #[test]
    fn admits_only_matching_role() {
        let store = MemoryTokenStore::with_token(&token_for(Role::Manager));
        assert!(MANAGER_GUARD.can_activate(&store).is_allowed());
        assert!(!ADMIN_GUARD.can_activate(&store).is_allowed());
        assert!(!ALLOCATOR_GUARD.can_activate(&store).is_allowed());
    }

    #[test]
    fn ignores_signature() {
        let token = generate_jwt(&Claims::new(1, "a".into(), Role::Allocator, 1), "other").unwrap();
        assert_eq!(decode_role_claim(&token), Some(3));
    }

    #[test]
    fn malformed_tokens_are_denied() {
        for bad in ["", "abc", "a.b", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.bm90LWpzb24.sig"] {
            let store = MemoryTokenStore::with_token(bad);
            assert_eq!(
                ADMIN_GUARD.can_activate(&store),
                GuardOutcome::Redirect(HOME_ROUTE),
                "token {:?}",
                bad
            );
        }
    }

    #[test]
    fn header_is_not_inspected() {
        // header "foo", payload {"UserRole":1}
        assert_eq!(decode_role_claim("Zm9v.eyJVc2VyUm9sZSI6MX0.sig"), Some(1));
        assert_eq!(decode_role_claim("Zm9v.eyJVc2VyUm9sZSI6MX0=.sig"), Some(1));
        assert_eq!(decode_role_claim("Zm9v.eyJVc2VyUm9sZSI6MX0.sig.extra"), None);
    }

    #[test]
    fn non_numeric_role_is_denied() {
        // header {"alg":"HS256","typ":"JWT"}, payload {"UserRole":"1"}
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJVc2VyUm9sZSI6IjEifQ.sig";
        assert_eq!(decode_role_claim(token), None);
    }
}
