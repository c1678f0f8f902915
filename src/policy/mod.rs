//! Authorization policies.
//!
//! Every policy is a pure function of `(actor, resource, action)` with no
//! side effects and no hidden reads; the actor is rebuilt from the verified
//! JWT claims on each request. A denial is just `false` — the caller maps
//! it to the HTTP-level error.

pub mod message;
pub mod order;
pub mod service;

use crate::account::Role;
use crate::user_auth::Claims;

/// The requesting principal, derived from verified claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Build an actor from JWT claims. Returns None if the claims carry an
    /// unparseable subject or an unknown role id.
    pub fn from_claims(claims: &Claims) -> Option<Self> {
        let user_id = claims.sub.parse::<i64>().ok()?;
        let role = Role::from_id(claims.role)?;
        Some(Self { user_id, role })
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_from_claims() {
        let claims = Claims {
            sub: "17".to_string(),
            role: Role::Student.id(),
            exp: 0,
            iat: 0,
        };
        let actor = Actor::from_claims(&claims).unwrap();
        assert_eq!(actor.user_id, 17);
        assert_eq!(actor.role, Role::Student);
    }

    #[test]
    fn test_actor_from_bad_claims() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            role: 1,
            exp: 0,
            iat: 0,
        };
        assert!(Actor::from_claims(&claims).is_none());

        let claims = Claims {
            sub: "5".to_string(),
            role: 42, // unknown role id
            exp: 0,
            iat: 0,
        };
        assert!(Actor::from_claims(&claims).is_none());
    }
}
