//! Borrower Resolution
//!
//! Decides which borrower a loan is created for, based on the requested
//! borrower and the authenticated actor's claims.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use super::error::DomainError;

/// Role tags an actor can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Librarian,
    Admin,
}

/// The authenticated caller of an operation, reduced to its claims.
///
/// `subject` is the identity claim (the actor's own borrower id, as issued
/// by whatever authentication sits in front of the service).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Identity claim, if authenticated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Role tags granted to the actor
    pub roles: HashSet<Role>,
}

impl Actor {
    /// Create an actor with an identity claim
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            roles: HashSet::new(),
        }
    }

    /// Create an actor with no claims at all
    pub fn anonymous() -> Self {
        Self {
            subject: None,
            roles: HashSet::new(),
        }
    }

    /// Grant a role
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    /// Check whether the actor carries a role
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Librarians and admins may act on behalf of other borrowers
    pub fn is_privileged(&self) -> bool {
        self.has_role(Role::Librarian) || self.has_role(Role::Admin)
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Determine the authoritative borrower id for a new loan.
///
/// A loan may name a borrower explicitly; when it does not, it is for the
/// actor themselves. Substituting a different borrower than the actor's own
/// id requires a privileged role.
///
/// # Errors
/// - `DomainError::MissingIdentity` if the actor has no identity claim
/// - `DomainError::MalformedIdentity` if the claim is not a UUID
/// - `DomainError::BorrowerNotPermitted` if an unprivileged actor names
///   someone else
pub fn determine_borrower_id(
    requested: Option<Uuid>,
    actor: &Actor,
) -> Result<Uuid, DomainError> {
    let subject = actor
        .subject
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(DomainError::MissingIdentity)?;

    let actor_id = Uuid::parse_str(subject)
        .map_err(|_| DomainError::MalformedIdentity(subject.to_string()))?;

    if let Some(borrower_id) = requested {
        if borrower_id != actor_id && !actor.is_privileged() {
            return Err(DomainError::BorrowerNotPermitted);
        }
        return Ok(borrower_id);
    }

    Ok(actor_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: Uuid) -> Actor {
        Actor::new(id.to_string()).with_role(Role::Member)
    }

    #[test]
    fn test_member_defaults_to_own_id() {
        let id = Uuid::new_v4();
        let resolved = determine_borrower_id(None, &member(id)).unwrap();
        assert_eq!(resolved, id);
    }

    #[test]
    fn test_member_may_name_themselves() {
        let id = Uuid::new_v4();
        let resolved = determine_borrower_id(Some(id), &member(id)).unwrap();
        assert_eq!(resolved, id);
    }

    #[test]
    fn test_member_cannot_name_someone_else() {
        let result = determine_borrower_id(Some(Uuid::new_v4()), &member(Uuid::new_v4()));

        assert!(matches!(result, Err(DomainError::BorrowerNotPermitted)));
        assert!(result.unwrap_err().is_invalid_operation());
    }

    #[test]
    fn test_librarian_may_name_someone_else() {
        let other = Uuid::new_v4();
        let librarian = Actor::new(Uuid::new_v4().to_string()).with_role(Role::Librarian);

        let resolved = determine_borrower_id(Some(other), &librarian).unwrap();
        assert_eq!(resolved, other);
    }

    #[test]
    fn test_admin_may_name_someone_else() {
        let other = Uuid::new_v4();
        let admin = Actor::new(Uuid::new_v4().to_string()).with_role(Role::Admin);

        let resolved = determine_borrower_id(Some(other), &admin).unwrap();
        assert_eq!(resolved, other);
    }

    #[test]
    fn test_anonymous_actor_rejected() {
        let result = determine_borrower_id(None, &Actor::anonymous());

        assert!(matches!(result, Err(DomainError::MissingIdentity)));
        assert!(result.unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_empty_subject_rejected() {
        let actor = Actor::new("");
        let result = determine_borrower_id(None, &actor);

        assert!(matches!(result, Err(DomainError::MissingIdentity)));
    }

    #[test]
    fn test_malformed_subject_rejected() {
        let actor = Actor::new("not-a-uuid").with_role(Role::Admin);
        let result = determine_borrower_id(None, &actor);

        assert!(matches!(result, Err(DomainError::MalformedIdentity(_))));
        assert!(result.unwrap_err().is_invalid_operation());
    }

    #[test]
    fn test_privilege_helpers() {
        let actor = Actor::new(Uuid::new_v4().to_string());
        assert!(!actor.is_privileged());

        let actor = actor.with_role(Role::Librarian);
        assert!(actor.has_role(Role::Librarian));
        assert!(!actor.has_role(Role::Admin));
        assert!(actor.is_privileged());
    }
}
