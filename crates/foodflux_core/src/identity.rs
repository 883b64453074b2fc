//! Identity gateway seam.
//!
//! # Responsibility
//! - Turn an inbound session subject into a resolved [`Identity`].
//! - Provision the user row on first successful sign-in.
//!
//! # Invariants
//! - Sign-in protocols (credentials, OAuth, cookies) live outside this
//!   crate; callers hand over the subject the identity provider vouched for.
//! - A missing, blank or unknown subject resolves to `None`, never an error.

use crate::model::user::{User, UserId};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;
use log::info;

/// Authenticated caller as seen by the domain service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            name: user.name,
            image: user.image,
        }
    }
}

/// Resolves the caller of one request.
pub trait IdentityGateway {
    fn resolve(&self, subject: Option<&str>) -> RepoResult<Option<Identity>>;
}

/// Treats the session subject as a user id and confirms it against storage.
///
/// This mirrors token-based sessions where the provider's `sub` claim is the
/// stored user id.
pub struct StoredUserGateway<R: UserRepository> {
    users: R,
}

impl<R: UserRepository> StoredUserGateway<R> {
    pub fn new(users: R) -> Self {
        Self { users }
    }
}

impl<R: UserRepository> IdentityGateway for StoredUserGateway<R> {
    fn resolve(&self, subject: Option<&str>) -> RepoResult<Option<Identity>> {
        let Some(user_id) = subject.and_then(|value| UserId::parse(value).ok()) else {
            return Ok(None);
        };
        Ok(self.users.get_user(&user_id)?.map(Identity::from))
    }
}

/// Gateway that signs every request in as one preconfigured user.
///
/// The user must still be stored: an id without a `users` row resolves to
/// `None`, exactly like an unknown session subject.
pub struct FixedIdentityGateway<R: UserRepository> {
    users: R,
    user_id: Option<UserId>,
}

impl<R: UserRepository> FixedIdentityGateway<R> {
    pub fn new(users: R, user_id: Option<UserId>) -> Self {
        Self { users, user_id }
    }

    /// Provisions `email` through [`ensure_user`] and signs requests in as it.
    pub fn provision(users: R, email: &str, name: Option<&str>) -> RepoResult<Self> {
        let provisioned = ensure_user(&users, email, name)?;
        Ok(Self::new(users, Some(provisioned.user.id)))
    }

    /// Rejects every request.
    pub fn signed_out(users: R) -> Self {
        Self::new(users, None)
    }
}

impl<R: UserRepository> IdentityGateway for FixedIdentityGateway<R> {
    fn resolve(&self, _subject: Option<&str>) -> RepoResult<Option<Identity>> {
        let Some(user_id) = self.user_id.as_ref() else {
            return Ok(None);
        };
        Ok(self.users.get_user(user_id)?.map(Identity::from))
    }
}

/// Result of [`ensure_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedUser {
    pub user: User,
    /// `false` when a row with this email already existed.
    pub created: bool,
}

/// Returns the user registered under `email`, creating it on first sign-in.
///
/// An existing row is returned unchanged; `name` only applies on creation.
pub fn ensure_user<R: UserRepository>(
    users: &R,
    email: &str,
    name: Option<&str>,
) -> RepoResult<ProvisionedUser> {
    let candidate = User::new(email, name)?;
    let email = candidate.email.as_deref().unwrap_or_default();

    if let Some(user) = users.find_user_by_email(email)? {
        return Ok(ProvisionedUser {
            user,
            created: false,
        });
    }

    users.create_user(&candidate)?;
    info!(
        "event=user_provision module=identity status=ok user_id={}",
        candidate.id
    );
    Ok(ProvisionedUser {
        user: candidate,
        created: true,
    })
}
