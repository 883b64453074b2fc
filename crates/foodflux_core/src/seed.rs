//! Demo account bootstrap for demonstration environments.
//!
//! Not part of normal operation: it only guarantees that a known account
//! exists so a fresh database can be explored.

use crate::identity::{ensure_user, ProvisionedUser};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;
use log::info;

pub const DEMO_EMAIL: &str = "demo@foodflux.dev";
pub const DEMO_NAME: &str = "Demo User";

/// Creates the demo user when absent. Safe to call repeatedly.
pub fn seed_demo_user<R: UserRepository>(users: &R) -> RepoResult<ProvisionedUser> {
    let outcome = ensure_user(users, DEMO_EMAIL, Some(DEMO_NAME))?;
    info!(
        "event=seed_demo module=seed status=ok user_id={} created={}",
        outcome.user.id, outcome.created
    );
    Ok(outcome)
}
