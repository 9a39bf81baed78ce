//! Driving port for login.
//!
//! Inbound adapters authenticate credentials through this port without
//! knowing which identity provider backs it.

use async_trait::async_trait;
use uuid::{Uuid, uuid};

use crate::domain::{Error, LoginCredentials, Principal, Role, UserId};

/// Identity provider use-case: credentials in, principal out.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated principal.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error>;
}

/// Account id of the fixture administrator.
pub const FIXTURE_ADMIN_ID: Uuid = uuid!("123e4567-e89b-12d3-a456-426614174000");
/// Account id of the fixture professor.
pub const FIXTURE_PROFESSOR_ID: Uuid = uuid!("0b6f6d6e-54f2-4d8b-9c6b-0d35f8a7b001");
/// Account id of the fixture student. A matching student profile is seeded by
/// the in-memory store.
pub const FIXTURE_STUDENT_ID: Uuid = uuid!("5c1d2f3e-7a8b-4c9d-8e0f-1a2b3c4d5e6f");

/// Fixed development accounts. Every account uses the password `password`.
///
/// | username    | role          |
/// |-------------|---------------|
/// | `admin`     | administrator |
/// | `professor` | professor     |
/// | `student`   | student       |
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

impl FixtureLoginService {
    fn account(username: &str) -> Option<(Uuid, Role)> {
        match username {
            "admin" => Some((FIXTURE_ADMIN_ID, Role::Administrator)),
            "professor" => Some((FIXTURE_PROFESSOR_ID, Role::Professor)),
            "student" => Some((FIXTURE_STUDENT_ID, Role::Student)),
            _ => None,
        }
    }
}

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error> {
        match Self::account(credentials.username()) {
            Some((id, role)) if credentials.password() == "password" => {
                Ok(Principal::new(UserId::from_uuid(id), role))
            }
            _ => Err(Error::unauthorized("invalid credentials")),
        }
    }
}
