//! Session helpers keeping handlers free of framework details.
//!
//! The authenticated [`Principal`] is stored in a private cookie session.
//! Handlers ask for it through [`SessionContext`].

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Principal};

pub(crate) const PRINCIPAL_KEY: &str = "principal";

/// Newtype wrapper exposing principal-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated principal, replacing any previous one.
    pub fn persist_principal(&self, principal: &Principal) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(PRINCIPAL_KEY, principal)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Current principal, if the session carries a valid one.
    pub fn principal(&self) -> Result<Option<Principal>, Error> {
        match self.0.get::<Principal>(PRINCIPAL_KEY) {
            Ok(principal) => Ok(principal),
            Err(error) => {
                warn!(%error, "discarding unreadable principal in session cookie");
                self.0.remove(PRINCIPAL_KEY);
                Ok(None)
            }
        }
    }

    /// Require a principal or fail with `401 Unauthorized`.
    pub fn require_principal(&self) -> Result<Principal, Error> {
        self.principal()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
