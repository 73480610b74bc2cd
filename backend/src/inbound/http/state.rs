//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` so they depend only
//! on the driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, RegistrationService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Login use-case.
    pub login: Arc<dyn LoginService>,
    /// Registration use-case.
    pub registration: Arc<dyn RegistrationService>,
}

impl HttpState {
    /// Bundle separate port implementations.
    pub fn new(login: Arc<dyn LoginService>, registration: Arc<dyn RegistrationService>) -> Self {
        Self {
            login,
            registration,
        }
    }

    /// Serve both use-cases from one service instance.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: LoginService + RegistrationService + 'static,
    {
        Self {
            login: service.clone(),
            registration: service,
        }
    }
}
