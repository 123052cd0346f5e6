//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error as ActixError, web};

use crate::domain::SequentialIdentifierAllocator;
use crate::inbound::http::configure;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryBoardRepository, InMemoryUserRepository};

/// Handler state over empty in-memory stores with deterministic identifiers.
///
/// The first allocated identifier is `00000000-0000-0000-0000-000000000001`.
pub fn memory_state() -> HttpState {
    HttpState::from_repositories(
        Arc::new(InMemoryBoardRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(SequentialIdentifierAllocator::starting_at(1)),
    )
}

/// Application with every board and user route mounted over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = ActixError,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .configure(configure)
}
