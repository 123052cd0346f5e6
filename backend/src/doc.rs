//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every handler in the inbound layer (users, boards, sections,
//!   tickets, health)
//! - **Schemas**: the request and response DTOs plus the domain error
//!   wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]), which keep the domain
//!   types free of utoipa derives
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::boards::{
    BoardEnvelope, BoardPayload, BoardResponse, BoardsEnvelope, NewSectionBody, SectionPayload,
    SectionResponse, SectionsEnvelope, TicketPayload, TicketResponse, TicketsEnvelope,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{NewUserBody, UserEnvelope, UserResponse};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kanban backend API",
        description = "HTTP interface for users, boards, sections, tickets, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::find_user,
        crate::inbound::http::boards::list_user_boards,
        crate::inbound::http::boards::create_user_board,
        crate::inbound::http::boards::get_user_board,
        crate::inbound::http::boards::add_user_board_section,
        crate::inbound::http::boards::create_board,
        crate::inbound::http::boards::get_board,
        crate::inbound::http::boards::replace_board,
        crate::inbound::http::boards::delete_board,
        crate::inbound::http::boards::add_section,
        crate::inbound::http::boards::remove_section,
        crate::inbound::http::boards::add_ticket,
        crate::inbound::http::boards::remove_ticket,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        NewUserBody,
        UserResponse,
        UserEnvelope,
        TicketPayload,
        SectionPayload,
        BoardPayload,
        NewSectionBody,
        TicketResponse,
        SectionResponse,
        BoardResponse,
        BoardEnvelope,
        BoardsEnvelope,
        SectionsEnvelope,
        TicketsEnvelope,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "User registration and lookup"),
        (name = "boards", description = "Whole-board operations"),
        (name = "sections", description = "Section operations within a board"),
        (name = "tickets", description = "Ticket operations within a section"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
