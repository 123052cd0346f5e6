//! Board HTTP handlers.
//!
//! ```text
//! POST   /boards
//! GET    /boards/{id}
//! PUT    /boards/{id}
//! DELETE /boards/{id}
//! POST   /boards/{id}/sections                      {"title":"Backlog"}
//! DELETE /boards/{id}/sections/{title}
//! POST   /boards/{id}/sections/{title}              Ticket
//! DELETE /boards/{id}/sections/{title}/{ticketId}
//! GET    /users/{username}/boards
//! POST   /users/{username}/boards
//! GET    /users/{username}/boards/{name}
//! POST   /users/{username}/boards/{name}/sections   {"title":"Backlog"}
//! ```
//!
//! Request bodies may carry `id` fields on boards, sections, and tickets.
//! Creation ignores them; replacement keeps only those the stored board
//! already issued.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    AddTicketRequest, RemoveTicketRequest, ReplaceBoardRequest, SectionRequest,
    UserBoardSectionRequest,
};
use crate::domain::{Board, BoardDraft, Section, SectionDraft, Ticket, TicketDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// Ticket as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct TicketPayload {
    /// Ignored on creation.
    #[schema(format = "uuid")]
    pub id: Option<String>,
    pub name: String,
    pub priority: String,
    pub body: String,
    pub done: bool,
}

impl From<TicketPayload> for TicketDraft {
    fn from(value: TicketPayload) -> Self {
        Self {
            id: value.id,
            name: value.name,
            priority: value.priority,
            body: value.body,
            done: value.done,
        }
    }
}

/// Section as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct SectionPayload {
    #[schema(format = "uuid")]
    pub id: Option<String>,
    pub title: String,
    pub tickets: Vec<TicketPayload>,
}

impl From<SectionPayload> for SectionDraft {
    fn from(value: SectionPayload) -> Self {
        Self {
            id: value.id,
            title: value.title,
            tickets: value.tickets.into_iter().map(TicketDraft::from).collect(),
        }
    }
}

/// Board document as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct BoardPayload {
    /// Ignored; the path or the server decides the board id.
    #[schema(format = "uuid")]
    pub id: Option<String>,
    #[schema(example = "Sprint1")]
    pub name: String,
    #[schema(example = "alice")]
    pub creator: String,
    /// Version the caller last read. Required by `PUT /boards/{id}`.
    pub version: Option<u64>,
    pub sections: Vec<SectionPayload>,
    pub completed: Vec<TicketPayload>,
}

impl From<BoardPayload> for BoardDraft {
    fn from(value: BoardPayload) -> Self {
        Self {
            name: value.name,
            creator: value.creator,
            sections: value.sections.into_iter().map(SectionDraft::from).collect(),
            completed: value.completed.into_iter().map(TicketDraft::from).collect(),
        }
    }
}

/// Request body for `POST /boards/{id}/sections`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct NewSectionBody {
    #[schema(example = "Backlog")]
    pub title: Option<String>,
}

/// Ticket view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct TicketResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub priority: String,
    pub body: String,
    pub done: bool,
}

impl From<&Ticket> for TicketResponse {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id.to_string(),
            name: ticket.name.clone(),
            priority: ticket.priority.clone(),
            body: ticket.body.clone(),
            done: ticket.done,
        }
    }
}

/// Section view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct SectionResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub title: String,
    pub tickets: Vec<TicketResponse>,
}

impl From<&Section> for SectionResponse {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id().to_string(),
            title: section.title().to_string(),
            tickets: section.tickets().iter().map(TicketResponse::from).collect(),
        }
    }
}

/// Board view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct BoardResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub creator: String,
    pub version: u64,
    pub sections: Vec<SectionResponse>,
    pub completed: Vec<TicketResponse>,
}

impl From<&Board> for BoardResponse {
    fn from(board: &Board) -> Self {
        Self {
            id: board.id().to_string(),
            name: board.name().to_string(),
            creator: board.creator().to_string(),
            version: board.version(),
            sections: board.sections().iter().map(SectionResponse::from).collect(),
            completed: board.completed().iter().map(TicketResponse::from).collect(),
        }
    }
}

/// `{board}` envelope.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct BoardEnvelope {
    pub board: BoardResponse,
}

impl From<&Board> for BoardEnvelope {
    fn from(board: &Board) -> Self {
        Self {
            board: board.into(),
        }
    }
}

/// `{boards}` envelope.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct BoardsEnvelope {
    pub boards: Vec<BoardResponse>,
}

/// `{sections}` envelope.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SectionsEnvelope {
    pub sections: Vec<SectionResponse>,
}

/// `{tickets}` envelope.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TicketsEnvelope {
    pub tickets: Vec<TicketResponse>,
}

/// Create a board, stamping fresh identifiers throughout.
#[utoipa::path(
    post,
    path = "/boards",
    request_body = BoardPayload,
    responses(
        (status = 201, description = "Board created", body = BoardEnvelope),
        (status = 400, description = "Invalid board or Board Name Already Exists", body = ErrorSchema),
        (status = 503, description = "Board store unavailable", body = ErrorSchema)
    ),
    tags = ["boards"],
    operation_id = "createBoard"
)]
#[post("/boards")]
pub async fn create_board(
    state: web::Data<HttpState>,
    payload: web::Json<BoardPayload>,
) -> ApiResult<HttpResponse> {
    let board = state
        .boards
        .create_board(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(BoardEnvelope::from(&board)))
}

/// Fetch a board.
#[utoipa::path(
    get,
    path = "/boards/{id}",
    params(("id" = String, Path, description = "Board identifier")),
    responses(
        (status = 200, description = "Board", body = BoardEnvelope),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Board Not Found", body = ErrorSchema)
    ),
    tags = ["boards"],
    operation_id = "getBoard"
)]
#[get("/boards/{id}")]
pub async fn get_board(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BoardEnvelope>> {
    let board = state.board_queries.get_board(&path.into_inner()).await?;
    Ok(web::Json(BoardEnvelope::from(&board)))
}

/// Replace a whole board, guarded by the version the caller read.
#[utoipa::path(
    put,
    path = "/boards/{id}",
    params(("id" = String, Path, description = "Board identifier")),
    request_body = BoardPayload,
    responses(
        (status = 200, description = "Board replaced", body = BoardEnvelope),
        (status = 400, description = "Invalid board or missing version", body = ErrorSchema),
        (status = 404, description = "Board Not Found", body = ErrorSchema),
        (status = 409, description = "Board Was Modified", body = ErrorSchema)
    ),
    tags = ["boards"],
    operation_id = "replaceBoard"
)]
#[put("/boards/{id}")]
pub async fn replace_board(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<BoardPayload>,
) -> ApiResult<web::Json<BoardEnvelope>> {
    let payload = payload.into_inner();
    let board = state
        .boards
        .replace_board(ReplaceBoardRequest {
            board_id: path.into_inner(),
            expected_version: payload.version,
            board: payload.into(),
        })
        .await?;
    Ok(web::Json(BoardEnvelope::from(&board)))
}

/// Delete a board.
#[utoipa::path(
    delete,
    path = "/boards/{id}",
    params(("id" = String, Path, description = "Board identifier")),
    responses(
        (status = 204, description = "Board deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Board Not Found", body = ErrorSchema)
    ),
    tags = ["boards"],
    operation_id = "deleteBoard"
)]
#[delete("/boards/{id}")]
pub async fn delete_board(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.boards.delete_board(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Append an empty section.
#[utoipa::path(
    post,
    path = "/boards/{id}/sections",
    params(("id" = String, Path, description = "Board identifier")),
    request_body = NewSectionBody,
    responses(
        (status = 200, description = "Sections after the append", body = SectionsEnvelope),
        (status = 400, description = "Invalid input or Section Title Already Exists", body = ErrorSchema),
        (status = 404, description = "Board Not Found", body = ErrorSchema)
    ),
    tags = ["sections"],
    operation_id = "addSection"
)]
#[post("/boards/{id}/sections")]
pub async fn add_section(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<NewSectionBody>,
) -> ApiResult<web::Json<SectionsEnvelope>> {
    let title = require(payload.into_inner().title, FieldName::new("title"))?;
    let sections = state
        .boards
        .add_section(SectionRequest {
            board_id: path.into_inner(),
            title,
        })
        .await?;
    Ok(web::Json(SectionsEnvelope {
        sections: sections.iter().map(SectionResponse::from).collect(),
    }))
}

/// Remove a section by title.
#[utoipa::path(
    delete,
    path = "/boards/{id}/sections/{title}",
    params(
        ("id" = String, Path, description = "Board identifier"),
        ("title" = String, Path, description = "Section title")
    ),
    responses(
        (status = 204, description = "Section removed"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Section Not Found", body = ErrorSchema)
    ),
    tags = ["sections"],
    operation_id = "removeSection"
)]
#[delete("/boards/{id}/sections/{title}")]
pub async fn remove_section(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (board_id, title) = path.into_inner();
    state
        .boards
        .remove_section(SectionRequest { board_id, title })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Append a ticket to a section.
#[utoipa::path(
    post,
    path = "/boards/{id}/sections/{title}",
    params(
        ("id" = String, Path, description = "Board identifier"),
        ("title" = String, Path, description = "Section title")
    ),
    request_body = TicketPayload,
    responses(
        (status = 200, description = "The section's tickets after the append", body = TicketsEnvelope),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Board Not Found or Section Not Found", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "addTicket"
)]
#[post("/boards/{id}/sections/{title}")]
pub async fn add_ticket(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    payload: web::Json<TicketPayload>,
) -> ApiResult<web::Json<TicketsEnvelope>> {
    let (board_id, section_title) = path.into_inner();
    let tickets = state
        .boards
        .add_ticket(AddTicketRequest {
            board_id,
            section_title,
            ticket: payload.into_inner().into(),
        })
        .await?;
    Ok(web::Json(TicketsEnvelope {
        tickets: tickets.iter().map(TicketResponse::from).collect(),
    }))
}

/// Remove a ticket from a section.
#[utoipa::path(
    delete,
    path = "/boards/{id}/sections/{title}/{ticketId}",
    params(
        ("id" = String, Path, description = "Board identifier"),
        ("title" = String, Path, description = "Section title"),
        ("ticketId" = String, Path, description = "Ticket identifier")
    ),
    responses(
        (status = 204, description = "Ticket removed"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Ticket Not Found", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "removeTicket"
)]
#[delete("/boards/{id}/sections/{title}/{ticket_id}")]
pub async fn remove_ticket(
    state: web::Data<HttpState>,
    path: web::Path<(String, String, String)>,
) -> ApiResult<HttpResponse> {
    let (board_id, section_title, ticket_id) = path.into_inner();
    state
        .boards
        .remove_ticket(RemoveTicketRequest {
            board_id,
            section_title,
            ticket_id,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List a user's boards.
#[utoipa::path(
    get,
    path = "/users/{username}/boards",
    params(("username" = String, Path, description = "Board owner")),
    responses(
        (status = 200, description = "Boards owned by the user", body = BoardsEnvelope),
        (status = 404, description = "User Not Found", body = ErrorSchema)
    ),
    tags = ["boards"],
    operation_id = "listUserBoards"
)]
#[get("/users/{username}/boards")]
pub async fn list_user_boards(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BoardsEnvelope>> {
    let boards = state
        .board_queries
        .list_user_boards(&path.into_inner())
        .await?;
    Ok(web::Json(BoardsEnvelope {
        boards: boards.iter().map(BoardResponse::from).collect(),
    }))
}

/// Create a board owned by the user in the path.
#[utoipa::path(
    post,
    path = "/users/{username}/boards",
    params(("username" = String, Path, description = "Board owner")),
    request_body = BoardPayload,
    responses(
        (status = 201, description = "Board created", body = BoardEnvelope),
        (status = 400, description = "Invalid board or Board Name Already Exists", body = ErrorSchema),
        (status = 404, description = "User Not Found", body = ErrorSchema)
    ),
    tags = ["boards"],
    operation_id = "createUserBoard"
)]
#[post("/users/{username}/boards")]
pub async fn create_user_board(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<BoardPayload>,
) -> ApiResult<HttpResponse> {
    let board = state
        .boards
        .create_user_board(&path.into_inner(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(BoardEnvelope::from(&board)))
}

/// Fetch a user's board by name.
#[utoipa::path(
    get,
    path = "/users/{username}/boards/{name}",
    params(
        ("username" = String, Path, description = "Board owner"),
        ("name" = String, Path, description = "Board name")
    ),
    responses(
        (status = 200, description = "Board", body = BoardEnvelope),
        (status = 404, description = "User Not Found or Board Not Found", body = ErrorSchema)
    ),
    tags = ["boards"],
    operation_id = "getUserBoard"
)]
#[get("/users/{username}/boards/{name}")]
pub async fn get_user_board(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<BoardEnvelope>> {
    let (username, name) = path.into_inner();
    let board = state
        .board_queries
        .find_user_board(&username, &name)
        .await?;
    Ok(web::Json(BoardEnvelope::from(&board)))
}

/// Append an empty section to a user's board addressed by name.
#[utoipa::path(
    post,
    path = "/users/{username}/boards/{name}/sections",
    params(
        ("username" = String, Path, description = "Board owner"),
        ("name" = String, Path, description = "Board name")
    ),
    request_body = NewSectionBody,
    responses(
        (status = 200, description = "Sections after the append", body = SectionsEnvelope),
        (status = 400, description = "Invalid input or Section Title Already Exists", body = ErrorSchema),
        (status = 404, description = "User Not Found or Board Not Found", body = ErrorSchema)
    ),
    tags = ["sections"],
    operation_id = "addUserBoardSection"
)]
#[post("/users/{username}/boards/{name}/sections")]
pub async fn add_user_board_section(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    payload: web::Json<NewSectionBody>,
) -> ApiResult<web::Json<SectionsEnvelope>> {
    let title = require(payload.into_inner().title, FieldName::new("title"))?;
    let (username, board_name) = path.into_inner();
    let sections = state
        .boards
        .add_user_board_section(UserBoardSectionRequest {
            username,
            board_name,
            title,
        })
        .await?;
    Ok(web::Json(SectionsEnvelope {
        sections: sections.iter().map(SectionResponse::from).collect(),
    }))
}

#[cfg(test)]
#[path = "boards_tests.rs"]
mod tests;
