//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod boards;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register the JSON extractor configuration and every board and user route.
///
/// Health probes and API docs are mounted separately by the server.
///
/// # Examples
/// ```
/// use actix_web::App;
///
/// let app = App::new().configure(kanban_backend::inbound::http::configure);
/// # let _ = app;
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(validation::json_error_handler))
        .service(users::create_user)
        .service(users::find_user)
        .service(boards::list_user_boards)
        .service(boards::create_user_board)
        .service(boards::get_user_board)
        .service(boards::add_user_board_section)
        .service(boards::create_board)
        .service(boards::get_board)
        .service(boards::replace_board)
        .service(boards::delete_board)
        .service(boards::add_section)
        .service(boards::remove_section)
        .service(boards::add_ticket)
        .service(boards::remove_ticket);
}
