//! Tests for the board handlers.

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{memory_state, test_app};

const FIRST_ID: &str = "00000000-0000-0000-0000-000000000001";

fn sprint_board() -> Value {
    json!({
        "id": "ffffffff-ffff-ffff-ffff-ffffffffffff",
        "name": "Sprint1",
        "creator": "alice",
        "sections": [{
            "id": "eeeeeeee-eeee-eeee-eeee-eeeeeeeeeeee",
            "title": "Todo",
            "tickets": [{"name": "write docs", "priority": "high", "body": "", "done": false}]
        }],
        "completed": []
    })
}

async fn send<S, B>(app: &S, req: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

#[actix_web::test]
async fn create_board_ignores_client_identifiers() {
    let app = test::init_service(test_app(memory_state())).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(sprint_board()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let board = &body["board"];
    assert_eq!(board["id"], FIRST_ID);
    assert_eq!(board["version"], 1);
    assert_eq!(
        board["sections"][0]["id"],
        "00000000-0000-0000-0000-000000000002"
    );
    assert_eq!(
        board["sections"][0]["tickets"][0]["id"],
        "00000000-0000-0000-0000-000000000003"
    );
    assert_eq!(board["completed"], json!([]));
}

#[actix_web::test]
async fn second_board_with_same_name_is_rejected() {
    let app = test::init_service(test_app(memory_state())).await;
    let (first, _) = send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(sprint_board()),
    )
    .await;
    assert_eq!(first, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(sprint_board()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "duplicate");
    assert_eq!(body["msg"], "Board Name Already Exists");
}

#[rstest]
#[case::get(test::TestRequest::get().uri("/boards/not-an-id"))]
#[case::delete(test::TestRequest::delete().uri("/boards/not-an-id"))]
#[case::remove_section(test::TestRequest::delete().uri("/boards/not-an-id/sections/Todo"))]
#[case::add_section(
    test::TestRequest::post()
        .uri("/boards/not-an-id/sections")
        .set_json(json!({"title": "Backlog"}))
)]
#[actix_web::test]
async fn malformed_board_id_is_a_bad_request(#[case] request: test::TestRequest) {
    let app = test::init_service(test_app(memory_state())).await;

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "boardId");
}

#[actix_web::test]
async fn added_section_is_visible_on_the_board() {
    let app = test::init_service(test_app(memory_state())).await;
    send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(sprint_board()),
    )
    .await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/boards/{FIRST_ID}/sections"))
            .set_json(json!({"title": "Backlog"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["sections"]
        .as_array()
        .expect("sections array")
        .iter()
        .filter_map(|section| section["title"].as_str())
        .collect();
    assert_eq!(titles, ["Todo", "Backlog"]);

    let (_, fetched) = send(
        &app,
        test::TestRequest::get().uri(&format!("/boards/{FIRST_ID}")),
    )
    .await;
    assert_eq!(fetched["board"]["version"], 2);
    assert_eq!(fetched["board"]["sections"][1]["title"], "Backlog");
    assert_eq!(fetched["board"]["sections"][1]["tickets"], json!([]));
}

#[actix_web::test]
async fn section_without_title_is_rejected() {
    let app = test::init_service(test_app(memory_state())).await;
    send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(sprint_board()),
    )
    .await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/boards/{FIRST_ID}/sections"))
            .set_json(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "title");
    assert_eq!(body["details"]["code"], "missing_field");
}

#[actix_web::test]
async fn duplicate_section_title_is_rejected() {
    let app = test::init_service(test_app(memory_state())).await;
    send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(sprint_board()),
    )
    .await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/boards/{FIRST_ID}/sections"))
            .set_json(json!({"title": "Todo"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Section Title Already Exists");
}

#[actix_web::test]
async fn removing_missing_section_is_not_found() {
    let app = test::init_service(test_app(memory_state())).await;
    send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(sprint_board()),
    )
    .await;

    let (status, body) = send(
        &app,
        test::TestRequest::delete().uri(&format!("/boards/{FIRST_ID}/sections/Nope")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Section Not Found");
}

#[actix_web::test]
async fn ticket_added_then_removed_restores_the_section() {
    let app = test::init_service(test_app(memory_state())).await;
    send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(sprint_board()),
    )
    .await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/boards/{FIRST_ID}/sections/Todo"))
            .set_json(json!({"name": "review", "priority": "low", "body": "pr", "done": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let tickets = body["tickets"].as_array().expect("tickets array");
    assert_eq!(tickets.len(), 2);
    let ticket_id = tickets[1]["id"].as_str().expect("ticket id").to_owned();

    let (removed, _) = send(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/boards/{FIRST_ID}/sections/Todo/{ticket_id}")),
    )
    .await;
    assert_eq!(removed, StatusCode::NO_CONTENT);

    let (_, fetched) = send(
        &app,
        test::TestRequest::get().uri(&format!("/boards/{FIRST_ID}")),
    )
    .await;
    let remaining = fetched["board"]["sections"][0]["tickets"]
        .as_array()
        .expect("tickets array");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["name"], "write docs");
}

#[actix_web::test]
async fn ticket_for_missing_section_is_not_found() {
    let app = test::init_service(test_app(memory_state())).await;
    send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(sprint_board()),
    )
    .await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/boards/{FIRST_ID}/sections/Nope"))
            .set_json(json!({"name": "orphan"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Section Not Found");
}

#[actix_web::test]
async fn stale_replace_conflicts_and_leaves_board_unchanged() {
    let app = test::init_service(test_app(memory_state())).await;
    send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(sprint_board()),
    )
    .await;
    send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/boards/{FIRST_ID}/sections"))
            .set_json(json!({"title": "Backlog"})),
    )
    .await;

    let mut stale = sprint_board();
    stale["name"] = json!("Renamed");
    stale["version"] = json!(1);
    let (status, body) = send(
        &app,
        test::TestRequest::put()
            .uri(&format!("/boards/{FIRST_ID}"))
            .set_json(stale),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["msg"], "Board Was Modified");
    let (_, fetched) = send(
        &app,
        test::TestRequest::get().uri(&format!("/boards/{FIRST_ID}")),
    )
    .await;
    assert_eq!(fetched["board"]["name"], "Sprint1");
    assert_eq!(fetched["board"]["version"], 2);
}

#[actix_web::test]
async fn current_replace_bumps_version() {
    let app = test::init_service(test_app(memory_state())).await;
    send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(sprint_board()),
    )
    .await;

    let mut fresh = sprint_board();
    fresh["name"] = json!("Renamed");
    fresh["version"] = json!(1);
    let (status, body) = send(
        &app,
        test::TestRequest::put()
            .uri(&format!("/boards/{FIRST_ID}"))
            .set_json(fresh),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["board"]["id"], FIRST_ID);
    assert_eq!(body["board"]["name"], "Renamed");
    assert_eq!(body["board"]["version"], 2);
}

#[actix_web::test]
async fn replace_restamps_identifiers_taken_from_another_board() {
    let app = test::init_service(test_app(memory_state())).await;
    let (_, first) = send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(sprint_board()),
    )
    .await;
    let mut other = sprint_board();
    other["name"] = json!("Sprint2");
    let (_, second) = send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(other),
    )
    .await;
    let second_id = second["board"]["id"].as_str().expect("board id").to_owned();
    let foreign_section = first["board"]["sections"][0]["id"].clone();
    let foreign_ticket = first["board"]["sections"][0]["tickets"][0]["id"].clone();

    let mut hijack = second["board"].clone();
    hijack["sections"][0]["id"] = foreign_section.clone();
    hijack["sections"][0]["tickets"][0]["id"] = foreign_ticket.clone();
    hijack["completed"] = json!([{"id": foreign_ticket, "name": "copied", "done": true}]);
    let (status, body) = send(
        &app,
        test::TestRequest::put()
            .uri(&format!("/boards/{second_id}"))
            .set_json(hijack),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let replaced = &body["board"];
    let section_id = &replaced["sections"][0]["id"];
    let ticket_id = &replaced["sections"][0]["tickets"][0]["id"];
    let completed_id = &replaced["completed"][0]["id"];
    assert_ne!(section_id, &foreign_section);
    assert_ne!(ticket_id, &foreign_ticket);
    assert_ne!(completed_id, &foreign_ticket);
    assert_ne!(ticket_id, completed_id);
    assert_ne!(section_id, &second["board"]["sections"][0]["id"]);

    let (_, untouched) = send(
        &app,
        test::TestRequest::get().uri(&format!("/boards/{FIRST_ID}")),
    )
    .await;
    assert_eq!(untouched["board"], first["board"]);
}

#[actix_web::test]
async fn replace_without_version_is_rejected() {
    let app = test::init_service(test_app(memory_state())).await;
    send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(sprint_board()),
    )
    .await;

    let (status, body) = send(
        &app,
        test::TestRequest::put()
            .uri(&format!("/boards/{FIRST_ID}"))
            .set_json(sprint_board()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "version");
}

#[actix_web::test]
async fn delete_removes_the_board() {
    let app = test::init_service(test_app(memory_state())).await;
    send(
        &app,
        test::TestRequest::post().uri("/boards").set_json(sprint_board()),
    )
    .await;

    let (deleted, _) = send(
        &app,
        test::TestRequest::delete().uri(&format!("/boards/{FIRST_ID}")),
    )
    .await;
    let (again, body) = send(
        &app,
        test::TestRequest::delete().uri(&format!("/boards/{FIRST_ID}")),
    )
    .await;

    assert_eq!(deleted, StatusCode::NO_CONTENT);
    assert_eq!(again, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Board Not Found");
}

#[actix_web::test]
async fn user_boards_require_a_registered_user() {
    let app = test::init_service(test_app(memory_state())).await;

    let (listed, list_body) = send(&app, test::TestRequest::get().uri("/users/ghost/boards")).await;
    let (created, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/users/ghost/boards")
            .set_json(sprint_board()),
    )
    .await;

    assert_eq!(listed, StatusCode::NOT_FOUND);
    assert_eq!(list_body["msg"], "User Not Found");
    assert_eq!(created, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn user_board_creator_comes_from_the_path() {
    let app = test::init_service(test_app(memory_state())).await;
    send(
        &app,
        test::TestRequest::post()
            .uri("/users")
            .set_json(json!({"username": "Bob"})),
    )
    .await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/users/BOB/boards")
            .set_json(sprint_board()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["board"]["creator"], "bob");

    let (_, listed) = send(&app, test::TestRequest::get().uri("/users/bob/boards")).await;
    assert_eq!(listed["boards"].as_array().map(Vec::len), Some(1));

    let (found, named) = send(
        &app,
        test::TestRequest::get().uri("/users/bob/boards/Sprint1"),
    )
    .await;
    assert_eq!(found, StatusCode::OK);
    assert_eq!(named["board"]["name"], "Sprint1");

    let (missing, _) = send(
        &app,
        test::TestRequest::get().uri("/users/bob/boards/Other"),
    )
    .await;
    assert_eq!(missing, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn section_added_to_user_board_by_name() {
    let app = test::init_service(test_app(memory_state())).await;
    send(
        &app,
        test::TestRequest::post()
            .uri("/users")
            .set_json(json!({"username": "Cara"})),
    )
    .await;
    send(
        &app,
        test::TestRequest::post()
            .uri("/users/cara/boards")
            .set_json(sprint_board()),
    )
    .await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/users/CARA/boards/Sprint1/sections")
            .set_json(json!({"title": "Backlog"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["sections"]
        .as_array()
        .expect("sections")
        .iter()
        .filter_map(|section| section["title"].as_str())
        .collect();
    assert_eq!(titles, ["Todo", "Backlog"]);
    assert_eq!(body["sections"][1]["tickets"], json!([]));

    let (_, fetched) = send(
        &app,
        test::TestRequest::get().uri("/users/cara/boards/Sprint1"),
    )
    .await;
    assert_eq!(fetched["board"]["version"], 2);
    assert_eq!(fetched["board"]["sections"][1]["title"], "Backlog");

    let (duplicate, duplicate_body) = send(
        &app,
        test::TestRequest::post()
            .uri("/users/cara/boards/Sprint1/sections")
            .set_json(json!({"title": "Backlog"})),
    )
    .await;
    assert_eq!(duplicate, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate_body["msg"], "Section Title Already Exists");

    let (missing_board, missing_body) = send(
        &app,
        test::TestRequest::post()
            .uri("/users/cara/boards/Other/sections")
            .set_json(json!({"title": "Backlog"})),
    )
    .await;
    assert_eq!(missing_board, StatusCode::NOT_FOUND);
    assert_eq!(missing_body["msg"], "Board Not Found");

    let (missing_user, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/users/ghost/boards/Sprint1/sections")
            .set_json(json!({"title": "Backlog"})),
    )
    .await;
    assert_eq!(missing_user, StatusCode::NOT_FOUND);

    let (untitled, untitled_body) = send(
        &app,
        test::TestRequest::post()
            .uri("/users/cara/boards/Sprint1/sections")
            .set_json(json!({})),
    )
    .await;
    assert_eq!(untitled, StatusCode::BAD_REQUEST);
    assert_eq!(untitled_body["details"]["field"], "title");
}

#[actix_web::test]
async fn malformed_json_is_an_invalid_request() {
    let app = test::init_service(test_app(memory_state())).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/boards")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "invalid_json");
}
