//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case::invalid(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case::duplicate(Error::duplicate("Board Name Already Exists"), StatusCode::BAD_REQUEST)]
#[case::not_found(Error::not_found("Board Not Found"), StatusCode::NOT_FOUND)]
#[case::conflict(Error::conflict("Board Was Modified"), StatusCode::CONFLICT)]
#[case::unavailable(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case::internal(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn response_parts(error: Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(&error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error body is JSON");
    (status, header, body)
}

#[rstest]
#[case::internal(Error::internal("pool exhausted at db-01"), "Internal server error")]
#[case::unavailable(
    Error::service_unavailable("connection refused by db-01"),
    "Service unavailable"
)]
#[actix_web::test]
async fn server_errors_are_redacted(
    #[case] error: Error,
    #[case] generic: &str,
    expected_trace_id: String,
) {
    let error = error
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"host": "db-01"}));

    let (_, header, body) = response_parts(error).await;

    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(body["msg"], json!(generic));
    assert_eq!(body["traceId"], json!(expected_trace_id));
    assert!(body.get("details").is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::conflict("Board Was Modified")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"expectedVersion": 1, "actualVersion": 2}));

    let (status, _, body) = response_parts(error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!({
            "code": "conflict",
            "msg": "Board Was Modified",
            "traceId": TRACE_ID,
            "details": {"expectedVersion": 1, "actualVersion": 2},
        })
    );
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::duplicate("Board Name Already Exists");

    let (status, header, body) = response_parts(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(header.is_none());
    assert_eq!(body, json!({"code": "duplicate", "msg": "Board Name Already Exists"}));
}
