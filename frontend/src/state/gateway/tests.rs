//! Regression coverage for the gateway's call lifecycle.

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{FixtureApiTransport, HttpMethod, MockApiTransport};
use crate::domain::{AccessToken, Question, QuestionId, UserId};
use crate::state::QuestionsEvent;
use crate::state::creators::post_question;
use chrono::{DateTime, TimeZone, Utc};
use futures_util::future;
use mockable::MockClock;
use rstest::rstest;
use serde_json::json;

fn receipt() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 10, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn fixed_clock() -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(receipt());
    Arc::new(clock)
}

fn store_over(transport: impl ApiTransport + 'static) -> Store {
    Store::new(Gateway::new(Arc::new(transport), fixed_clock()))
}

fn store_sharing(transport: &Arc<FixtureApiTransport>) -> Store {
    Store::new(Gateway::new(Arc::clone(transport) as _, fixed_clock()))
}

fn fetch_question(id: u64) -> CallDescriptor {
    CallDescriptor::new(
        Operation::FetchQuestion {
            id: QuestionId::new(id),
        },
        HttpMethod::Get,
        format!("/api/questions/{id}"),
    )
}

#[tokio::test]
async fn request_event_is_reduced_before_dispatch_returns() {
    let mut transport = MockApiTransport::new();
    transport.expect_send().times(1).returning(|_| {
        Ok(ApiResponse {
            status: 200,
            body: json!({ "question": { "id": 1, "user_id": "u", "content": "q", "created_at": "t" } }),
        })
    });
    let store = store_over(transport);

    let pending = store.dispatch(fetch_question(1));
    assert!(store.state().questions.is_fetching);
    assert!(store.state().questions.entities.is_empty());

    assert_eq!(pending.await, Dispatched::Succeeded);
    let state = store.state();
    let questions = &state.questions;
    assert!(!questions.is_fetching);
    assert!(questions.entities.contains_key(&QuestionId::new(1)));
    assert_eq!(questions.last_updated, Some(receipt()));
}

#[tokio::test]
async fn bearer_token_is_attached() {
    let mut transport = MockApiTransport::new();
    transport
        .expect_send()
        .withf(|request| {
            request.method == HttpMethod::Delete
                && request.path == "/api/questions/3"
                && request.headers.get("Authorization").map(String::as_str) == Some("Bearer tok")
        })
        .times(1)
        .returning(|_| {
            Ok(ApiResponse {
                status: 200,
                body: json!({ "success": true, "del_id": 3 }),
            })
        });
    let store = store_over(transport);

    let call = CallDescriptor::new(Operation::DeleteQuestion, HttpMethod::Delete, "/api/questions/3")
        .with_token(Some(&AccessToken::new("tok")));
    assert_eq!(store.dispatch(call).await, Dispatched::Succeeded);
}

#[rstest]
#[case::message(json!({ "success": false, "error": 422, "message": "content is required" }), "content is required")]
#[case::error_string(json!({ "error": "unprocessable" }), "unprocessable")]
#[case::blank_message(json!({ "message": "  ", "error": "unprocessable" }), "unprocessable")]
#[case::plain_string(json!("gateway exploded"), "gateway exploded")]
#[case::nothing(json!(null), "request failed with status 422")]
#[case::numeric_error(json!({ "error": 422 }), "request failed with status 422")]
fn error_message_prefers_server_text(#[case] body: Value, #[case] expected: &str) {
    let response = ApiResponse { status: 422, body };
    assert_eq!(error_message(&response), expected);
}

#[tokio::test]
async fn non_success_status_reduces_the_failure_event() {
    let transport = FixtureApiTransport::default();
    transport.respond_json(
        HttpMethod::Post,
        "/api/questions",
        401,
        json!({ "success": false, "error": 401, "message": "Authorization header is expected." }),
    );
    let store = store_over(transport);

    let call = CallDescriptor::new(Operation::PostQuestion, HttpMethod::Post, "/api/questions")
        .with_json_body(json!({ "content": "hi" }));
    let outcome = store.dispatch(call).await;

    let error = outcome.error().expect("call failed").clone();
    assert_eq!(error.code(), ErrorCode::Api);
    assert_eq!(error.status(), Some(401));
    let state = store.state();
    let questions = &state.questions;
    assert!(!questions.is_posting);
    assert_eq!(questions.error.as_ref(), Some(&error));
}

#[rstest]
#[case::unreachable(ApiTransportError::transport("connection refused"), ErrorCode::Transport)]
#[case::timeout(ApiTransportError::timeout("30s elapsed"), ErrorCode::Transport)]
#[case::not_json(ApiTransportError::decode("expected value"), ErrorCode::Decode)]
#[tokio::test]
async fn transport_errors_are_normalised(
    #[case] failure: ApiTransportError,
    #[case] expected: ErrorCode,
) {
    let mut transport = MockApiTransport::new();
    let message = failure.to_string();
    transport
        .expect_send()
        .times(1)
        .returning(move |_| Err(failure.clone()));
    let store = store_over(transport);

    let outcome = store.dispatch(fetch_question(2)).await;

    let error = outcome.error().expect("call failed");
    assert_eq!(error.code(), expected);
    assert_eq!(error.message(), message);
    assert!(!store.state().questions.is_fetching);
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_failure() {
    let mut transport = MockApiTransport::new();
    transport.expect_send().times(1).returning(|_| {
        Ok(ApiResponse {
            status: 200,
            body: json!({ "success": true }),
        })
    });
    let store = store_over(transport);

    let outcome = store.dispatch(fetch_question(5)).await;

    assert_eq!(outcome.error().map(SyncError::code), Some(ErrorCode::Decode));
    assert!(store.state().questions.error.is_some());
}

#[tokio::test]
async fn concurrent_calls_settle_independently() {
    let transport = FixtureApiTransport::default();
    for id in [1_u64, 2] {
        transport.respond_json(
            HttpMethod::Get,
            format!("/api/questions/{id}"),
            200,
            json!({ "question": { "id": id, "user_id": "u", "content": "q", "created_at": "t" } }),
        );
    }
    let store = store_over(transport);

    let outcomes =
        future::join_all([store.dispatch(fetch_question(1)), store.dispatch(fetch_question(2))])
            .await;

    assert!(outcomes.iter().all(|outcome| *outcome == Dispatched::Succeeded));
    assert_eq!(store.state().questions.entities.len(), 2);
}

#[tokio::test]
async fn dropped_call_is_still_sent_and_settled() {
    let transport = Arc::new(FixtureApiTransport::default());
    transport.respond_json(
        HttpMethod::Get,
        "/api/questions/6",
        200,
        json!({ "question": { "id": 6, "user_id": "u", "content": "q", "created_at": "t" } }),
    );
    let store = store_sharing(&transport);
    let mut updates = store.subscribe();

    drop(store.dispatch(fetch_question(6)));

    let state = updates
        .wait_for(|state| !state.questions.is_fetching)
        .await
        .expect("store is alive");
    assert!(state.questions.get(QuestionId::new(6)).is_some());
    assert!(state.questions.in_flight.is_empty());
    assert_eq!(transport.sent().len(), 1);
}

#[tokio::test]
async fn second_fetch_of_an_in_flight_id_is_skipped() {
    let transport = Arc::new(FixtureApiTransport::default());
    transport.respond_json(
        HttpMethod::Get,
        "/api/questions/7",
        200,
        json!({ "question": { "id": 7, "user_id": "u", "content": "q", "created_at": "t" } }),
    );
    let store = store_sharing(&transport);

    let (first, second) =
        future::join(store.dispatch(fetch_question(7)), store.dispatch(fetch_question(7))).await;

    assert_eq!(first, Dispatched::Succeeded);
    assert_eq!(second, Dispatched::Skipped);
    assert_eq!(transport.sent().len(), 1);
    assert!(!store.state().questions.is_in_flight(QuestionId::new(7)));
}

#[tokio::test]
async fn posted_question_with_minimal_payload_is_listed_first() {
    let transport = FixtureApiTransport::default();
    transport.respond_json(
        HttpMethod::Post,
        "/api/questions",
        201,
        json!({ "success": true, "created": { "id": 99, "content": "hi" } }),
    );
    let store = store_over(transport);
    store
        .dispatch(QuestionsEvent::Posted {
            question: Question::new(QuestionId::new(1), UserId::new("u"), "older", "t"),
        })
        .await;

    let pending = store.dispatch(post_question("hi", &AccessToken::new("t")));
    assert!(store.state().questions.is_posting);

    assert_eq!(pending.await, Dispatched::Succeeded);
    let state = store.state();
    let questions = &state.questions;
    assert_eq!(questions.entities.keys().next(), Some(&QuestionId::new(99)));
    assert_eq!(
        questions.get(QuestionId::new(99)).map(Question::content),
        Some("hi")
    );
    assert_eq!(questions.entities.len(), 2);
    assert!(!questions.is_posting);
}
