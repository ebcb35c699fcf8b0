use axum::Router;

use crate::state::SharedState;

pub mod admin;
pub mod docs;
pub mod health;
pub mod player;
pub mod quiz;
pub mod sse;

/// Compose all route trees and wire in the shared state.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(quiz::router())
        .merge(admin::router())
        .merge(player::router())
        .merge(docs::router());

    api_router.with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{config::AppConfig, state::AppState};

    fn app() -> Router<()> {
        router(AppState::new(AppConfig::default()))
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router<()>, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn quiz() -> Value {
        json!({
            "name": "Rivers",
            "description": "Longest rivers",
            "questions": [{
                "questionId": 1,
                "question": "Longest river?",
                "duration": 10,
                "points": 4,
                "answers": [
                    { "answerId": 1, "answer": "Nile", "colour": "red", "correct": true },
                    { "answerId": 2, "answer": "Seine", "colour": "blue", "correct": false }
                ]
            }]
        })
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let (status, body) = send(&app(), request(Method::GET, "/healthcheck", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn invalid_quiz_definition_is_rejected() {
        let mut body = quiz();
        body["questions"][0]["answers"][0]["correct"] = json!(false);

        let (status, _) = send(&app(), request(Method::PUT, "/quizzes/3", Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn lobby_flow_over_http() {
        let app = app();

        let (status, body) = send(&app, request(Method::PUT, "/quizzes/3", Some(quiz()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["numQuestions"], 1);

        let (status, body) = send(
            &app,
            request(
                Method::POST,
                "/admin/quiz/3/session/start",
                Some(json!({ "autoStartNum": 5 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let session_id = body["sessionId"].as_u64().unwrap();

        let (status, body) = send(
            &app,
            request(
                Method::POST,
                "/player/join",
                Some(json!({ "sessionId": session_id, "name": "ann" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let player_id = body["playerId"].as_u64().unwrap();

        let (status, body) = send(
            &app,
            request(Method::GET, &format!("/player/{player_id}"), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "state": "LOBBY", "numQuestions": 1, "atQuestion": 0 }));

        let (status, body) = send(
            &app,
            request(
                Method::GET,
                &format!("/admin/quiz/3/session/{session_id}"),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["players"], json!(["ann"]));
        assert_eq!(body["metadata"]["questions"][0]["answers"][0]["correct"], true);

        let (status, _) = send(
            &app,
            request(
                Method::GET,
                &format!("/admin/quiz/4/session/{session_id}"),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            request(
                Method::PUT,
                &format!("/admin/quiz/3/session/{session_id}"),
                Some(json!({ "action": "GO_TO_FINAL_RESULTS" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["message"].as_str().is_some());

        let (status, body) = send(
            &app,
            request(
                Method::PUT,
                &format!("/admin/quiz/3/session/{session_id}"),
                Some(json!({ "action": "END" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "state": "END" }));

        let (_, body) = send(&app, request(Method::GET, "/admin/quiz/3/sessions", None)).await;
        assert_eq!(
            body,
            json!({ "activeSessions": [], "inactiveSessions": [session_id] })
        );
    }

    #[tokio::test]
    async fn empty_answer_submission_is_a_bad_request() {
        let (status, _) = send(
            &app(),
            request(
                Method::PUT,
                "/player/1/question/1/answer",
                Some(json!({ "answerIds": [] })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_player_is_not_found() {
        let (status, body) = send(&app(), request(Method::GET, "/player/42/chat", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].as_str().unwrap().contains("42"));
    }
}
