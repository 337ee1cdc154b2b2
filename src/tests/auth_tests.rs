#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::super::common::{get, post_score, send, setup, setup_with_secret, TEST_SECRET};

    fn alice() -> serde_json::Value {
        json!({ "external_id": "u1", "username": "Alice", "score": 100, "quiz_id": "q1" })
    }

    #[tokio::test]
    async fn test_webhook_accepts_matching_secret() {
        let ctx = setup_with_secret(Some(TEST_SECRET)).await;

        let (status, body) = send(&ctx.app, post_score(&alice(), Some(TEST_SECRET))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_webhook_rejects_wrong_or_missing_secret_without_writing() {
        let ctx = setup_with_secret(Some(TEST_SECRET)).await;

        let (status, body) = send(&ctx.app, post_score(&alice(), Some("nope"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "UNAUTHORIZED");

        let (status, _) = send(&ctx.app, post_score(&alice(), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, board) = send(&ctx.app, get("/leaderboard?quiz_id=q1")).await;
        assert_eq!(board["count"], 0);
    }

    #[tokio::test]
    async fn test_secret_is_not_required_when_unset() {
        let ctx = setup().await;

        let (status, _) = send(&ctx.app, post_score(&alice(), Some("anything"))).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_read_routes_ignore_the_webhook_secret() {
        let ctx = setup_with_secret(Some(TEST_SECRET)).await;

        let (status, _) = send(&ctx.app, get("/leaderboard")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&ctx.app, get("/update-score")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["endpoint"], "POST /update-score");
    }
}
