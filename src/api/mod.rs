pub mod attendance;
pub mod department;
pub mod event;
pub mod member;
pub mod notification;
pub mod report;
pub mod zone;

use crate::config::Config;
use actix_web::HttpResponse;
use serde_json::json;

/// Uniform 500 envelope: `{error, details?}`, details only outside production.
pub(crate) fn server_error(config: &Config, error: &str, details: String) -> HttpResponse {
    let mut body = json!({ "error": error });
    if config.expose_error_details() {
        body["details"] = json!(details);
    }
    HttpResponse::InternalServerError().json(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    fn config_for(app_env: &str) -> Config {
        Config {
            database_url: "mysql://unused".to_string(),
            jwt_secret: "unused".to_string(),
            server_addr: "127.0.0.1:0".to_string(),
            access_token_ttl: 900,
            refresh_token_ttl: 604_800,
            rate_login_per_min: 60,
            rate_register_per_min: 30,
            rate_refresh_per_min: 30,
            rate_protected_per_min: 1000,
            api_prefix: "/api".to_string(),
            app_env: app_env.to_string(),
        }
    }

    async fn body_json(resp: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn error_envelope_carries_details_outside_production() {
        let resp = server_error(&config_for("development"), "Check-in failed", "db gone".into());
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Check-in failed");
        assert_eq!(body["details"], "db gone");
    }

    #[actix_web::test]
    async fn error_envelope_hides_details_in_production() {
        let resp = server_error(&config_for("production"), "Check-in failed", "db gone".into());
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Check-in failed");
        assert!(body.get("details").is_none());
    }
}
