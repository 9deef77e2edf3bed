use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{DashboardQuery, StartQuizRequest},
    services::http_helpers::{created_json, message, success_json},
};

#[get("/api/quizzes")]
pub async fn list_quizzes(
    state: web::Data<AppState>,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, AppError> {
    let entries = state.catalog_service.dashboard(&query.into_inner())?;
    let count = entries.len();
    Ok(success_json(entries, format!("{} quizzes", count)))
}

#[get("/api/quizzes/dates")]
pub async fn quiz_dates(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(success_json(state.catalog_service.available_dates()?, "Available dates"))
}

#[get("/api/quizzes/subjects")]
pub async fn quiz_subjects(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(success_json(state.catalog_service.subjects()?, "Available subjects"))
}

/// Binds the user to a quiz. A 409 means an earlier attempt exists and the
/// request must be repeated with `confirmRetake`.
#[post("/api/session/start")]
pub async fn start_quiz(
    state: web::Data<AppState>,
    request: web::Json<StartQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let session = state.catalog_service.start_quiz(request.into_inner())?;
    Ok(created_json(session, "Quiz selected"))
}

#[get("/api/session")]
pub async fn current_session(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let session = state
        .catalog_service
        .current_session()?
        .ok_or_else(|| AppError::NotFound("No user session".to_string()))?;
    Ok(success_json(session, "Current session"))
}

#[post("/api/session/logout")]
pub async fn logout(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.close_live_session().await?;
    state.catalog_service.logout()?;
    Ok(message("Logged out"))
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "quiz-portal"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, App};

    use crate::{
        config::Config,
        db::LocalStore,
        repositories::{LocalQuizRepository, QuizRepository},
        services::remote_client::MockQuizBackend,
        test_utils::fixtures::quiz_with_questions,
    };

    fn state_with_quiz() -> (AppState, String) {
        let store = LocalStore::in_memory();
        let quiz = LocalQuizRepository::new(&store)
            .insert(quiz_with_questions("2025-01-01", "English", 2))
            .unwrap();
        let state = AppState::with_parts(
            store,
            Arc::new(MockQuizBackend::new()),
            Config::test_config(),
        );
        (state, quiz.quiz_id)
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().service(health_check)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_start_then_read_session() {
        let (state, quiz_id) = state_with_quiz();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(start_quiz)
                .service(current_session)
                .service(list_quizzes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/session/start")
            .set_json(serde_json::json!({
                "userName": "Asha Rao",
                "email": "asha@example.com",
                "quizId": quiz_id
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/api/session").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["currentQuizId"], quiz_id);

        let req = test::TestRequest::get()
            .uri("/api/quizzes?status=pending")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["action"], "start");
    }

    #[actix_web::test]
    async fn test_start_with_bad_email_is_rejected() {
        let (state, quiz_id) = state_with_quiz();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(start_quiz),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/session/start")
            .set_json(serde_json::json!({
                "userName": "Asha Rao",
                "email": "nope",
                "quizId": quiz_id
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_missing_session_is_not_found() {
        let (state, _) = state_with_quiz();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(current_session),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/session").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
