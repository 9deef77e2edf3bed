use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{CreateQuizRequest, QuestionsPayload},
    services::http_helpers::{created_json, message, success_json},
};

#[post("/api/admin/quizzes/preview")]
pub async fn preview_quiz(
    state: web::Data<AppState>,
    payload: web::Json<QuestionsPayload>,
) -> Result<HttpResponse, AppError> {
    let preview = state.admin_service.preview(&payload.questions_json)?;
    let note = format!("{} questions validated", preview.question_count);
    Ok(success_json(preview, note))
}

#[post("/api/admin/quizzes")]
pub async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let created = state.admin_service.create_quiz(request.into_inner()).await?;
    let note = if created.remote.is_synced() {
        "Quiz created"
    } else {
        "Quiz saved locally only"
    };
    Ok(created_json(created, note))
}

#[get("/api/admin/quizzes")]
pub async fn list_quizzes(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(success_json(state.admin_service.list_quizzes()?, "All quizzes"))
}

#[get("/api/admin/quizzes/{quiz_id}")]
pub async fn quiz_details(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.admin_service.quiz_details(&quiz_id)?;
    Ok(success_json(quiz, "Quiz details"))
}

#[delete("/api/admin/quizzes/{quiz_id}")]
pub async fn delete_quiz(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.admin_service.delete_quiz(&quiz_id)?;
    Ok(message("Quiz deleted"))
}

#[delete("/api/admin/quizzes")]
pub async fn delete_all_quizzes(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.admin_service.delete_all_quizzes()?;
    Ok(message("All quizzes removed"))
}

#[get("/api/admin/attempts")]
pub async fn list_attempts(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(success_json(state.admin_service.list_attempts()?, "All attempts"))
}

#[delete("/api/admin/attempts/{attempt_id}")]
pub async fn delete_attempt(
    state: web::Data<AppState>,
    attempt_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.admin_service.delete_attempt(&attempt_id)?;
    Ok(message("Attempt removed"))
}

#[delete("/api/admin/attempts")]
pub async fn delete_all_attempts(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.admin_service.delete_all_attempts()?;
    Ok(message("All attempts removed"))
}

#[get("/api/admin/stats")]
pub async fn stats(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(success_json(state.admin_service.stats()?, "Dashboard stats"))
}

#[get("/api/admin/export")]
pub async fn export_data(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let export = state.admin_service.export()?;
    let filename = format!("quiz-data-{}.json", export.exported_at.format("%Y-%m-%d"));
    Ok(HttpResponse::Ok()
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .json(export))
}

#[post("/api/admin/backup")]
pub async fn backup(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let key = state.admin_service.backup()?;
    Ok(created_json(key, "Backup created"))
}

#[post("/api/admin/clear")]
pub async fn clear_all(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.close_live_session().await?;
    state.admin_service.clear_all()?;
    Ok(message("All data removed"))
}

#[get("/api/admin/status")]
pub async fn api_status(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let status = state.admin_service.api_status().await;
    Ok(success_json(status, status.label()))
}

#[post("/api/admin/sync")]
pub async fn sync(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let report = state.admin_service.sync().await?;
    Ok(success_json(report, "Sync finished"))
}
