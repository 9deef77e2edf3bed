use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{AnswerRequest, NavigateRequest, SelectionRequest},
    services::http_helpers::{message, success_json},
};

/// Loads (or resumes) the quiz bound to the user session and starts its clock.
#[post("/api/quiz/open")]
pub async fn open_quiz(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let live = state.open_live_session().await?;
    Ok(success_json(live.view().await, "Quiz ready"))
}

#[get("/api/quiz")]
pub async fn quiz_view(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let live = state.live().await?;
    Ok(success_json(live.view().await, "Current question"))
}

#[post("/api/quiz/answer")]
pub async fn select_answer(
    state: web::Data<AppState>,
    request: web::Json<AnswerRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let view = state.live().await?.on_answer_selected(request.option).await?;
    Ok(success_json(view, "Answer recorded"))
}

#[post("/api/quiz/clear")]
pub async fn clear_answer(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let view = state.live().await?.on_clear().await?;
    Ok(success_json(view, "Response cleared"))
}

#[post("/api/quiz/mark")]
pub async fn toggle_mark(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let view = state.live().await?.on_mark().await?;
    let note = if view.marked {
        "Marked for review"
    } else {
        "Review mark removed"
    };
    Ok(success_json(view, note))
}

#[post("/api/quiz/navigate")]
pub async fn navigate(
    state: web::Data<AppState>,
    request: web::Json<NavigateRequest>,
) -> Result<HttpResponse, AppError> {
    let view = state.live().await?.on_navigate(request.into_inner()).await?;
    Ok(success_json(view, "Moved"))
}

#[post("/api/quiz/save-next")]
pub async fn save_and_next(
    state: web::Data<AppState>,
    request: web::Json<SelectionRequest>,
) -> Result<HttpResponse, AppError> {
    let view = state.live().await?.on_save_next(request.selected).await?;
    Ok(success_json(view, "Saved"))
}

#[post("/api/quiz/submit")]
pub async fn submit_quiz(
    state: web::Data<AppState>,
    request: web::Json<SelectionRequest>,
) -> Result<HttpResponse, AppError> {
    let live = state.live().await?;
    let receipt = live.on_submit(request.selected).await?;
    let note = if receipt.remote.is_synced() {
        "Quiz submitted"
    } else {
        "Quiz submitted and saved locally only"
    };
    Ok(success_json(receipt, note))
}

/// Receipt of the last submission of the running session, including one made on timeout.
#[get("/api/quiz/receipt")]
pub async fn submission_receipt(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let receipt = state
        .live()
        .await?
        .receipt()
        .await
        .ok_or_else(|| AppError::NotFound("Quiz has not been submitted".to_string()))?;
    Ok(success_json(receipt, "Submission receipt"))
}

#[get("/api/quiz/exit-guard")]
pub async fn exit_guard(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let active = match state.live().await {
        Ok(live) => live.exit_guard_active().await,
        Err(_) => false,
    };
    Ok(success_json(
        serde_json::json!({ "active": active }),
        if active {
            "Leaving now may lose unsaved progress"
        } else {
            "Safe to leave"
        },
    ))
}

#[post("/api/quiz/leave")]
pub async fn leave_quiz(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    if state.close_live_session().await? {
        Ok(message("Progress saved"))
    } else {
        Ok(message("No quiz in progress"))
    }
}
