use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState, errors::AppError, models::dto::request::LeaderboardQuery,
    services::http_helpers::success_json,
};

fn quiz_filter(query: &LeaderboardQuery) -> Option<&str> {
    query
        .quiz_id
        .as_deref()
        .filter(|id| !id.is_empty() && *id != "all")
}

#[get("/api/results")]
pub async fn latest_results(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let view = state.leaderboard_service.results_view()?;
    Ok(success_json(view, "Latest results"))
}

#[get("/api/leaderboard")]
pub async fn leaderboard(
    state: web::Data<AppState>,
    query: web::Query<LeaderboardQuery>,
) -> Result<HttpResponse, AppError> {
    let entries = state
        .leaderboard_service
        .entries(quiz_filter(&query))
        .await?;
    Ok(success_json(entries, "Leaderboard"))
}

#[get("/api/leaderboard/standings")]
pub async fn standings(
    state: web::Data<AppState>,
    query: web::Query<LeaderboardQuery>,
) -> Result<HttpResponse, AppError> {
    let rows = state
        .leaderboard_service
        .standings(quiz_filter(&query))
        .await?;
    Ok(success_json(rows, "Standings"))
}
