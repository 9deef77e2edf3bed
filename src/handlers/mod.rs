pub mod admin_handler;
pub mod catalog_handler;
pub mod results_handler;
pub mod session_handler;

use actix_web::web;

pub use catalog_handler::health_check;

/// Registers every route of the portal.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(catalog_handler::health_check)
        .service(catalog_handler::list_quizzes)
        .service(catalog_handler::quiz_dates)
        .service(catalog_handler::quiz_subjects)
        .service(catalog_handler::start_quiz)
        .service(catalog_handler::current_session)
        .service(catalog_handler::logout)
        .service(session_handler::open_quiz)
        .service(session_handler::quiz_view)
        .service(session_handler::select_answer)
        .service(session_handler::clear_answer)
        .service(session_handler::toggle_mark)
        .service(session_handler::navigate)
        .service(session_handler::save_and_next)
        .service(session_handler::submit_quiz)
        .service(session_handler::submission_receipt)
        .service(session_handler::exit_guard)
        .service(session_handler::leave_quiz)
        .service(results_handler::latest_results)
        .service(results_handler::leaderboard)
        .service(results_handler::standings)
        // preview must be registered before the {quiz_id} routes
        .service(admin_handler::preview_quiz)
        .service(admin_handler::create_quiz)
        .service(admin_handler::list_quizzes)
        .service(admin_handler::quiz_details)
        .service(admin_handler::delete_quiz)
        .service(admin_handler::delete_all_quizzes)
        .service(admin_handler::list_attempts)
        .service(admin_handler::delete_attempt)
        .service(admin_handler::delete_all_attempts)
        .service(admin_handler::stats)
        .service(admin_handler::export_data)
        .service(admin_handler::backup)
        .service(admin_handler::clear_all)
        .service(admin_handler::api_status)
        .service(admin_handler::sync);
}
