pub mod admin_service;
pub mod catalog_service;
pub mod http_helpers;
pub mod leaderboard_service;
pub mod merge;
pub mod quiz_session;
pub mod quiz_session_service;
pub mod remote_client;
pub mod scoring;
pub mod session_runner;
pub mod sync_service;

pub use admin_service::AdminService;
pub use catalog_service::CatalogService;
pub use leaderboard_service::LeaderboardService;
pub use quiz_session::QuizSession;
pub use quiz_session_service::QuizSessionService;
pub use remote_client::{HttpQuizBackend, QuizBackend};
pub use session_runner::{LiveSession, LoggingObserver, SessionObserver};
pub use sync_service::SyncService;
