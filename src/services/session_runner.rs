use std::{
    sync::{Arc, Mutex as StdMutex, Weak},
    time::Duration,
};

use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    errors::{AppError, AppResult},
    models::dto::{request::NavigateRequest, response::SubmissionReceipt},
    services::{
        quiz_session::{QuizSession, SessionView, TickOutcome},
        quiz_session_service::QuizSessionService,
    },
};

const TICK: Duration = Duration::from_secs(1);

/// Hooks for whatever presents a running session.
pub trait SessionObserver: Send + Sync {
    fn on_time_warning(&self, _remaining: i64) {}
    fn on_time_expired(&self) {}
    fn on_submitted(&self, _receipt: &SubmissionReceipt) {}
    fn on_autosave_failed(&self, _error: &AppError) {}
}

/// Observer for headless hosts: everything goes to the log.
pub struct LoggingObserver;

impl SessionObserver for LoggingObserver {
    fn on_time_warning(&self, remaining: i64) {
        log::warn!("Only {} seconds remaining", remaining);
    }

    fn on_time_expired(&self) {
        log::warn!("Time is up; submitting automatically");
    }

    fn on_submitted(&self, receipt: &SubmissionReceipt) {
        log::info!(
            "Quiz {} submitted: {}/{}",
            receipt.results.quiz_id,
            receipt.results.score,
            receipt.results.total
        );
    }

    fn on_autosave_failed(&self, error: &AppError) {
        log::error!("Autosave failed: {}", error);
    }
}

struct Core {
    session: Mutex<QuizSession>,
    service: Arc<QuizSessionService>,
    observer: Arc<dyn SessionObserver>,
    autosave_every: Duration,
    tasks: StdMutex<Vec<JoinHandle<()>>>,
    receipt: Mutex<Option<SubmissionReceipt>>,
}

impl Core {
    fn spawn_tasks(self: &Arc<Self>) {
        let countdown = tokio::spawn(countdown(Arc::downgrade(self)));
        let autosave = tokio::spawn(autosave(Arc::downgrade(self), self.autosave_every));
        self.tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend([countdown, autosave]);
    }

    fn stop_tasks(&self) {
        let mut tasks = self
            .tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for task in tasks.drain(..) {
            task.abort();
        }
    }

    async fn submit(self: &Arc<Self>, visible: Option<u8>) -> AppResult<SubmissionReceipt> {
        let draft = self.session.lock().await.begin_submit(visible)?;
        self.stop_tasks();

        match self.service.record_submission(draft).await {
            Ok(receipt) => {
                self.session.lock().await.complete_submit();
                *self.receipt.lock().await = Some(receipt.clone());
                self.observer.on_submitted(&receipt);
                Ok(receipt)
            }
            Err(err) => {
                log::error!("Submission could not be saved: {}", err);
                self.session.lock().await.abort_submit();
                self.spawn_tasks();
                Err(err)
            }
        }
    }
}

impl Drop for Core {
    fn drop(&mut self) {
        self.stop_tasks();
    }
}

async fn countdown(core: Weak<Core>) {
    let mut interval = tokio::time::interval(TICK);
    interval.tick().await;

    loop {
        interval.tick().await;
        let Some(core) = core.upgrade() else {
            return;
        };

        let (outcome, remaining) = {
            let mut session = core.session.lock().await;
            let outcome = session.tick();
            (outcome, session.time_remaining())
        };

        match outcome {
            TickOutcome::Running => {}
            TickOutcome::Warning => core.observer.on_time_warning(remaining),
            TickOutcome::Expired => {
                core.observer.on_time_expired();
                // Submission stops this task, so it runs on its own.
                tokio::spawn(async move {
                    if let Err(err) = core.submit(None).await {
                        log::error!("Automatic submission failed: {}", err);
                    }
                });
                return;
            }
            TickOutcome::Idle => return,
        }
    }
}

async fn autosave(core: Weak<Core>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    interval.tick().await;

    loop {
        interval.tick().await;
        let Some(core) = core.upgrade() else {
            return;
        };

        let session = core.session.lock().await;
        if !session.is_active() {
            return;
        }
        match core.service.save_state(&session) {
            Ok(()) => log::debug!("Autosaved quiz {}", session.quiz().quiz_id),
            Err(err) => core.observer.on_autosave_failed(&err),
        }
    }
}

/// A session with its countdown and autosave running. Both tasks stop when the
/// session is submitted or left.
pub struct LiveSession {
    core: Arc<Core>,
}

impl LiveSession {
    /// Must be called from within a tokio runtime.
    pub fn start(
        session: QuizSession,
        service: Arc<QuizSessionService>,
        observer: Arc<dyn SessionObserver>,
        autosave_every: Duration,
    ) -> Self {
        let core = Arc::new(Core {
            session: Mutex::new(session),
            service,
            observer,
            autosave_every,
            tasks: StdMutex::new(Vec::new()),
            receipt: Mutex::new(None),
        });
        core.spawn_tasks();
        Self { core }
    }

    pub async fn quiz_id(&self) -> String {
        self.core.session.lock().await.quiz().quiz_id.clone()
    }

    pub async fn view(&self) -> SessionView {
        self.core.session.lock().await.view()
    }

    pub async fn exit_guard_active(&self) -> bool {
        self.core.session.lock().await.exit_guard_active()
    }

    /// Receipt of the submission, whether manual or on timeout.
    pub async fn receipt(&self) -> Option<SubmissionReceipt> {
        self.core.receipt.lock().await.clone()
    }

    pub async fn on_answer_selected(&self, option: u8) -> AppResult<SessionView> {
        let mut session = self.core.session.lock().await;
        session.select_option(option)?;
        Ok(session.view())
    }

    pub async fn on_navigate(&self, to: NavigateRequest) -> AppResult<SessionView> {
        let mut session = self.core.session.lock().await;
        match to {
            NavigateRequest::Next => session.next()?,
            NavigateRequest::Prev => session.prev()?,
            NavigateRequest::Question(index) => session.go_to(index)?,
        };
        Ok(session.view())
    }

    pub async fn on_mark(&self) -> AppResult<SessionView> {
        let mut session = self.core.session.lock().await;
        session.toggle_mark()?;
        Ok(session.view())
    }

    pub async fn on_clear(&self) -> AppResult<SessionView> {
        let mut session = self.core.session.lock().await;
        session.clear_response()?;
        Ok(session.view())
    }

    pub async fn on_save_next(&self, visible: Option<u8>) -> AppResult<SessionView> {
        let mut session = self.core.session.lock().await;
        session.save_and_next(visible)?;
        Ok(session.view())
    }

    pub async fn on_submit(&self, visible: Option<u8>) -> AppResult<SubmissionReceipt> {
        self.core.submit(visible).await
    }

    /// Stops the timers and, if the quiz is still open, saves where the user left off.
    pub async fn leave(&self) -> AppResult<()> {
        self.core.stop_tasks();
        let session = self.core.session.lock().await;
        if session.is_active() {
            self.core.service.save_state(&session)?;
            log::info!(
                "Left quiz {} with {}s remaining",
                session.quiz().quiz_id,
                session.time_remaining()
            );
        }
        Ok(())
    }
}
