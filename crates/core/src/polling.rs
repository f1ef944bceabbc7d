//! Post-login readiness poll
//!
//! After OAuth the backend analyses the user's repositories in the
//! background. The controller checks the filtered-data endpoint once per
//! interval until it answers 200, then loads the dashboard data once.
//! Whatever happens (success, timeout, network error) it ends with exactly
//! one load attempt, unless it was cancelled.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::ResponseClass;
use crate::config::PollingConfig;
use crate::error::Result;

pub const FETCHING_MESSAGE: &str = "Fetching your GitHub repositories...";
pub const ANALYZING_MESSAGE: &str = "Analyzing your code and commit history...";
pub const BUILDING_MESSAGE: &str = "Building your developer profile...";
pub const COMPLETE_MESSAGE: &str = "Analysis complete! Loading your dashboard...";
pub const TIMEOUT_MESSAGE: &str = "This is taking longer than usual. Loading what's available...";
pub const ERROR_MESSAGE: &str = "Couldn't reach the server. Loading what's available...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    #[default]
    Idle,
    Polling,
    Complete,
    Timeout,
    Error,
    Cancelled,
}

impl PollState {
    pub fn is_running(&self) -> bool {
        matches!(self, PollState::Polling)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Complete { attempts: u32 },
    Timeout { attempts: u32 },
    Error { message: String },
    Cancelled,
}

/// Backend calls the controller needs
#[async_trait(?Send)]
pub trait DataSource {
    /// One readiness check. `Err` means the request itself failed.
    async fn check_ready(&self) -> Result<ResponseClass>;

    /// Load the dashboard data. Failures are handled by the implementation.
    async fn fetch_user_data(&self);
}

/// Timer used between attempts
#[async_trait(?Send)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// Progress message to show when reaching `attempt`, if it changes there
pub fn stage_message(attempt: u32, config: &PollingConfig) -> Option<&'static str> {
    if attempt == 0 {
        Some(FETCHING_MESSAGE)
    } else if attempt == config.analyzing_after {
        Some(ANALYZING_MESSAGE)
    } else if attempt == config.building_after {
        Some(BUILDING_MESSAGE)
    } else {
        None
    }
}

pub struct PollingController<D: DataSource, S: Sleeper> {
    source: D,
    sleeper: S,
    config: PollingConfig,
    cancel: CancellationToken,
    state: PollState,
}

impl<D: DataSource, S: Sleeper> PollingController<D, S> {
    pub fn new(source: D, sleeper: S, config: PollingConfig, cancel: CancellationToken) -> Self {
        Self {
            source,
            sleeper,
            config,
            cancel,
            state: PollState::Idle,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn source(&self) -> &D {
        &self.source
    }

    /// Run the poll to the end. `on_progress` receives every state change and
    /// user-facing message.
    pub async fn run(&mut self, mut on_progress: impl FnMut(PollState, &str)) -> PollOutcome {
        self.state = PollState::Polling;
        let max_attempts = self.config.max_attempts;

        for attempt in 0..max_attempts {
            if self.cancel.is_cancelled() {
                return self.cancelled();
            }
            if let Some(message) = stage_message(attempt, &self.config) {
                on_progress(PollState::Polling, message);
            }

            match self.source.check_ready().await {
                Ok(ResponseClass::Ready) => {
                    if self.cancel.is_cancelled() {
                        return self.cancelled();
                    }
                    info!("Data ready after {} attempt(s)", attempt + 1);
                    self.state = PollState::Complete;
                    on_progress(PollState::Complete, COMPLETE_MESSAGE);
                    self.source.fetch_user_data().await;
                    return PollOutcome::Complete { attempts: attempt + 1 };
                }
                Ok(class) => {
                    debug!("Attempt {}: not ready ({:?})", attempt + 1, class);
                }
                Err(e) => {
                    warn!("Readiness check failed: {}", e);
                    if self.cancel.is_cancelled() {
                        return self.cancelled();
                    }
                    self.state = PollState::Error;
                    on_progress(PollState::Error, ERROR_MESSAGE);
                    self.sleeper.sleep(self.config.error_delay()).await;
                    if self.cancel.is_cancelled() {
                        return self.cancelled();
                    }
                    self.source.fetch_user_data().await;
                    return PollOutcome::Error { message: e.to_string() };
                }
            }

            if attempt + 1 < max_attempts {
                self.sleeper.sleep(self.config.interval()).await;
            }
        }

        if self.cancel.is_cancelled() {
            return self.cancelled();
        }
        warn!("Data still not ready after {} attempts", max_attempts);
        self.state = PollState::Timeout;
        on_progress(PollState::Timeout, TIMEOUT_MESSAGE);
        self.source.fetch_user_data().await;
        PollOutcome::Timeout { attempts: max_attempts }
    }

    fn cancelled(&mut self) -> PollOutcome {
        debug!("Polling cancelled");
        self.state = PollState::Cancelled;
        PollOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DivergenceError;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    /// Replays scripted check results; repeats 404 once the script runs out
    struct ScriptedSource {
        script: RefCell<VecDeque<Result<ResponseClass>>>,
        checks: Cell<u32>,
        fetches: Cell<u32>,
        cancel_on_check: Option<(u32, CancellationToken)>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<ResponseClass>>) -> Self {
            Self {
                script: RefCell::new(script.into()),
                checks: Cell::new(0),
                fetches: Cell::new(0),
                cancel_on_check: None,
            }
        }
    }

    #[async_trait(?Send)]
    impl DataSource for ScriptedSource {
        async fn check_ready(&self) -> Result<ResponseClass> {
            self.checks.set(self.checks.get() + 1);
            if let Some((n, token)) = &self.cancel_on_check {
                if self.checks.get() == *n {
                    token.cancel();
                }
            }
            self.script
                .borrow_mut()
                .pop_front()
                .unwrap_or(Ok(ResponseClass::NotReady))
        }

        async fn fetch_user_data(&self) {
            self.fetches.set(self.fetches.get() + 1);
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        slept: RefCell<Vec<Duration>>,
    }

    #[async_trait(?Send)]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.slept.borrow_mut().push(duration);
        }
    }

    fn controller(source: ScriptedSource, cancel: CancellationToken) -> PollingController<ScriptedSource, RecordingSleeper> {
        PollingController::new(source, RecordingSleeper::default(), PollingConfig::default(), cancel)
    }

    #[tokio::test]
    async fn completes_on_fifth_check() {
        let source = ScriptedSource::new(vec![
            Ok(ResponseClass::NotReady),
            Ok(ResponseClass::NotReady),
            Ok(ResponseClass::NotReady),
            Ok(ResponseClass::NotReady),
            Ok(ResponseClass::Ready),
        ]);
        let mut poll = controller(source, CancellationToken::new());
        let mut messages = Vec::new();

        let outcome = poll.run(|_, msg| messages.push(msg.to_string())).await;

        assert_eq!(outcome, PollOutcome::Complete { attempts: 5 });
        assert_eq!(poll.state(), PollState::Complete);
        assert_eq!(poll.source().checks.get(), 5);
        assert_eq!(poll.source().fetches.get(), 1);
        assert_eq!(messages, vec![FETCHING_MESSAGE, COMPLETE_MESSAGE]);
        assert_eq!(poll.sleeper.slept.borrow().len(), 4);
    }

    #[tokio::test]
    async fn other_statuses_keep_polling() {
        let source = ScriptedSource::new(vec![
            Ok(ResponseClass::Unauthorized),
            Ok(ResponseClass::Other(500)),
            Ok(ResponseClass::Ready),
        ]);
        let mut poll = controller(source, CancellationToken::new());
        let outcome = poll.run(|_, _| {}).await;
        assert_eq!(outcome, PollOutcome::Complete { attempts: 3 });
    }

    #[tokio::test]
    async fn times_out_after_thirty_attempts_and_still_loads() {
        let mut poll = controller(ScriptedSource::new(vec![]), CancellationToken::new());
        let mut messages = Vec::new();

        let outcome = poll.run(|state, msg| messages.push((state, msg.to_string()))).await;

        assert_eq!(outcome, PollOutcome::Timeout { attempts: 30 });
        assert_eq!(poll.source().checks.get(), 30);
        assert_eq!(poll.source().fetches.get(), 1);
        assert_eq!(poll.sleeper.slept.borrow().len(), 29);
        let texts: Vec<&str> = messages.iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(
            texts,
            vec![FETCHING_MESSAGE, ANALYZING_MESSAGE, BUILDING_MESSAGE, TIMEOUT_MESSAGE]
        );
        assert_eq!(messages.last().map(|(s, _)| *s), Some(PollState::Timeout));
    }

    #[tokio::test]
    async fn network_error_waits_then_loads() {
        let source = ScriptedSource::new(vec![
            Ok(ResponseClass::NotReady),
            Err(DivergenceError::Network("connection refused".to_string())),
        ]);
        let mut poll = controller(source, CancellationToken::new());

        let outcome = poll.run(|_, _| {}).await;

        assert!(matches!(outcome, PollOutcome::Error { .. }));
        assert_eq!(poll.state(), PollState::Error);
        assert_eq!(poll.source().checks.get(), 2);
        assert_eq!(poll.source().fetches.get(), 1);
        assert_eq!(
            *poll.sleeper.slept.borrow(),
            vec![Duration::from_secs(1), Duration::from_millis(1500)]
        );
    }

    #[tokio::test]
    async fn cancelled_before_start_does_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut poll = controller(ScriptedSource::new(vec![]), cancel);

        assert_eq!(poll.run(|_, _| {}).await, PollOutcome::Cancelled);
        assert_eq!(poll.source().checks.get(), 0);
        assert_eq!(poll.source().fetches.get(), 0);
    }

    #[tokio::test]
    async fn cancel_mid_poll_stops_before_next_attempt() {
        let cancel = CancellationToken::new();
        let mut source = ScriptedSource::new(vec![]);
        source.cancel_on_check = Some((3, cancel.clone()));
        let mut poll = controller(source, cancel);

        assert_eq!(poll.run(|_, _| {}).await, PollOutcome::Cancelled);
        assert_eq!(poll.state(), PollState::Cancelled);
        assert_eq!(poll.source().checks.get(), 3);
        assert_eq!(poll.source().fetches.get(), 0);
    }

    #[tokio::test]
    async fn cancel_during_ready_check_reports_nothing() {
        let cancel = CancellationToken::new();
        let mut source = ScriptedSource::new(vec![Ok(ResponseClass::NotReady), Ok(ResponseClass::Ready)]);
        source.cancel_on_check = Some((2, cancel.clone()));
        let mut poll = controller(source, cancel);
        let mut states = Vec::new();

        let outcome = poll.run(|state, msg| states.push((state, msg.to_string()))).await;

        assert_eq!(outcome, PollOutcome::Cancelled);
        assert_eq!(states, vec![(PollState::Polling, FETCHING_MESSAGE.to_string())]);
        assert_eq!(poll.source().fetches.get(), 0);
    }

    #[tokio::test]
    async fn cancel_during_failed_check_skips_error_notice() {
        let cancel = CancellationToken::new();
        let mut source = ScriptedSource::new(vec![Err(DivergenceError::Network("reset".to_string()))]);
        source.cancel_on_check = Some((1, cancel.clone()));
        let mut poll = controller(source, cancel);
        let mut states = Vec::new();

        assert_eq!(poll.run(|state, _| states.push(state)).await, PollOutcome::Cancelled);
        assert!(!states.contains(&PollState::Error));
        assert!(poll.sleeper.slept.borrow().is_empty());
    }

    #[test]
    fn stage_thresholds() {
        let config = PollingConfig::default();
        assert_eq!(stage_message(0, &config), Some(FETCHING_MESSAGE));
        assert_eq!(stage_message(4, &config), None);
        assert_eq!(stage_message(5, &config), Some(ANALYZING_MESSAGE));
        assert_eq!(stage_message(15, &config), Some(BUILDING_MESSAGE));
        assert_eq!(stage_message(29, &config), None);
    }
}
