//! Session context
//!
//! One object owns everything a signed-in user sees: the current screen and
//! page, the account, the profile and the report slot. Report generation is
//! tagged with a monotonically increasing sequence number; only the latest
//! request may write the slot, and starting a new request (or leaving the
//! report page) cancels older in-flight ones.

use crate::auth::Account;
use crate::error::{ReportError, ReportResult};
use crate::requestor::ReportService;
use chrono::{DateTime, Utc};
use irontrack_shared::{DerivedMetrics, Profile, Report};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Login,
    Onboarding,
    App,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Dashboard,
    Report,
    Workout,
    Nutrition,
    Analytics,
}

/// What the report page currently shows
#[derive(Debug, Clone)]
pub enum ReportSlot {
    Idle,
    Pending {
        seq: u64,
    },
    Ready {
        report: Arc<Report>,
        generated_at: DateTime<Utc>,
    },
    Failed(ReportError),
}

impl ReportSlot {
    pub fn is_pending(&self) -> bool {
        matches!(self, ReportSlot::Pending { .. })
    }

    pub fn report(&self) -> Option<&Arc<Report>> {
        match self {
            ReportSlot::Ready { report, .. } => Some(report),
            _ => None,
        }
    }
}

/// A transition requested from the wrong screen
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Already signed in")]
    AlreadySignedIn,

    #[error("Onboarding is not in progress")]
    NotOnboarding,

    #[error("Not signed in to the app")]
    NotInApp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CancelCause {
    Superseded,
    Abandoned,
}

/// Requests with a sequence below `floor` must stop
#[derive(Debug, Clone, Copy)]
struct Cutoff {
    floor: u64,
    cause: CancelCause,
}

struct SessionState {
    screen: Screen,
    page: Page,
    account: Option<Account>,
    profile: Option<Arc<Profile>>,
    report: ReportSlot,
}

impl SessionState {
    fn signed_out() -> Self {
        Self {
            screen: Screen::Login,
            page: Page::Dashboard,
            account: None,
            profile: None,
            report: ReportSlot::Idle,
        }
    }
}

/// Wait until `seq` falls below the cutoff floor
async fn cancelled(rx: &mut watch::Receiver<Cutoff>, seq: u64) -> CancelCause {
    loop {
        let cutoff = *rx.borrow_and_update();
        if cutoff.floor > seq {
            return cutoff.cause;
        }
        if rx.changed().await.is_err() {
            // Sender lives as long as the session; nothing can cancel us now
            std::future::pending::<()>().await;
        }
    }
}

pub struct Session {
    id: Uuid,
    service: Arc<dyn ReportService>,
    latest_seq: AtomicU64,
    state: Mutex<SessionState>,
    cutoff: watch::Sender<Cutoff>,
}

impl Session {
    pub fn new(service: Arc<dyn ReportService>) -> Self {
        let (cutoff, _) = watch::channel(Cutoff {
            floor: 0,
            cause: CancelCause::Abandoned,
        });
        Self {
            id: Uuid::new_v4(),
            service,
            latest_seq: AtomicU64::new(0),
            state: Mutex::new(SessionState::signed_out()),
            cutoff,
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn screen(&self) -> Screen {
        self.state().screen
    }

    pub fn page(&self) -> Page {
        self.state().page
    }

    pub fn account(&self) -> Option<Account> {
        self.state().account.clone()
    }

    pub fn profile(&self) -> Option<Arc<Profile>> {
        self.state().profile.clone()
    }

    pub fn report(&self) -> ReportSlot {
        self.state().report.clone()
    }

    /// Sequence number of the most recent report request
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq.load(Ordering::SeqCst)
    }

    /// Dashboard figures for the current profile
    pub fn metrics(&self) -> Option<DerivedMetrics> {
        self.profile().map(|p| DerivedMetrics::from_profile(&p))
    }

    /// Enter the app, or onboarding when the account has no profile yet
    pub fn login(&self, account: Account) -> Result<Screen, TransitionError> {
        let mut state = self.state();
        if state.screen != Screen::Login {
            return Err(TransitionError::AlreadySignedIn);
        }

        state.profile = account.profile.clone().map(Arc::new);
        state.screen = if state.profile.is_some() {
            Screen::App
        } else {
            Screen::Onboarding
        };
        state.page = Page::Dashboard;
        info!(session_id = %self.id, account_id = %account.id, screen = ?state.screen, "Logged in");
        state.account = Some(account);
        Ok(state.screen)
    }

    /// Store the onboarding result and land on the report page
    pub fn complete_onboarding(&self, profile: Profile) -> Result<(), TransitionError> {
        let mut state = self.state();
        if state.screen != Screen::Onboarding {
            return Err(TransitionError::NotOnboarding);
        }

        if let Some(account) = state.account.as_mut() {
            account.profile = Some(profile.clone());
        }
        state.profile = Some(Arc::new(profile));
        state.screen = Screen::App;
        state.page = Page::Report;
        info!(session_id = %self.id, "Onboarding complete");
        Ok(())
    }

    /// Switch pages; leaving the report page cancels in-flight generation
    pub fn navigate(&self, page: Page) -> Result<(), TransitionError> {
        let mut state = self.state();
        if state.screen != Screen::App {
            return Err(TransitionError::NotInApp);
        }
        if state.page == Page::Report && page != Page::Report {
            self.cancel_in_flight(&mut state);
        }
        state.page = page;
        Ok(())
    }

    /// Drop account, profile and report; cancel anything in flight
    pub fn logout(&self) {
        let mut state = self.state();
        self.cancel_in_flight(&mut state);
        *state = SessionState::signed_out();
        info!(session_id = %self.id, "Logged out");
    }

    fn raise_floor(&self, floor: u64, cause: CancelCause) {
        self.cutoff.send_if_modified(|cutoff| {
            if floor > cutoff.floor {
                *cutoff = Cutoff { floor, cause };
                true
            } else {
                false
            }
        });
    }

    fn cancel_in_flight(&self, state: &mut SessionState) {
        if let ReportSlot::Pending { seq } = state.report {
            debug!(session_id = %self.id, seq, "Cancelling report generation");
            state.report = ReportSlot::Idle;
        }
        self.raise_floor(self.latest_seq() + 1, CancelCause::Abandoned);
    }

    /// Request a fresh report for the current profile
    ///
    /// Only accepted on the report page. The result is written to the report slot only if this is still the
    /// latest request when it finishes. A request overtaken by a newer one
    /// returns [`ReportError::Superseded`]; one abandoned by navigation or
    /// logout returns [`ReportError::Cancelled`].
    pub async fn generate(&self) -> ReportResult<Arc<Report>> {
        let (seq, profile) = {
            let mut state = self.state();
            let profile = state.profile.clone().ok_or(ReportError::NoProfile)?;
            if state.screen != Screen::App || state.page != Page::Report {
                return Err(ReportError::NotOnReportPage);
            }
            let seq = self.latest_seq.fetch_add(1, Ordering::SeqCst) + 1;
            state.report = ReportSlot::Pending { seq };
            (seq, profile)
        };
        self.raise_floor(seq, CancelCause::Superseded);
        debug!(session_id = %self.id, seq, "Report requested");

        let mut cutoff = self.cutoff.subscribe();
        let outcome = tokio::select! {
            result = self.service.generate(&profile) => result,
            cause = cancelled(&mut cutoff, seq) => Err(match cause {
                CancelCause::Superseded => ReportError::Superseded { seq },
                CancelCause::Abandoned => ReportError::Cancelled,
            }),
        };

        self.apply(seq, outcome)
    }

    fn apply(&self, seq: u64, outcome: ReportResult<Report>) -> ReportResult<Arc<Report>> {
        let mut state = self.state();
        let still_current = matches!(state.report, ReportSlot::Pending { seq: pending } if pending == seq);
        if !still_current {
            debug!(session_id = %self.id, seq, "Discarding stale report result");
            return Err(match outcome {
                Err(err @ (ReportError::Cancelled | ReportError::Superseded { .. })) => err,
                _ if self.latest_seq() > seq => ReportError::Superseded { seq },
                _ => ReportError::Cancelled,
            });
        }

        match outcome {
            Ok(report) => {
                let report = Arc::new(report);
                state.report = ReportSlot::Ready {
                    report: Arc::clone(&report),
                    generated_at: Utc::now(),
                };
                info!(session_id = %self.id, seq, score = report.score, "Report ready");
                Ok(report)
            }
            Err(err) => {
                warn!(session_id = %self.id, seq, error = %err, "Report generation failed");
                state.report = ReportSlot::Failed(err.clone());
                Err(err)
            }
        }
    }
}
