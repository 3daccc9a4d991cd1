use std::collections::VecDeque;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::state::*;
use crate::api::{Credentials, FetchResult, Plan, PlanBundle, PlanSnapshot, ScheduleEntry, TimetableData, TimetableService};
use crate::config::Config;
use crate::timetable::{build_matrix, filter_entries_with, ClassFilter, ClassMatch, TimetableMatrix};

/// A finished request, tagged with the generation it was issued under
enum Outcome {
    Login {
        generation: u64,
        result: FetchResult<PlanBundle>,
    },
    PlanSwitch {
        generation: u64,
        index: usize,
        previous_index: Option<usize>,
        title: String,
        result: FetchResult<PlanSnapshot>,
    },
}

impl Outcome {
    fn generation(&self) -> u64 {
        match self {
            Outcome::Login { generation, .. } | Outcome::PlanSwitch { generation, .. } => *generation,
        }
    }
}

/// Owns the session: credentials, the raw timetable, the selection, and
/// everything derived from them.
///
/// Requests run on the tokio runtime; their outcomes come back over a
/// channel and are applied by [`poll`](Self::poll) or
/// [`settle`](Self::settle), so state is only ever written from the thread
/// that owns the controller.
pub struct SelectionController {
    service: Arc<dyn TimetableService>,
    runtime: Handle,
    outcome_tx: UnboundedSender<Outcome>,
    outcome_rx: UnboundedReceiver<Outcome>,
    ordering: ResponseOrdering,
    class_match: ClassMatch,

    credentials: Option<Credentials>,
    timetable: Option<TimetableData>,
    available_plans: Vec<Plan>,
    available_classes: Vec<String>,
    state: SelectionState,
    phase: Status,

    // Derived from timetable + selected class
    visible_entries: Vec<ScheduleEntry>,
    matrix: TimetableMatrix,

    in_flight: usize,
    issued: u64,
    notifications: VecDeque<Notification>,
}

impl SelectionController {
    pub fn new(service: Arc<dyn TimetableService>, runtime: Handle) -> Self {
        let (outcome_tx, outcome_rx) = unbounded_channel();
        Self {
            service,
            runtime,
            outcome_tx,
            outcome_rx,
            ordering: ResponseOrdering::default(),
            class_match: ClassMatch::default(),
            credentials: None,
            timetable: None,
            available_plans: Vec::new(),
            available_classes: Vec::new(),
            state: SelectionState::default(),
            phase: Status::Idle,
            visible_entries: Vec::new(),
            matrix: TimetableMatrix::default(),
            in_flight: 0,
            issued: 0,
            notifications: VecDeque::new(),
        }
    }

    pub fn from_config(service: Arc<dyn TimetableService>, runtime: Handle, config: &Config) -> Self {
        Self::new(service, runtime)
            .with_response_ordering(config.response_ordering)
            .with_class_match(config.class_match)
    }

    pub fn with_response_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_class_match(mut self, class_match: ClassMatch) -> Self {
        self.class_match = class_match;
        self
    }

    // ---- accessors ----

    pub fn status(&self) -> Status {
        if self.in_flight > 0 {
            Status::Loading
        } else {
            self.phase
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.username.as_str())
    }

    /// Raw timetable as last received
    pub fn timetable(&self) -> Option<&TimetableData> {
        self.timetable.as_ref()
    }

    /// Entries passing the current class filter, in received order
    pub fn visible_entries(&self) -> &[ScheduleEntry] {
        &self.visible_entries
    }

    pub fn matrix(&self) -> &TimetableMatrix {
        &self.matrix
    }

    pub fn available_plans(&self) -> &[Plan] {
        &self.available_plans
    }

    pub fn available_classes(&self) -> &[String] {
        &self.available_classes
    }

    pub fn current_plan(&self) -> Option<&Plan> {
        self.state
            .selected_plan_index
            .and_then(|i| self.available_plans.get(i))
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    // ---- commands ----

    /// Log in and fetch the default plan. Credentials are kept for
    /// [`reload`](Self::reload) and plan switches.
    pub fn submit_credentials(&mut self, username: &str, password: &str) {
        let credentials = Credentials::new(username, password);
        self.credentials = Some(credentials.clone());
        self.spawn_login(credentials);
    }

    /// Fetch the plan at `index` with the stored credentials
    pub fn change_plan(&mut self, index: usize) -> Result<(), SelectionError> {
        let plan = self
            .available_plans
            .get(index)
            .ok_or(SelectionError::PlanOutOfRange {
                index,
                len: self.available_plans.len(),
            })?;
        if plan.url.trim().is_empty() {
            return Err(SelectionError::MissingPlanUrl { index });
        }
        let credentials = self.credentials.clone().ok_or(SelectionError::NoCredentials)?;

        let plan_url = plan.url.clone();
        let title = plan.display_title(index);
        let previous_index = self.state.selected_plan_index.replace(index);

        let generation = self.begin_request();
        log::info!("Switching to plan {} ({})", index, title);

        let service = Arc::clone(&self.service);
        let tx = self.outcome_tx.clone();
        self.runtime.spawn(async move {
            let result = service.fetch_plan(&credentials, &plan_url).await;
            let _ = tx.send(Outcome::PlanSwitch {
                generation,
                index,
                previous_index,
                title,
                result,
            });
        });

        Ok(())
    }

    /// Re-filter the current timetable. No request is made.
    pub fn change_class_filter(&mut self, selector: &str) {
        let filter = ClassFilter::parse(selector);
        log::debug!("Class filter set to {:?}", filter.as_str());
        self.state.selected_class = Some(filter);
        self.refilter();
    }

    /// Log in again with the last credentials
    pub fn reload(&mut self) -> Result<(), SelectionError> {
        let credentials = self.credentials.clone().ok_or(SelectionError::NoCredentials)?;
        self.spawn_login(credentials);
        Ok(())
    }

    // ---- outcome handling ----

    /// Apply every outcome that has already arrived. Returns true if any did.
    pub fn poll(&mut self) -> bool {
        let mut applied = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply(outcome);
            applied = true;
        }
        applied
    }

    /// Wait for the next outcome and apply it. Returns false when nothing is in flight.
    pub async fn settle(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.outcome_rx.recv().await {
            Some(outcome) => {
                self.apply(outcome);
                true
            }
            None => false,
        }
    }

    /// Wait until no request is in flight
    pub async fn settle_all(&mut self) {
        while self.settle().await {}
    }

    fn spawn_login(&mut self, credentials: Credentials) {
        let generation = self.begin_request();
        log::info!("Fetching timetable for {}", credentials.username);

        let service = Arc::clone(&self.service);
        let tx = self.outcome_tx.clone();
        self.runtime.spawn(async move {
            let result = service.parse_plan(&credentials).await;
            let _ = tx.send(Outcome::Login { generation, result });
        });
    }

    fn begin_request(&mut self) -> u64 {
        self.issued += 1;
        self.in_flight += 1;
        self.state.is_loading = true;
        self.issued
    }

    fn apply(&mut self, outcome: Outcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.state.is_loading = self.in_flight > 0;

        if self.ordering == ResponseOrdering::LatestRequestWins && outcome.generation() < self.issued {
            log::debug!(
                "Discarding stale response (generation {}, latest {})",
                outcome.generation(),
                self.issued
            );
            return;
        }

        match outcome {
            Outcome::Login { result: Ok(bundle), .. } => self.apply_login(bundle),
            Outcome::Login { result: Err(e), .. } => {
                log::warn!("Timetable fetch failed: {}", e);
                self.phase = Status::Error;
                self.notifications.push_back(Notification::error(e.to_string()));
            }
            Outcome::PlanSwitch { index, title, result: Ok(snapshot), .. } => {
                log::info!("Plan {} loaded", title);
                // The selector names whichever plan is on screen
                self.state.selected_plan_index = Some(index);
                self.state.last_updated = snapshot.last_updated.or_else(|| snapshot.timetable.last_updated.clone());
                self.timetable = Some(snapshot.timetable);
                self.refilter();
                self.phase = Status::Loaded;
                self.notifications
                    .push_back(Notification::success("Plan switched", format!("{} loaded", title)));
            }
            Outcome::PlanSwitch { index, previous_index, result: Err(e), .. } => {
                log::warn!("Plan switch to {} failed: {}", index, e);
                // Keep the selector describing the data still on screen
                if self.state.selected_plan_index == Some(index) {
                    self.state.selected_plan_index = previous_index;
                }
                self.phase = if self.timetable.is_some() { Status::Loaded } else { Status::Error };
                self.notifications.push_back(Notification::error(e.to_string()));
            }
        }
    }

    fn apply_login(&mut self, bundle: PlanBundle) {
        log::info!(
            "Timetable loaded: {} entries, {} plans{}",
            bundle.timetable.entries.len(),
            bundle.available_plans.len(),
            if bundle.from_cache { " (cached)" } else { "" }
        );

        self.available_plans = bundle.available_plans;
        self.available_classes = bundle.available_classes;
        self.state.selected_plan_index = if self.available_plans.is_empty() { None } else { Some(0) };
        if !self.available_plans.is_empty() && self.state.selected_class.is_none() {
            self.state.selected_class = Some(ClassFilter::All);
        }
        self.state.last_updated = bundle.last_updated.or_else(|| bundle.timetable.last_updated.clone());
        self.timetable = Some(bundle.timetable);
        self.refilter();
        self.phase = Status::Loaded;

        let message = if bundle.from_cache {
            "Loaded from cache"
        } else {
            "Latest timetable loaded"
        };
        self.notifications.push_back(Notification::success("Timetable loaded", message));
    }

    fn refilter(&mut self) {
        let Some(timetable) = &self.timetable else {
            self.visible_entries.clear();
            self.matrix = TimetableMatrix::default();
            return;
        };

        let filter = self.state.class_filter();
        let entries = filter_entries_with(&timetable.entries, &filter, self.class_match).into_owned();
        log::debug!(
            "Class filter {:?}: {} of {} entries",
            filter.as_str(),
            entries.len(),
            timetable.entries.len()
        );
        self.matrix = build_matrix(&timetable.days, &timetable.periods, &entries);
        self.visible_entries = entries;
    }
}
