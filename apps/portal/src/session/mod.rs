//! Session: the role-gated state machine behind both dashboards.
//!
//! `Unauthenticated -> Student | Admin -> Unauthenticated`, cycling forever.
//! Role-scoped state lives inside the `Role` variant, so leaving a role drops it.
//!
//! Background loads run as spawned tasks and report back over a channel as
//! `Loaded` events. Each event carries a ticket: the session epoch (bumped on
//! every role change) and a per-kind sequence number. A completion is applied
//! only if both still match, so late results from a previous role or an older
//! reload of the same collection are discarded.

pub mod admin;
pub mod student;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

pub use admin::{AdminBatch, AdminTab, AdminView};
pub use student::{meets_min_cgpa, StudentTab, StudentView};

use crate::api_client::PlacementApi;
use crate::errors::{PortalError, PortalResult};
use crate::forms::FormFields;
use crate::models::{
    Application, ApplyRequest, Job, NewCompany, NewJob, NewOffer, NewStudent, ServerMessage,
    StudentUpdate,
};

pub const NOT_ELIGIBLE_MESSAGE: &str = "You are not eligible for this job (CGPA requirement not met)";
pub const DELETE_CANCELLED: &str = "Delete cancelled";

#[derive(Debug)]
pub enum Role {
    Unauthenticated,
    Student(StudentView),
    Admin(AdminView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Unauthenticated,
    Student,
    Admin,
}

impl Role {
    pub fn kind(&self) -> RoleKind {
        match self {
            Role::Unauthenticated => RoleKind::Unauthenticated,
            Role::Student(_) => RoleKind::Student,
            Role::Admin(_) => RoleKind::Admin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadKind {
    Jobs,
    StudentApplications,
    AdminCollections,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    epoch: u64,
    seq: u64,
}

#[derive(Debug)]
enum LoadPayload {
    Jobs(PortalResult<Vec<Job>>),
    StudentApplications(PortalResult<Vec<Application>>),
    AdminCollections(AdminBatch),
}

impl LoadPayload {
    fn kind(&self) -> LoadKind {
        match self {
            LoadPayload::Jobs(_) => LoadKind::Jobs,
            LoadPayload::StudentApplications(_) => LoadKind::StudentApplications,
            LoadPayload::AdminCollections(_) => LoadKind::AdminCollections,
        }
    }
}

/// Completion of a background load.
#[derive(Debug)]
pub struct Loaded {
    ticket: Ticket,
    payload: LoadPayload,
}

impl Loaded {
    pub fn kind(&self) -> LoadKind {
        self.payload.kind()
    }
}

pub struct Portal {
    api: Arc<dyn PlacementApi>,
    role: Role,
    /// Survives logout: re-entering the student view keeps the last tab.
    student_tab: StudentTab,
    message: Option<String>,
    loading: bool,
    epoch: u64,
    next_seq: u64,
    latest: HashMap<LoadKind, u64>,
    pending: usize,
    events: UnboundedSender<Loaded>,
}

impl Portal {
    pub fn new(api: Arc<dyn PlacementApi>) -> (Self, UnboundedReceiver<Loaded>) {
        let (events, rx) = mpsc::unbounded_channel();
        let portal = Self {
            api,
            role: Role::Unauthenticated,
            student_tab: StudentTab::default(),
            message: None,
            loading: false,
            epoch: 0,
            next_seq: 0,
            latest: HashMap::new(),
            pending: 0,
            events,
        };
        (portal, rx)
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn student_tab(&self) -> StudentTab {
        self.student_tab
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Background loads issued but not yet handled.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn report(&mut self, err: &PortalError) {
        self.message = Some(err.user_message());
    }

    fn notify(&mut self, text: &str) {
        self.message = Some(text.to_string());
    }

    // ────────────────────────────────────────────────────────────────────────
    // Role transitions
    // ────────────────────────────────────────────────────────────────────────

    fn enter(&mut self, role: Role) {
        self.epoch += 1;
        self.role = role;
    }

    /// Looks the identifier up and enters the student view on success.
    /// An empty identifier is ignored.
    pub async fn login_student(&mut self, raw_id: &str) {
        let raw_id = raw_id.trim();
        if raw_id.is_empty() {
            return;
        }
        if self.role.kind() != RoleKind::Unauthenticated {
            self.notify("Log out before switching users");
            return;
        }
        let Ok(student_id) = raw_id.parse::<i64>() else {
            self.report(&PortalError::InvalidInput("Student ID must be a number".to_string()));
            return;
        };

        self.message = None;
        let api = Arc::clone(&self.api);
        match self.submit(api.get_student(student_id)).await {
            Ok(student) => {
                info!(student_id, name = %student.name, "Student logged in");
                self.enter(Role::Student(StudentView::new(student)));
                self.load_jobs();
                self.load_student_applications(student_id);
            }
            Err(e) => {
                warn!(student_id, "Student login failed: {}", e);
                self.report(&e);
            }
        }
    }

    pub fn login_admin(&mut self) {
        if self.role.kind() != RoleKind::Unauthenticated {
            self.notify("Log out before switching users");
            return;
        }
        info!("Placement officer logged in");
        self.message = None;
        self.enter(Role::Admin(AdminView::default()));
        self.load_admin_collections();
    }

    pub fn logout(&mut self) {
        if self.role.kind() == RoleKind::Unauthenticated {
            return;
        }
        info!(role = ?self.role.kind(), "Logged out");
        self.message = None;
        self.loading = false;
        self.enter(Role::Unauthenticated);
    }

    pub fn select_tab(&mut self, name: &str) {
        let selected = match &mut self.role {
            Role::Student(_) => name.parse::<StudentTab>().map(|tab| self.student_tab = tab),
            Role::Admin(view) => name.parse::<AdminTab>().map(|tab| view.tab = tab),
            Role::Unauthenticated => Err(PortalError::InvalidInput(
                "Log in before choosing a tab".to_string(),
            )),
        };
        if let Err(e) = selected {
            self.report(&e);
        }
    }

    /// Re-issues the loads of the current role.
    pub fn refresh(&mut self) {
        match &self.role {
            Role::Student(view) => {
                let student_id = view.student.student_id;
                self.load_jobs();
                self.load_student_applications(student_id);
            }
            Role::Admin(_) => self.load_admin_collections(),
            Role::Unauthenticated => {}
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Student actions
    // ────────────────────────────────────────────────────────────────────────

    /// Eligibility check first, then the submission. An ineligible result
    /// never reaches the apply endpoint.
    pub async fn apply(&mut self, job_id: i64) {
        let Role::Student(view) = &self.role else {
            self.notify("Log in as a student to apply");
            return;
        };
        let student_id = view.student.student_id;
        if view.job(job_id).is_some_and(|job| !meets_min_cgpa(&view.student, job)) {
            self.notify(NOT_ELIGIBLE_MESSAGE);
            return;
        }

        self.message = None;
        let api = Arc::clone(&self.api);
        // Only an explicit NOT ELIGIBLE verdict blocks the submission; an error
        // body from the check leaves the decision to the apply endpoint.
        let eligible = match self.submit(api.check_eligibility(student_id, job_id)).await {
            Ok(result) => result.is_eligible(),
            Err(e) if e.is_server_reported() => {
                warn!(student_id, job_id, "Eligibility check failed, submitting anyway: {}", e);
                true
            }
            Err(e) => {
                self.report(&e);
                return;
            }
        };
        if !eligible {
            info!(student_id, job_id, "Apply blocked by eligibility check");
            self.notify(NOT_ELIGIBLE_MESSAGE);
            return;
        }

        let request = ApplyRequest { student_id, job_id };
        match self.submit(api.apply(&request)).await {
            Ok(reply) => {
                info!(student_id, job_id, "Application submitted");
                self.message = Some(reply.text_or("Application successful"));
                self.load_student_applications(student_id);
            }
            Err(e) => {
                warn!(student_id, job_id, "Application failed: {}", e);
                self.report(&e);
                if e.is_server_reported() {
                    self.load_student_applications(student_id);
                }
            }
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Admin actions
    // ────────────────────────────────────────────────────────────────────────

    fn require_admin(&mut self) -> bool {
        if self.role.kind() == RoleKind::Admin {
            return true;
        }
        self.notify("Switch to the admin view first");
        false
    }

    /// Shows the server's reply and, when `reload` is set, refetches the four
    /// admin collections to pick up server-side effects.
    fn finish_admin(&mut self, outcome: PortalResult<ServerMessage>, default: &str, reload: bool) {
        match outcome {
            Ok(reply) => {
                self.message = Some(reply.text_or(default));
                if reload {
                    self.load_admin_collections();
                }
            }
            Err(e) => {
                warn!("Admin action failed: {}", e);
                self.report(&e);
            }
        }
    }

    pub async fn create_student(&mut self, form: &FormFields) {
        if !self.require_admin() {
            return;
        }
        let student = match NewStudent::try_from(form) {
            Ok(student) => student,
            Err(e) => return self.report(&e),
        };
        let api = Arc::clone(&self.api);
        let outcome = self.submit(api.create_student(&student)).await;
        self.finish_admin(outcome, "Student created successfully", true);
    }

    pub async fn update_student(&mut self, student_id: i64, form: &FormFields) {
        if !self.require_admin() {
            return;
        }
        let update = match StudentUpdate::try_from(form) {
            Ok(update) => update,
            Err(e) => return self.report(&e),
        };
        let api = Arc::clone(&self.api);
        let outcome = self.submit(api.update_student(student_id, &update)).await;
        self.finish_admin(outcome, "Student updated successfully", true);
    }

    /// Sends nothing unless the user confirmed the deletion.
    pub async fn delete_student(&mut self, student_id: i64, confirmed: bool) {
        if !self.require_admin() {
            return;
        }
        if !confirmed {
            return self.notify(DELETE_CANCELLED);
        }
        let api = Arc::clone(&self.api);
        let outcome = self.submit(api.delete_student(student_id)).await;
        self.finish_admin(outcome, "Student deleted successfully", true);
    }

    pub async fn create_company(&mut self, form: &FormFields) {
        if !self.require_admin() {
            return;
        }
        let company = match NewCompany::try_from(form) {
            Ok(company) => company,
            Err(e) => return self.report(&e),
        };
        let api = Arc::clone(&self.api);
        let outcome = self.submit(api.create_company(&company)).await;
        self.finish_admin(outcome, "Company created successfully", true);
    }

    pub async fn delete_company(&mut self, company_id: i64, confirmed: bool) {
        if !self.require_admin() {
            return;
        }
        if !confirmed {
            return self.notify(DELETE_CANCELLED);
        }
        let api = Arc::clone(&self.api);
        let outcome = self.submit(api.delete_company(company_id)).await;
        self.finish_admin(outcome, "Company deleted successfully", true);
    }

    /// Jobs are not among the admin collections, so nothing is reloaded.
    pub async fn create_job(&mut self, form: &FormFields) {
        if !self.require_admin() {
            return;
        }
        let job = match NewJob::try_from(form) {
            Ok(job) => job,
            Err(e) => return self.report(&e),
        };
        let api = Arc::clone(&self.api);
        let outcome = self.submit(api.create_job(&job)).await;
        self.finish_admin(outcome, "Job created successfully", false);
    }

    pub async fn delete_job(&mut self, job_id: i64, confirmed: bool) {
        if !self.require_admin() {
            return;
        }
        if !confirmed {
            return self.notify(DELETE_CANCELLED);
        }
        let api = Arc::clone(&self.api);
        let outcome = self.submit(api.delete_job(job_id)).await;
        self.finish_admin(outcome, "Job deleted successfully", false);
    }

    pub async fn create_offer(&mut self, form: &FormFields) {
        if !self.require_admin() {
            return;
        }
        let offer = match NewOffer::try_from(form) {
            Ok(offer) => offer,
            Err(e) => return self.report(&e),
        };
        let api = Arc::clone(&self.api);
        let outcome = self.submit(api.create_offer(&offer)).await;
        self.finish_admin(
            outcome,
            "Offer created successfully (Application status auto-updated)",
            true,
        );
    }

    pub async fn load_student_placements(&mut self) {
        if !self.require_admin() {
            return;
        }
        let api = Arc::clone(&self.api);
        match self.submit(api.student_placements()).await {
            Ok(rows) => {
                if let Role::Admin(view) = &mut self.role {
                    view.placements = Some(rows);
                }
            }
            Err(e) => self.report(&e),
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Requests and background loads
    // ────────────────────────────────────────────────────────────────────────

    /// Awaits a foreground request with the shared loading flag raised.
    async fn submit<T>(&mut self, request: impl Future<Output = PortalResult<T>>) -> PortalResult<T> {
        self.loading = true;
        let result = request.await;
        self.loading = false;
        result
    }

    fn issue<F>(&mut self, kind: LoadKind, load: F)
    where
        F: Future<Output = LoadPayload> + Send + 'static,
    {
        self.next_seq += 1;
        let ticket = Ticket {
            epoch: self.epoch,
            seq: self.next_seq,
        };
        self.latest.insert(kind, ticket.seq);
        self.pending += 1;
        debug!(?kind, epoch = ticket.epoch, seq = ticket.seq, "Issuing background load");

        let events = self.events.clone();
        tokio::spawn(async move {
            let payload = load.await;
            // A closed channel means the console has already exited.
            let _ = events.send(Loaded { ticket, payload });
        });
    }

    fn load_jobs(&mut self) {
        let api = Arc::clone(&self.api);
        self.issue(LoadKind::Jobs, async move {
            LoadPayload::Jobs(api.list_jobs().await)
        });
    }

    fn load_student_applications(&mut self, student_id: i64) {
        let api = Arc::clone(&self.api);
        self.issue(LoadKind::StudentApplications, async move {
            LoadPayload::StudentApplications(api.student_applications(student_id).await)
        });
    }

    fn load_admin_collections(&mut self) {
        let api = Arc::clone(&self.api);
        self.issue(LoadKind::AdminCollections, async move {
            LoadPayload::AdminCollections(AdminBatch::fetch(api.as_ref()).await)
        });
    }

    /// Applies a completed background load, unless it is stale.
    pub fn handle(&mut self, loaded: Loaded) {
        self.pending = self.pending.saturating_sub(1);
        let kind = loaded.kind();
        if loaded.ticket.epoch != self.epoch || self.latest.get(&kind) != Some(&loaded.ticket.seq) {
            debug!(?kind, epoch = loaded.ticket.epoch, seq = loaded.ticket.seq, "Discarding stale load");
            return;
        }

        match (&mut self.role, loaded.payload) {
            (Role::Student(view), LoadPayload::Jobs(result)) => match result {
                Ok(jobs) => view.jobs = jobs,
                Err(e) => self.message = Some(e.user_message()),
            },
            (Role::Student(view), LoadPayload::StudentApplications(result)) => match result {
                Ok(applications) => view.applications = applications,
                Err(e) => self.message = Some(e.user_message()),
            },
            (Role::Admin(view), LoadPayload::AdminCollections(batch)) => {
                let failures = view.apply_batch(batch);
                if !failures.is_empty() {
                    self.message = Some(failures.join("; "));
                }
            }
            (role, _) => debug!(?kind, role = ?role.kind(), "Dropping load for inactive role"),
        }
    }

    /// Waits until every issued background load has been handled.
    pub async fn settle(&mut self, events: &mut UnboundedReceiver<Loaded>) {
        while self.pending > 0 {
            match events.recv().await {
                Some(loaded) => self.handle(loaded),
                None => break,
            }
        }
    }
}
