//! In-memory `PlacementApi` used by session and console tests.
//!
//! Every call is recorded as `"METHOD /path"`. Individual calls can be made to
//! fail or to sleep first, which lets tests reorder completions under a paused
//! tokio clock.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::PlacementApi;
use crate::errors::{PortalError, PortalResult};
use crate::models::{
    Application, ApplicationStatus, ApplyRequest, Company, EligibilityResult, Job, NewCompany,
    NewJob, NewOffer, NewStudent, PlacementStat, ServerMessage, Student, StudentPlacement,
    StudentUpdate,
};

#[derive(Default)]
pub struct FakeState {
    pub students: Vec<Student>,
    pub jobs: Vec<Job>,
    pub applications: Vec<Application>,
    pub companies: Vec<Company>,
    pub stats: Vec<PlacementStat>,
    pub placements: Vec<StudentPlacement>,
    /// Eligibility status per (student_id, job_id); "ELIGIBLE" when absent.
    pub eligibility: HashMap<(i64, i64), String>,
    /// Message returned by mutating calls; `None` sends an empty envelope.
    pub reply: Option<String>,
    /// Calls (as recorded) that fail with a server-reported error.
    pub failing: HashSet<String>,
    pub delays: HashMap<String, Duration>,
    pub calls: Vec<String>,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new(setup: impl FnOnce(&mut FakeState)) -> Self {
        let mut state = FakeState {
            reply: Some("OK".to_string()),
            ..Default::default()
        };
        setup(&mut state);
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn called(&self, call: &str) -> bool {
        self.calls().iter().any(|c| c == call)
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn update(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut self.state.lock().unwrap());
    }

    /// Records the call, honours any configured delay, then reads the state.
    async fn serve<T>(&self, call: String, read: impl FnOnce(&mut FakeState) -> PortalResult<T>) -> PortalResult<T> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(call.clone());
            state.delays.get(&call).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock().unwrap();
        if state.failing.contains(&call) {
            return Err(PortalError::Api {
                status: 500,
                message: format!("{call} failed"),
            });
        }
        read(&mut state)
    }

    async fn mutate(&self, call: String) -> PortalResult<ServerMessage> {
        self.serve(call, |state| {
            Ok(ServerMessage {
                message: state.reply.clone(),
                error: None,
            })
        })
        .await
    }
}

pub fn student(student_id: i64, name: &str, cgpa: f64) -> Student {
    Student {
        student_id,
        roll_no: format!("R{student_id}"),
        name: name.to_string(),
        email: format!("{}@college.edu", name.to_lowercase()),
        department: "CSE".to_string(),
        cgpa,
        graduation_year: Some(2026),
    }
}

pub fn job(job_id: i64, company: &str, min_cgpa: f64) -> Job {
    Job {
        job_id,
        company_id: Some(1),
        role_name: "Software Engineer".to_string(),
        company_name: company.to_string(),
        location: "Pune".to_string(),
        package_lpa: Some(12.0),
        min_cgpa,
        eligible_branches: "CSE, IT".to_string(),
    }
}

pub fn application(application_id: i64, student_id: i64, job_id: i64) -> Application {
    Application {
        application_id,
        student_id: Some(student_id),
        job_id: Some(job_id),
        student_name: None,
        role_name: "Software Engineer".to_string(),
        company_name: "Acme".to_string(),
        package_lpa: Some(12.0),
        applied_date: "2025-01-14".to_string(),
        status: ApplicationStatus::Applied,
    }
}

pub fn company(company_id: i64, name: &str) -> Company {
    Company {
        company_id,
        company_name: name.to_string(),
        location: "Pune".to_string(),
        package_lpa: Some(12.0),
    }
}

#[async_trait]
impl PlacementApi for FakeApi {
    async fn get_student(&self, student_id: i64) -> PortalResult<Student> {
        self.serve(format!("GET /students/{student_id}"), |state| {
            state
                .students
                .iter()
                .find(|s| s.student_id == student_id)
                .cloned()
                .ok_or_else(|| PortalError::NotFound("Student not found".to_string()))
        })
        .await
    }

    async fn list_jobs(&self) -> PortalResult<Vec<Job>> {
        self.serve("GET /jobs".to_string(), |state| Ok(state.jobs.clone()))
            .await
    }

    async fn student_applications(&self, student_id: i64) -> PortalResult<Vec<Application>> {
        self.serve(format!("GET /applications/{student_id}"), |state| {
            Ok(state
                .applications
                .iter()
                .filter(|a| a.student_id == Some(student_id))
                .cloned()
                .collect())
        })
        .await
    }

    async fn check_eligibility(&self, student_id: i64, job_id: i64) -> PortalResult<EligibilityResult> {
        self.serve(
            format!("GET /eligibility?student_id={student_id}&job_id={job_id}"),
            |state| {
                Ok(EligibilityResult {
                    status: state
                        .eligibility
                        .get(&(student_id, job_id))
                        .cloned()
                        .unwrap_or_else(|| "ELIGIBLE".to_string()),
                    ..Default::default()
                })
            },
        )
        .await
    }

    async fn apply(&self, request: &ApplyRequest) -> PortalResult<ServerMessage> {
        let request = *request;
        self.serve("POST /apply".to_string(), move |state| {
            let next_id = state.applications.len() as i64 + 1;
            state
                .applications
                .push(application(next_id, request.student_id, request.job_id));
            Ok(ServerMessage {
                message: state.reply.clone(),
                error: None,
            })
        })
        .await
    }

    async fn list_students(&self) -> PortalResult<Vec<Student>> {
        self.serve("GET /admin/students".to_string(), |state| Ok(state.students.clone()))
            .await
    }

    async fn list_companies(&self) -> PortalResult<Vec<Company>> {
        self.serve("GET /admin/companies".to_string(), |state| Ok(state.companies.clone()))
            .await
    }

    async fn list_all_applications(&self) -> PortalResult<Vec<Application>> {
        self.serve("GET /admin/applications".to_string(), |state| {
            Ok(state.applications.clone())
        })
        .await
    }

    async fn placement_stats(&self) -> PortalResult<Vec<PlacementStat>> {
        self.serve("GET /admin/stats/placement".to_string(), |state| Ok(state.stats.clone()))
            .await
    }

    async fn student_placements(&self) -> PortalResult<Vec<StudentPlacement>> {
        self.serve("GET /admin/stats/student-placements".to_string(), |state| {
            Ok(state.placements.clone())
        })
        .await
    }

    async fn create_student(&self, _student: &NewStudent) -> PortalResult<ServerMessage> {
        self.mutate("POST /admin/students".to_string()).await
    }

    async fn update_student(&self, student_id: i64, _update: &StudentUpdate) -> PortalResult<ServerMessage> {
        self.mutate(format!("PUT /admin/students/{student_id}")).await
    }

    async fn delete_student(&self, student_id: i64) -> PortalResult<ServerMessage> {
        self.mutate(format!("DELETE /admin/students/{student_id}")).await
    }

    async fn create_company(&self, new: &NewCompany) -> PortalResult<ServerMessage> {
        let new = new.clone();
        self.serve("POST /admin/companies".to_string(), move |state| {
            let next_id = state.companies.len() as i64 + 1;
            state.companies.push(Company {
                company_id: next_id,
                company_name: new.company_name,
                location: new.location,
                package_lpa: Some(new.package_lpa),
            });
            Ok(ServerMessage {
                message: state.reply.clone(),
                error: None,
            })
        })
        .await
    }

    async fn delete_company(&self, company_id: i64) -> PortalResult<ServerMessage> {
        self.mutate(format!("DELETE /admin/companies/{company_id}")).await
    }

    async fn create_job(&self, _job: &NewJob) -> PortalResult<ServerMessage> {
        self.mutate("POST /admin/jobs".to_string()).await
    }

    async fn delete_job(&self, job_id: i64) -> PortalResult<ServerMessage> {
        self.mutate(format!("DELETE /admin/jobs/{job_id}")).await
    }

    async fn create_offer(&self, _offer: &NewOffer) -> PortalResult<ServerMessage> {
        self.mutate("POST /admin/offers".to_string()).await
    }
}
