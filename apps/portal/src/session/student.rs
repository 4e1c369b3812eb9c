use std::str::FromStr;

use crate::errors::PortalError;
use crate::models::{Application, Job, Student};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StudentTab {
    #[default]
    Jobs,
    Applications,
}

impl StudentTab {
    pub const ALL: [StudentTab; 2] = [StudentTab::Jobs, StudentTab::Applications];

    pub fn label(&self) -> &'static str {
        match self {
            StudentTab::Jobs => "Job Listings",
            StudentTab::Applications => "My Applications",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StudentTab::Jobs => "jobs",
            StudentTab::Applications => "applications",
        }
    }
}

impl FromStr for StudentTab {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StudentTab::ALL
            .into_iter()
            .find(|tab| tab.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                PortalError::InvalidInput(format!(
                    "Unknown tab \"{s}\" (expected jobs, applications)"
                ))
            })
    }
}

/// State owned by a logged-in student. Dropped on logout.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentView {
    pub student: Student,
    pub jobs: Vec<Job>,
    pub applications: Vec<Application>,
}

/// How the apply control of one job card is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyControl {
    pub enabled: bool,
    pub label: &'static str,
}

impl StudentView {
    pub fn new(student: Student) -> Self {
        Self {
            student,
            jobs: Vec::new(),
            applications: Vec::new(),
        }
    }

    pub fn job(&self, job_id: i64) -> Option<&Job> {
        self.jobs.iter().find(|job| job.job_id == job_id)
    }

    /// Ineligible jobs stay listed; only their control is disabled.
    pub fn apply_control(&self, job: &Job, loading: bool) -> ApplyControl {
        if meets_min_cgpa(&self.student, job) {
            ApplyControl {
                enabled: !loading,
                label: "Apply Now",
            }
        } else {
            ApplyControl {
                enabled: false,
                label: "Not Eligible",
            }
        }
    }
}

pub fn meets_min_cgpa(student: &Student, job: &Job) -> bool {
    student.cgpa >= job.min_cgpa
}
