use std::str::FromStr;

use tracing::warn;

use crate::api_client::PlacementApi;
use crate::errors::{PortalError, PortalResult};
use crate::models::{Application, Company, PlacementStat, Student, StudentPlacement};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminTab {
    #[default]
    Students,
    Companies,
    Jobs,
    Offers,
    Applications,
    Stats,
}

impl AdminTab {
    pub const ALL: [AdminTab; 6] = [
        AdminTab::Students,
        AdminTab::Companies,
        AdminTab::Jobs,
        AdminTab::Offers,
        AdminTab::Applications,
        AdminTab::Stats,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdminTab::Students => "Students",
            AdminTab::Companies => "Companies",
            AdminTab::Jobs => "Add Jobs",
            AdminTab::Offers => "Create Offers",
            AdminTab::Applications => "All Applications",
            AdminTab::Stats => "Stats",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AdminTab::Students => "students",
            AdminTab::Companies => "companies",
            AdminTab::Jobs => "jobs",
            AdminTab::Offers => "offers",
            AdminTab::Applications => "applications",
            AdminTab::Stats => "stats",
        }
    }
}

impl FromStr for AdminTab {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdminTab::ALL
            .into_iter()
            .find(|tab| tab.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = AdminTab::ALL.iter().map(AdminTab::name).collect();
                PortalError::InvalidInput(format!(
                    "Unknown tab \"{s}\" (expected {})",
                    names.join(", ")
                ))
            })
    }
}

/// State owned by the admin role. Dropped on logout; the tab resets on entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminView {
    pub tab: AdminTab,
    pub students: Vec<Student>,
    pub companies: Vec<Company>,
    pub applications: Vec<Application>,
    pub stats: Vec<PlacementStat>,
    /// Fetched on demand, outside the four-collection batch.
    pub placements: Option<Vec<StudentPlacement>>,
}

/// Results of the four concurrent admin listings. Each one is kept separate so
/// a failing endpoint cannot blank the others.
#[derive(Debug)]
pub struct AdminBatch {
    pub students: PortalResult<Vec<Student>>,
    pub companies: PortalResult<Vec<Company>>,
    pub applications: PortalResult<Vec<Application>>,
    pub stats: PortalResult<Vec<PlacementStat>>,
}

impl AdminBatch {
    pub async fn fetch(api: &dyn PlacementApi) -> Self {
        let (students, companies, applications, stats) = tokio::join!(
            api.list_students(),
            api.list_companies(),
            api.list_all_applications(),
            api.placement_stats(),
        );
        Self {
            students,
            companies,
            applications,
            stats,
        }
    }
}

impl AdminView {
    /// Replaces every collection whose load succeeded. A failed collection keeps
    /// its previous contents. Returns one message per failure.
    pub fn apply_batch(&mut self, batch: AdminBatch) -> Vec<String> {
        let mut failures = Vec::new();
        replace("students", &mut self.students, batch.students, &mut failures);
        replace("companies", &mut self.companies, batch.companies, &mut failures);
        replace("applications", &mut self.applications, batch.applications, &mut failures);
        replace("stats", &mut self.stats, batch.stats, &mut failures);
        failures
    }
}

fn replace<T>(
    name: &str,
    slot: &mut Vec<T>,
    result: PortalResult<Vec<T>>,
    failures: &mut Vec<String>,
) {
    match result {
        Ok(rows) => *slot = rows,
        Err(e) => {
            warn!("Failed to load admin {}: {}", name, e);
            failures.push(format!("Failed to load {name}: {}", e.user_message()));
        }
    }
}
