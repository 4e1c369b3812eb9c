use std::fmt;

use serde::{Deserialize, Serialize};

use super::{lenient_opt_f64, lenient_opt_i64};

/// Status of an application. Transitions happen server-side only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    Applied,
    Pending,
    Shortlisted,
    Offered,
    Accepted,
    Rejected,
    Other(String),
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Shortlisted => "SHORTLISTED",
            ApplicationStatus::Offered => "OFFERED",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Other(raw) => raw,
        }
    }

    /// Lower-cased style tag used when rendering the status badge.
    pub fn css_class(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl From<String> for ApplicationStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "APPLIED" => ApplicationStatus::Applied,
            "PENDING" => ApplicationStatus::Pending,
            "SHORTLISTED" => ApplicationStatus::Shortlisted,
            "OFFERED" => ApplicationStatus::Offered,
            "ACCEPTED" => ApplicationStatus::Accepted,
            "REJECTED" => ApplicationStatus::Rejected,
            _ => ApplicationStatus::Other(raw),
        }
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An application joined with its job and company. The admin listing also
/// carries `student_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub application_id: i64,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub job_id: Option<i64>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub role_name: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub package_lpa: Option<f64>,
    #[serde(default)]
    pub applied_date: String,
    pub status: ApplicationStatus,
}

/// Body of `POST /apply`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApplyRequest {
    pub student_id: i64,
    pub job_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_css_class_is_lowercase() {
        assert_eq!(ApplicationStatus::from("APPLIED".to_string()).css_class(), "applied");
        assert_eq!(ApplicationStatus::from("offered".to_string()), ApplicationStatus::Offered);
    }

    #[test]
    fn test_unknown_status_is_carried_through() {
        let status = ApplicationStatus::from("ON_HOLD".to_string());
        assert_eq!(status, ApplicationStatus::Other("ON_HOLD".to_string()));
        assert_eq!(status.css_class(), "on_hold");
    }

    #[test]
    fn test_admin_application_row() {
        let app: Application = serde_json::from_str(
            r#"{
                "application_id": 3, "student_id": 101, "job_id": 7,
                "student_name": "Asha", "role_name": "SDE", "company_name": "Acme",
                "applied_date": "Tue, 14 Jan 2025 00:00:00 GMT", "status": "PENDING"
            }"#,
        )
        .unwrap();
        assert_eq!(app.student_name.as_deref(), Some("Asha"));
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.package_lpa, None);
    }
}
