use serde::{Deserialize, Serialize};

use super::{lenient_f64, lenient_opt_f64, lenient_opt_i64};

/// A job role joined with its company, as listed by `GET /jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: i64,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub company_id: Option<i64>,
    pub role_name: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub package_lpa: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub min_cgpa: f64,
    #[serde(default)]
    pub eligible_branches: String,
}

/// Body of `POST /admin/jobs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewJob {
    pub company_id: i64,
    pub role_name: String,
    pub min_cgpa: f64,
    pub eligible_branches: String,
}
