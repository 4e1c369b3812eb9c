use serde::{Deserialize, Serialize};

use super::lenient_opt_f64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub company_id: i64,
    pub company_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub package_lpa: Option<f64>,
}

/// Body of `POST /admin/companies`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCompany {
    pub company_name: String,
    pub location: String,
    pub package_lpa: f64,
}
