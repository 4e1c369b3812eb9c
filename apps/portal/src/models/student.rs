use serde::{Deserialize, Serialize};

use super::{lenient_f64, lenient_opt_i64};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: i64,
    #[serde(default)]
    pub roll_no: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub cgpa: f64,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub graduation_year: Option<i64>,
}

/// Body of `POST /admin/students`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewStudent {
    pub roll_no: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub cgpa: f64,
    pub graduation_year: i64,
}

/// Body of `PUT /admin/students/{id}`. Only the fields present are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StudentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i64>,
}

impl StudentUpdate {
    pub fn is_empty(&self) -> bool {
        *self == StudentUpdate::default()
    }
}
