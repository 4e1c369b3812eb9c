/// API client: the single point of entry for every call to the placement backend.
///
/// No other module builds HTTP requests. The session talks to the backend only
/// through the `PlacementApi` trait, which lets tests swap in an in-memory fake.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::{PortalError, PortalResult};
use crate::models::{
    Application, ApplyRequest, Company, EligibilityResult, Job, NewCompany, NewJob, NewOffer,
    NewStudent, PlacementStat, ServerMessage, Student, StudentPlacement, StudentUpdate,
};

#[cfg(test)]
pub mod fake;

const STUDENT_NOT_FOUND: &str = "Student not found";

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The backend contract. Implementations are shared as `Arc<dyn PlacementApi>`.
#[async_trait]
pub trait PlacementApi: Send + Sync {
    async fn get_student(&self, student_id: i64) -> PortalResult<Student>;
    async fn list_jobs(&self) -> PortalResult<Vec<Job>>;
    async fn student_applications(&self, student_id: i64) -> PortalResult<Vec<Application>>;
    async fn check_eligibility(&self, student_id: i64, job_id: i64) -> PortalResult<EligibilityResult>;
    async fn apply(&self, request: &ApplyRequest) -> PortalResult<ServerMessage>;

    async fn list_students(&self) -> PortalResult<Vec<Student>>;
    async fn list_companies(&self) -> PortalResult<Vec<Company>>;
    async fn list_all_applications(&self) -> PortalResult<Vec<Application>>;
    async fn placement_stats(&self) -> PortalResult<Vec<PlacementStat>>;
    async fn student_placements(&self) -> PortalResult<Vec<StudentPlacement>>;

    async fn create_student(&self, student: &NewStudent) -> PortalResult<ServerMessage>;
    async fn update_student(&self, student_id: i64, update: &StudentUpdate) -> PortalResult<ServerMessage>;
    async fn delete_student(&self, student_id: i64) -> PortalResult<ServerMessage>;
    async fn create_company(&self, company: &NewCompany) -> PortalResult<ServerMessage>;
    async fn delete_company(&self, company_id: i64) -> PortalResult<ServerMessage>;
    async fn create_job(&self, job: &NewJob) -> PortalResult<ServerMessage>;
    async fn delete_job(&self, job_id: i64) -> PortalResult<ServerMessage>;
    async fn create_offer(&self, offer: &NewOffer) -> PortalResult<ServerMessage>;
}

// ────────────────────────────────────────────────────────────────────────────
// ApiClient: reqwest implementation
// ────────────────────────────────────────────────────────────────────────────

/// HTTP client bound to one backend base address. No retries: a failed call
/// is reported once and the action is abandoned.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> PortalResult<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("{} {}", method, path);
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> PortalResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        read_json(response).await
    }

    async fn send_json<B: serde::Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> PortalResult<ServerMessage> {
        let response = self.request(method, path).json(body).send().await?;
        read_json(response).await
    }

    async fn delete(&self, path: &str) -> PortalResult<ServerMessage> {
        let response = self.request(Method::DELETE, path).send().await?;
        read_json(response).await
    }
}

/// Decodes a success body, or turns a non-2xx response into `PortalError::Api`
/// carrying the body's `error`/`message` text.
async fn read_json<T: DeserializeOwned>(response: Response) -> PortalResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("Backend returned {}: {}", status, body);
        let message = serde_json::from_str::<ServerMessage>(&body)
            .ok()
            .and_then(|m| m.error.or(m.message))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
        return Err(PortalError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl PlacementApi for ApiClient {
    async fn get_student(&self, student_id: i64) -> PortalResult<Student> {
        let response = self
            .request(Method::GET, &format!("/students/{student_id}"))
            .send()
            .await?;
        if !response.status().is_success() {
            warn!("Student lookup for {} returned {}", student_id, response.status());
            return Err(PortalError::NotFound(STUDENT_NOT_FOUND.to_string()));
        }
        read_json(response).await
    }

    async fn list_jobs(&self) -> PortalResult<Vec<Job>> {
        self.get_json("/jobs").await
    }

    async fn student_applications(&self, student_id: i64) -> PortalResult<Vec<Application>> {
        self.get_json(&format!("/applications/{student_id}")).await
    }

    async fn check_eligibility(&self, student_id: i64, job_id: i64) -> PortalResult<EligibilityResult> {
        let response = self
            .request(Method::GET, "/eligibility")
            .query(&[("student_id", student_id), ("job_id", job_id)])
            .send()
            .await?;
        read_json(response).await
    }

    async fn apply(&self, request: &ApplyRequest) -> PortalResult<ServerMessage> {
        self.send_json(Method::POST, "/apply", request).await
    }

    async fn list_students(&self) -> PortalResult<Vec<Student>> {
        self.get_json("/admin/students").await
    }

    async fn list_companies(&self) -> PortalResult<Vec<Company>> {
        self.get_json("/admin/companies").await
    }

    async fn list_all_applications(&self) -> PortalResult<Vec<Application>> {
        self.get_json("/admin/applications").await
    }

    async fn placement_stats(&self) -> PortalResult<Vec<PlacementStat>> {
        self.get_json("/admin/stats/placement").await
    }

    async fn student_placements(&self) -> PortalResult<Vec<StudentPlacement>> {
        self.get_json("/admin/stats/student-placements").await
    }

    async fn create_student(&self, student: &NewStudent) -> PortalResult<ServerMessage> {
        self.send_json(Method::POST, "/admin/students", student).await
    }

    async fn update_student(&self, student_id: i64, update: &StudentUpdate) -> PortalResult<ServerMessage> {
        self.send_json(Method::PUT, &format!("/admin/students/{student_id}"), update)
            .await
    }

    async fn delete_student(&self, student_id: i64) -> PortalResult<ServerMessage> {
        self.delete(&format!("/admin/students/{student_id}")).await
    }

    async fn create_company(&self, company: &NewCompany) -> PortalResult<ServerMessage> {
        self.send_json(Method::POST, "/admin/companies", company).await
    }

    async fn delete_company(&self, company_id: i64) -> PortalResult<ServerMessage> {
        self.delete(&format!("/admin/companies/{company_id}")).await
    }

    async fn create_job(&self, job: &NewJob) -> PortalResult<ServerMessage> {
        self.send_json(Method::POST, "/admin/jobs", job).await
    }

    async fn delete_job(&self, job_id: i64) -> PortalResult<ServerMessage> {
        self.delete(&format!("/admin/jobs/{job_id}")).await
    }

    async fn create_offer(&self, offer: &NewOffer) -> PortalResult<ServerMessage> {
        self.send_json(Method::POST, "/admin/offers", offer).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::{delete, get, post, put},
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::models::OfferStatus;

    /// Serves `router` on an ephemeral port and returns its base address.
    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_student_lookup_success() {
        let router = Router::new().route(
            "/students/:id",
            get(|Path(id): Path<i64>| async move {
                Json(json!({"student_id": id, "name": "Asha", "cgpa": "8.20", "department": "CSE"}))
            }),
        );
        let api = client(&spawn_stub(router).await);

        let student = api.get_student(101).await.unwrap();
        assert_eq!(student.student_id, 101);
        assert_eq!(student.name, "Asha");
        assert!((student.cgpa - 8.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_student_lookup_not_found_is_generic() {
        let router = Router::new().route(
            "/students/:id",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({"error": "no such row"}))) }),
        );
        let api = client(&spawn_stub(router).await);

        let err = api.get_student(999).await.unwrap_err();
        assert!(matches!(err, PortalError::NotFound(_)));
        assert_eq!(err.user_message(), "Student not found");
    }

    #[tokio::test]
    async fn test_eligibility_sends_both_ids_as_query() {
        let router = Router::new().route(
            "/eligibility",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let eligible = params.get("student_id").map(String::as_str) == Some("101")
                    && params.get("job_id").map(String::as_str) == Some("7");
                let status = if eligible { "ELIGIBLE" } else { "NOT ELIGIBLE" };
                Json(json!({ "status": status }))
            }),
        );
        let api = client(&spawn_stub(router).await);

        assert!(api.check_eligibility(101, 7).await.unwrap().is_eligible());
        assert!(!api.check_eligibility(101, 8).await.unwrap().is_eligible());
    }

    #[tokio::test]
    async fn test_apply_failure_carries_server_error() {
        let router = Router::new().route(
            "/apply",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body, json!({"student_id": 101, "job_id": 7}));
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "Already applied for this job"})),
                )
            }),
        );
        let api = client(&spawn_stub(router).await);

        let err = api
            .apply(&ApplyRequest { student_id: 101, job_id: 7 })
            .await
            .unwrap_err();
        match err {
            PortalError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Already applied for this job");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_company_posts_typed_body() {
        let router = Router::new().route(
            "/admin/companies",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["package_lpa"], json!(12.0));
                (
                    StatusCode::CREATED,
                    Json(json!({"message": format!("Created {}", body["company_name"].as_str().unwrap_or_default())})),
                )
            }),
        );
        let api = client(&spawn_stub(router).await);

        let msg = api
            .create_company(&NewCompany {
                company_name: "Acme".to_string(),
                location: "Pune".to_string(),
                package_lpa: 12.0,
            })
            .await
            .unwrap();
        assert_eq!(msg.text_or("fallback"), "Created Acme");
    }

    #[tokio::test]
    async fn test_delete_and_offer_paths() {
        let router = Router::new()
            .route(
                "/admin/students/:id",
                delete(|Path(id): Path<i64>| async move {
                    Json(json!({"message": format!("Deleted {id}")}))
                }),
            )
            .route(
                "/admin/offers",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["offer_status"], json!("REJECTED"));
                    (StatusCode::CREATED, Json(json!({"offer_id": 3})))
                }),
            );
        let api = client(&spawn_stub(router).await);

        let msg = api.delete_student(42).await.unwrap();
        assert_eq!(msg.message.as_deref(), Some("Deleted 42"));

        let msg = api
            .create_offer(&NewOffer {
                student_id: 101,
                job_id: 7,
                offer_status: OfferStatus::Rejected,
            })
            .await
            .unwrap();
        assert_eq!(msg.text_or("Offer created"), "Offer created");
    }

    #[tokio::test]
    async fn test_update_student_puts_only_given_fields() {
        let router = Router::new().route(
            "/admin/students/:id",
            put(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                assert_eq!(id, 101);
                assert_eq!(body, json!({"cgpa": 9.1}));
                Json(json!({"message": "Student updated successfully"}))
            }),
        );
        let api = client(&spawn_stub(router).await);

        let update = StudentUpdate {
            cgpa: Some(9.1),
            ..Default::default()
        };
        let msg = api.update_student(101, &update).await.unwrap();
        assert_eq!(msg.text_or("fallback"), "Student updated successfully");
    }

    #[tokio::test]
    async fn test_listing_error_without_body_uses_status() {
        let router = Router::new().route(
            "/admin/stats/placement",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let api = client(&spawn_stub(router).await);

        let err = api.placement_stats().await.unwrap_err();
        assert_eq!(err.user_message(), "Request failed with status 500");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}")).list_jobs().await.unwrap_err();
        assert!(matches!(err, PortalError::Http(_)));
        assert!(!err.is_server_reported());
    }
}
