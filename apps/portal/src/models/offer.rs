use std::str::FromStr;

use serde::Serialize;

use crate::errors::PortalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Accepted,
    Pending,
    Rejected,
}

impl FromStr for OfferStatus {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACCEPTED" => Ok(OfferStatus::Accepted),
            "PENDING" => Ok(OfferStatus::Pending),
            "REJECTED" => Ok(OfferStatus::Rejected),
            _ => Err(PortalError::Form(format!(
                "offer_status must be one of ACCEPTED, PENDING, REJECTED (got \"{s}\")"
            ))),
        }
    }
}

/// Body of `POST /admin/offers`. Creating an offer updates the matching
/// application's status on the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOffer {
    pub student_id: i64,
    pub job_id: i64,
    pub offer_status: OfferStatus,
}
