//! Form input for the admin create/update actions.
//!
//! Fields arrive as `key=value` tokens. Each form only honors the input
//! constraints a browser form would: required fields must be non-empty and
//! numeric inputs must parse. Business rules are left to the server.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::errors::{PortalError, PortalResult};
use crate::models::{NewCompany, NewJob, NewOffer, NewStudent, OfferStatus, StudentUpdate};

const STUDENT_FIELDS: &[&str] = &["roll_no", "name", "email", "department", "cgpa", "graduation_year"];
const COMPANY_FIELDS: &[&str] = &["company_name", "location", "package_lpa"];
const JOB_FIELDS: &[&str] = &["company_id", "role_name", "min_cgpa", "eligible_branches"];
const OFFER_FIELDS: &[&str] = &["student_id", "job_id", "offer_status"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    values: BTreeMap<String, String>,
}

impl FormFields {
    /// Parses `key=value` tokens. Later duplicates replace earlier ones.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> PortalResult<Self> {
        let mut values = BTreeMap::new();
        for token in tokens {
            let token = token.as_ref();
            let (key, value) = token.split_once('=').ok_or_else(|| {
                PortalError::Form(format!("expected field=value, got \"{token}\""))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(PortalError::Form(format!("missing field name in \"{token}\"")));
            }
            values.insert(key.to_string(), value.trim().to_string());
        }
        Ok(Self { values })
    }

    fn only(&self, allowed: &[&str]) -> PortalResult<()> {
        match self.values.keys().find(|k| !allowed.contains(&k.as_str())) {
            Some(unknown) => Err(PortalError::Form(format!(
                "unknown field \"{unknown}\" (expected {})",
                allowed.join(", ")
            ))),
            None => Ok(()),
        }
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    fn required_text(&self, key: &str) -> PortalResult<String> {
        self.text(key)
            .map(str::to_string)
            .ok_or_else(|| PortalError::Form(format!("{key} is required")))
    }

    fn optional_number<T: FromStr>(&self, key: &str) -> PortalResult<Option<T>> {
        self.text(key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| PortalError::Form(format!("{key} must be a number (got \"{raw}\")")))
            })
            .transpose()
    }

    fn required_number<T: FromStr>(&self, key: &str) -> PortalResult<T> {
        self.optional_number(key)?
            .ok_or_else(|| PortalError::Form(format!("{key} is required")))
    }
}

impl TryFrom<&FormFields> for NewStudent {
    type Error = PortalError;

    fn try_from(form: &FormFields) -> PortalResult<Self> {
        form.only(STUDENT_FIELDS)?;
        Ok(NewStudent {
            roll_no: form.required_text("roll_no")?,
            name: form.required_text("name")?,
            email: form.required_text("email")?,
            department: form.required_text("department")?,
            cgpa: form.required_number("cgpa")?,
            graduation_year: form.required_number("graduation_year")?,
        })
    }
}

impl TryFrom<&FormFields> for StudentUpdate {
    type Error = PortalError;

    fn try_from(form: &FormFields) -> PortalResult<Self> {
        form.only(STUDENT_FIELDS)?;
        let update = StudentUpdate {
            roll_no: form.text("roll_no").map(str::to_string),
            name: form.text("name").map(str::to_string),
            email: form.text("email").map(str::to_string),
            department: form.text("department").map(str::to_string),
            cgpa: form.optional_number("cgpa")?,
            graduation_year: form.optional_number("graduation_year")?,
        };
        if update.is_empty() {
            return Err(PortalError::Form("No fields to update".to_string()));
        }
        Ok(update)
    }
}

impl TryFrom<&FormFields> for NewCompany {
    type Error = PortalError;

    fn try_from(form: &FormFields) -> PortalResult<Self> {
        form.only(COMPANY_FIELDS)?;
        Ok(NewCompany {
            company_name: form.required_text("company_name")?,
            location: form.required_text("location")?,
            package_lpa: form.required_number("package_lpa")?,
        })
    }
}

impl TryFrom<&FormFields> for NewJob {
    type Error = PortalError;

    fn try_from(form: &FormFields) -> PortalResult<Self> {
        form.only(JOB_FIELDS)?;
        Ok(NewJob {
            company_id: form.required_number("company_id")?,
            role_name: form.required_text("role_name")?,
            min_cgpa: form.required_number("min_cgpa")?,
            eligible_branches: form.required_text("eligible_branches")?,
        })
    }
}

impl TryFrom<&FormFields> for NewOffer {
    type Error = PortalError;

    fn try_from(form: &FormFields) -> PortalResult<Self> {
        form.only(OFFER_FIELDS)?;
        Ok(NewOffer {
            student_id: form.required_number("student_id")?,
            job_id: form.required_number("job_id")?,
            offer_status: form.required_text("offer_status")?.parse::<OfferStatus>()?,
        })
    }
}
