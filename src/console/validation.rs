//! Form checks applied before a request is issued.
//!
//! Field checks return `Result<(), String>`; [`FormErrors`] collects them per field
//! and turns them into a single [`ClientError::InvalidRequest`].

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ClientError;
use crate::models::{EmployeeDraft, EquipmentDraft, LocationDraft};

lazy_static! {
    /// Pragmatic email shape: local part, `@`, dotted domain
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)+$"
    ).unwrap();

    /// Sign-in accounts may live on a bare host (`admin@localhost`)
    static ref LOGIN_EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)*$"
    ).unwrap();
}

/// Extensions accepted by the import endpoint.
pub const SPREADSHEET_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

pub fn validate_required(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", label));
    }
    Ok(())
}

/// Checks the value exactly as it will be sent; callers trim input once, up front.
pub fn validate_email(email: &str) -> Result<(), String> {
    check_email(email, &EMAIL_REGEX)
}

/// Like [`validate_email`], but the domain need not be dotted.
pub fn validate_login_email(email: &str) -> Result<(), String> {
    check_email(email, &LOGIN_EMAIL_REGEX)
}

fn check_email(email: &str, pattern: &Regex) -> Result<(), String> {
    validate_required(email, "Email")?;
    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }
    if !pattern.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Only `.xlsx` and `.xls` files can be imported.
pub fn validate_spreadsheet_path(path: &Path) -> Result<(), String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension {
        Some(ext) if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(format!(
            "Only Excel files (.xlsx, .xls) can be imported: {}",
            path.display()
        )),
    }
}

/// Field errors collected while checking a form.
#[derive(Debug, Default)]
pub struct FormErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Record the outcome of a field check.
    pub fn check(&mut self, field: &str, result: Result<(), String>) -> &mut Self {
        if let Err(message) = result {
            self.add(field, message);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn finish(self) -> Result<(), ClientError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let message = self
            .errors
            .into_values()
            .flatten()
            .collect::<Vec<_>>()
            .join("; ");
        Err(ClientError::InvalidRequest(message))
    }
}

/// A write payload that can be checked locally.
pub trait Validate {
    fn validate(&self) -> Result<(), ClientError>;
}

impl Validate for EquipmentDraft {
    fn validate(&self) -> Result<(), ClientError> {
        validate_equipment_draft(self)
    }
}

impl Validate for EmployeeDraft {
    fn validate(&self) -> Result<(), ClientError> {
        validate_employee_draft(self)
    }
}

impl Validate for LocationDraft {
    fn validate(&self) -> Result<(), ClientError> {
        validate_location_draft(self)
    }
}

pub fn validate_credentials(email: &str, password: &str) -> Result<(), ClientError> {
    let mut errors = FormErrors::new();
    errors
        .check("email", validate_login_email(email))
        .check("password", validate_required(password, "Password"));
    errors.finish()
}

pub fn validate_equipment_draft(draft: &EquipmentDraft) -> Result<(), ClientError> {
    let mut errors = FormErrors::new();
    errors
        .check("serial_number", validate_required(&draft.serial_number, "Serial number"))
        .check("model", validate_required(&draft.model, "Model"));
    errors.finish()
}

pub fn validate_employee_draft(draft: &EmployeeDraft) -> Result<(), ClientError> {
    let mut errors = FormErrors::new();
    errors
        .check("first_name", validate_required(&draft.first_name, "First name"))
        .check("last_name", validate_required(&draft.last_name, "Last name"))
        .check("email", validate_email(&draft.email))
        .check("department", validate_required(&draft.department, "Department"));
    errors.finish()
}

pub fn validate_location_draft(draft: &LocationDraft) -> Result<(), ClientError> {
    let mut errors = FormErrors::new();
    errors
        .check("site", validate_required(&draft.site, "Site"))
        .check("floor", validate_required(&draft.floor, "Floor"))
        .check("room", validate_required(&draft.room, "Room"));
    errors.finish()
}
