use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::exception::{WorkOrderException, WorkOrderResult};
use crate::model::vo::{
    date, AreaCode, DateRangeShortcut, ExportFormat, FieldErrors, FilterField, JobStatus,
    ListFilter, WorkOrderField, WorkOrderStatus,
};

pub const MIN_DESCRIPTION_CHARS: usize = 10;
pub const MAX_HOURS: f64 = 100.0;

static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$").unwrap());

/// Editable attributes of a work order, shared by create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderDraft {
    #[serde(default, with = "date::option", skip_serializing_if = "Option::is_none")]
    pub visit_inst_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_code: Option<AreaCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order_status: Option<WorkOrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, with = "date::option", skip_serializing_if = "Option::is_none")]
    pub reschedule_date: Option<NaiveDate>,
}

impl WorkOrderDraft {
    /// Field rules of the work-order form.
    pub fn check(&self, errors: &mut FieldErrors) {
        if self.visit_inst_date.is_none() {
            errors.insert(WorkOrderField::VisitInstDate, "Visit date is required");
        }

        match self.description.as_deref().map(str::trim) {
            None | Some("") => {
                errors.insert(WorkOrderField::Description, "Description is required");
            }
            Some(text) if text.chars().count() < MIN_DESCRIPTION_CHARS => {
                errors.insert(
                    WorkOrderField::Description,
                    format!("Description must be at least {MIN_DESCRIPTION_CHARS} characters"),
                );
            }
            Some(_) => {}
        }

        if let Some(hours) = self.hours {
            if !(0.0..=MAX_HOURS).contains(&hours) {
                errors.insert(
                    WorkOrderField::Hours,
                    format!("Hours must be between 0 and {MAX_HOURS}"),
                );
            }
        }

        if let Some(phone) = self.customer_phone.as_deref().map(str::trim) {
            if !phone.is_empty() && !PHONE.is_match(phone) {
                errors.insert(WorkOrderField::CustomerPhone, "Invalid phone number");
            }
        }

        if let (Some(visit), Some(reschedule)) = (self.visit_inst_date, self.reschedule_date) {
            if reschedule < visit {
                errors.insert(
                    WorkOrderField::RescheduleDate,
                    "Reschedule date cannot be before the visit date",
                );
            }
        }
    }

    /// Trim free-text fields and drop the ones left blank.
    pub fn normalised(mut self) -> Self {
        for field in [
            &mut self.work_order_type,
            &mut self.customer_name,
            &mut self.customer_phone,
            &mut self.area,
            &mut self.supervisor,
            &mut self.technician,
            &mut self.distribution,
            &mut self.description,
        ] {
            *field = field
                .take()
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty());
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkOrderCommand {
    pub work_order_number: String,
    #[serde(flatten)]
    pub draft: WorkOrderDraft,
    /// Stamped from the logged-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
}

impl CreateWorkOrderCommand {
    pub fn validate(&self) -> WorkOrderResult<()> {
        let mut errors = FieldErrors::new();
        if self.work_order_number.trim().is_empty() {
            errors.insert(WorkOrderField::WorkOrderNumber, "Work order number is required");
        }
        self.draft.check(&mut errors);
        errors
            .into_result()
            .map_err(|errors| WorkOrderException::Validation { errors })
    }
}

/// Full update of an existing record. The number and agent are never sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkOrderCommand {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub draft: WorkOrderDraft,
}

impl UpdateWorkOrderCommand {
    pub fn validate(&self) -> WorkOrderResult<()> {
        let mut errors = FieldErrors::new();
        self.draft.check(&mut errors);
        errors
            .into_result()
            .map_err(|errors| WorkOrderException::Validation { errors })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchStatusCommand {
    #[serde(skip)]
    pub id: String,
    pub work_order_status: WorkOrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_status: Option<JobStatus>,
}

/// Fields that may be set on many work orders at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order_status: Option<WorkOrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_code: Option<AreaCode>,
}

impl BulkChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateCommand {
    pub ids: Vec<String>,
    pub updates: BulkChanges,
}

impl BulkUpdateCommand {
    pub fn validate(&self) -> WorkOrderResult<()> {
        let mut errors = FieldErrors::new();
        if self.ids.iter().all(|id| id.trim().is_empty()) {
            errors.insert(WorkOrderField::Ids, "Select at least one work order");
        }
        if self.updates.is_empty() {
            errors.insert(WorkOrderField::WorkOrderStatus, "Nothing to update");
        }
        errors
            .into_result()
            .map_err(|errors| WorkOrderException::Validation { errors })
    }
}

/// Download of the filtered list as a spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportCommand {
    pub filter: ListFilter,
    pub format: ExportFormat,
    pub range: DateRangeShortcut,
}

impl ExportCommand {
    /// List query without pagination, plus format and the resolved date window.
    pub fn to_query(&self, now: DateTime<Utc>) -> BTreeMap<String, String> {
        let mut query = self.filter.to_query();
        query.remove(FilterField::Page.as_str());
        query.remove(FilterField::Limit.as_str());
        query.insert("format".to_owned(), self.format.as_str().to_owned());
        if let Some((start, end)) = self.range.resolve(now) {
            query.insert(FilterField::StartDate.as_str().to_owned(), date::format_date(start));
            query.insert(FilterField::EndDate.as_str().to_owned(), date::format_date(end));
        }
        query
    }

    /// `work-orders-<range>-<date>.<ext>`
    pub fn file_name(&self, now: DateTime<Utc>) -> String {
        format!(
            "work-orders-{}-{}.{}",
            self.range,
            date::format_date(now.date_naive()),
            self.format.extension()
        )
    }
}
