use domain_session::exception::GatewayException;
use infrastructure_command::ExpiryReason;
use thiserror::Error;

use crate::model::vo::{FieldErrors, WorkOrderField};

pub type WorkOrderResult<T> = Result<T, WorkOrderException>;

#[derive(Error, Debug)]
pub enum WorkOrderException {
    #[error("Session ended: {reason}.")]
    Unauthorized { reason: ExpiryReason },

    #[error("Invalid work order: {errors}")]
    Validation { errors: FieldErrors },

    #[error("Invalid value {value:?} for filter {field}: {reason}.")]
    InvalidFilter {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Rejected by server ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("No work order with number: {work_order_number}.")]
    NotFound { work_order_number: String },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Unexpected response payload: {message}")]
    Decode { message: String },

    #[error("Cannot {action} while {from}.")]
    InvalidTransition { from: &'static str, action: &'static str },

    #[error("Work order internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl WorkOrderException {
    pub fn validation(field: WorkOrderField, message: impl Into<String>) -> Self {
        Self::Validation {
            errors: FieldErrors::single(field, message),
        }
    }

    /// Transport failures are shown as a connection error state.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Errors that belong to a single form field rather than the whole form.
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            Self::Validation { errors } => Some(errors.clone()),
            Self::NotFound { work_order_number } => Some(FieldErrors::single(
                WorkOrderField::WorkOrderNumber,
                format!("No work order found with number {work_order_number}"),
            )),
            _ => None,
        }
    }
}

impl From<GatewayException> for WorkOrderException {
    fn from(e: GatewayException) -> Self {
        match e {
            GatewayException::Unauthorized { reason, .. } => Self::Unauthorized { reason },
            GatewayException::Status { status, message } => Self::Rejected { status, message },
            GatewayException::Connection { message } => Self::Connection { message },
            GatewayException::Decode { message } => Self::Decode { message },
            GatewayException::Encode { message } => Self::InternalError {
                source: anyhow::anyhow!("request body could not be encoded: {message}"),
            },
        }
    }
}

impl From<anyhow::Error> for WorkOrderException {
    fn from(e: anyhow::Error) -> Self {
        WorkOrderException::InternalError { source: e }
    }
}
