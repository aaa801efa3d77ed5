use std::sync::Arc;

use domain_work_order::{
    command::{CreateWorkOrderCommand, UpdateWorkOrderCommand, WorkOrderDraft},
    exception::{WorkOrderException, WorkOrderResult},
    model::{
        entity::WorkOrder,
        vo::{FieldErrors, WorkOrderField},
    },
    service::WorkOrderService,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// Create/edit form of one work order.
///
/// Validation runs before anything is sent. Server rejections never reset the
/// fields; they show up as a general error next to the per-field ones.
pub struct WorkOrderForm {
    service: Arc<dyn WorkOrderService>,
    mode: FormMode,
    pub work_order_number: String,
    pub draft: WorkOrderDraft,
    agent_name: Option<String>,
    field_errors: FieldErrors,
    general_error: Option<String>,
}

impl WorkOrderForm {
    /// Empty form; `agent_name` is the logged-in user stamped on creation.
    pub fn create(service: Arc<dyn WorkOrderService>, agent_name: Option<String>) -> Self {
        Self {
            service,
            mode: FormMode::Create,
            work_order_number: String::new(),
            draft: WorkOrderDraft::default(),
            agent_name,
            field_errors: FieldErrors::new(),
            general_error: None,
        }
    }

    pub fn edit(service: Arc<dyn WorkOrderService>, work_order: &WorkOrder) -> Self {
        let mut form = Self::create(service, None);
        form.load(work_order);
        form
    }

    fn load(&mut self, work_order: &WorkOrder) {
        self.mode = FormMode::Edit {
            id: work_order.id.clone(),
        };
        self.work_order_number = work_order.work_order_number.clone();
        self.agent_name = work_order.agent_name.clone();
        self.draft = WorkOrderDraft {
            visit_inst_date: Some(work_order.visit_inst_date),
            work_order_type: work_order.work_order_type.clone(),
            customer_name: work_order.customer_name.clone(),
            customer_phone: work_order.customer_phone.clone(),
            area: work_order.area.clone(),
            area_code: work_order.area_code,
            supervisor: work_order.supervisor.clone(),
            technician: work_order.technician.clone(),
            hours: work_order.hours,
            work_order_status: Some(work_order.work_order_status),
            job_status: work_order.job_status,
            distribution: work_order.distribution.clone(),
            description: Some(work_order.description.clone()),
            reschedule_date: work_order.reschedule_date,
        };
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn agent_name(&self) -> Option<&str> {
        self.agent_name.as_deref()
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// Banner text of the last server rejection.
    pub fn general_error(&self) -> Option<&str> {
        self.general_error.as_deref()
    }

    /// Recompute per-field errors. Returns whether the form can be submitted.
    pub fn validate(&mut self) -> bool {
        let mut errors = FieldErrors::new();
        if self.work_order_number.trim().is_empty() {
            errors.insert(WorkOrderField::WorkOrderNumber, "Work order number is required");
        }
        self.draft.check(&mut errors);
        self.field_errors = errors;
        self.field_errors.is_empty()
    }

    pub async fn submit(&mut self) -> WorkOrderResult<WorkOrder> {
        if self.mode == FormMode::Create {
            self.submit_create().await
        } else {
            self.submit_update().await
        }
    }

    pub async fn submit_create(&mut self) -> WorkOrderResult<WorkOrder> {
        self.ensure_valid()?;
        let command = CreateWorkOrderCommand {
            work_order_number: self.work_order_number.trim().to_owned(),
            draft: self.draft.clone(),
            agent_name: self.agent_name.clone(),
        };
        let result = self.service.create(command).await;
        self.finish(result)
    }

    pub async fn submit_update(&mut self) -> WorkOrderResult<WorkOrder> {
        let FormMode::Edit { id } = &self.mode else {
            return Err(WorkOrderException::InvalidTransition {
                from: "creating",
                action: "update",
            });
        };
        let id = id.clone();
        self.ensure_valid()?;
        let command = UpdateWorkOrderCommand {
            id,
            draft: self.draft.clone(),
        };
        let result = self.service.update(command).await;
        self.finish(result)
    }

    /// Load an existing work order by number into the form for editing.
    pub async fn lookup_existing(&mut self, number: &str) -> WorkOrderResult<WorkOrder> {
        self.general_error = None;
        match self.service.find_by_number(number).await {
            Ok(work_order) => {
                self.load(&work_order);
                self.field_errors = FieldErrors::new();
                Ok(work_order)
            }
            Err(e) => {
                self.record(&e);
                Err(e)
            }
        }
    }

    fn ensure_valid(&mut self) -> WorkOrderResult<()> {
        self.general_error = None;
        if self.validate() {
            Ok(())
        } else {
            Err(WorkOrderException::Validation {
                errors: self.field_errors.clone(),
            })
        }
    }

    fn finish(&mut self, result: WorkOrderResult<WorkOrder>) -> WorkOrderResult<WorkOrder> {
        match result {
            Ok(work_order) => {
                self.field_errors = FieldErrors::new();
                self.general_error = None;
                if self.mode == FormMode::Create {
                    self.load(&work_order);
                }
                Ok(work_order)
            }
            Err(e) => {
                self.record(&e);
                Err(e)
            }
        }
    }

    fn record(&mut self, e: &WorkOrderException) {
        match e.field_errors() {
            Some(errors) => self.field_errors = errors,
            None => self.general_error = Some(e.to_string()),
        }
    }
}
