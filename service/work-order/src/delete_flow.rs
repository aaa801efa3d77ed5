use std::sync::Arc;

use domain_work_order::{
    exception::{WorkOrderException, WorkOrderResult},
    model::entity::WorkOrder,
    service::WorkOrderService,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub id: String,
    pub work_order_number: String,
}

impl From<&WorkOrder> for DeleteTarget {
    fn from(work_order: &WorkOrder) -> Self {
        Self {
            id: work_order.id.clone(),
            work_order_number: work_order.work_order_number.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteState {
    Idle,
    PendingConfirmation {
        target: DeleteTarget,
        /// Message of the last failed attempt.
        error: Option<String>,
    },
    Deleting {
        target: DeleteTarget,
    },
}

impl DeleteState {
    fn name(&self) -> &'static str {
        match self {
            DeleteState::Idle => "idle",
            DeleteState::PendingConfirmation { .. } => "awaiting confirmation",
            DeleteState::Deleting { .. } => "deleting",
        }
    }
}

/// Confirmation dialog around deleting one work order.
///
/// `Idle -> PendingConfirmation -> Deleting -> Idle`; a failed delete goes
/// back to `PendingConfirmation` carrying the error.
pub struct DeleteFlow {
    service: Arc<dyn WorkOrderService>,
    state: DeleteState,
}

impl DeleteFlow {
    pub fn new(service: Arc<dyn WorkOrderService>) -> Self {
        Self {
            service,
            state: DeleteState::Idle,
        }
    }

    pub fn state(&self) -> &DeleteState {
        &self.state
    }

    pub fn select(&mut self, target: impl Into<DeleteTarget>) -> WorkOrderResult<()> {
        match self.state {
            DeleteState::Idle | DeleteState::PendingConfirmation { .. } => {
                self.state = DeleteState::PendingConfirmation {
                    target: target.into(),
                    error: None,
                };
                Ok(())
            }
            DeleteState::Deleting { .. } => Err(WorkOrderException::InvalidTransition {
                from: self.state.name(),
                action: "select another work order",
            }),
        }
    }

    pub fn cancel(&mut self) -> WorkOrderResult<()> {
        match self.state {
            DeleteState::Idle => Ok(()),
            DeleteState::PendingConfirmation { .. } => {
                self.state = DeleteState::Idle;
                Ok(())
            }
            DeleteState::Deleting { .. } => Err(WorkOrderException::InvalidTransition {
                from: self.state.name(),
                action: "cancel",
            }),
        }
    }

    /// Delete the selected work order. Only valid while awaiting confirmation.
    pub async fn confirm(&mut self) -> WorkOrderResult<DeleteTarget> {
        let target = match &self.state {
            DeleteState::PendingConfirmation { target, .. } => target.clone(),
            other => {
                return Err(WorkOrderException::InvalidTransition {
                    from: other.name(),
                    action: "confirm deletion",
                })
            }
        };
        self.state = DeleteState::Deleting {
            target: target.clone(),
        };

        match self.service.delete(&target.id).await {
            Ok(()) => {
                self.state = DeleteState::Idle;
                Ok(target)
            }
            Err(e) => {
                self.state = DeleteState::PendingConfirmation {
                    target,
                    error: Some(e.to_string()),
                };
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use domain_work_order::mock::MockWorkOrderService;

    use super::*;

    fn target() -> DeleteTarget {
        DeleteTarget {
            id: "65f0".into(),
            work_order_number: "WO-7".into(),
        }
    }

    #[tokio::test]
    async fn confirm_requires_a_selection() {
        let mut service = MockWorkOrderService::new();
        service.expect_delete().never();
        let mut flow = DeleteFlow::new(Arc::new(service));

        let err = flow.confirm().await.unwrap_err();
        assert!(matches!(err, WorkOrderException::InvalidTransition { .. }));
        assert_eq!(flow.state(), &DeleteState::Idle);

        flow.select(target()).unwrap();
        flow.cancel().unwrap();
        assert!(flow.confirm().await.is_err());
    }

    #[tokio::test]
    async fn success_returns_to_idle() {
        let mut service = MockWorkOrderService::new();
        service
            .expect_delete()
            .withf(|id| id == "65f0")
            .times(1)
            .returning(|_| Ok(()));
        let mut flow = DeleteFlow::new(Arc::new(service));

        flow.select(target()).unwrap();
        assert_eq!(flow.confirm().await.unwrap(), target());
        assert_eq!(flow.state(), &DeleteState::Idle);
    }

    #[tokio::test]
    async fn failure_keeps_the_dialog_open() {
        let mut service = MockWorkOrderService::new();
        service.expect_delete().times(1).returning(|_| {
            Err(WorkOrderException::Rejected {
                status: 409,
                message: "Work order is locked".into(),
            })
        });
        let mut flow = DeleteFlow::new(Arc::new(service));

        flow.select(target()).unwrap();
        assert!(flow.confirm().await.is_err());
        match flow.state() {
            DeleteState::PendingConfirmation { target: t, error } => {
                assert_eq!(t, &target());
                assert!(error.as_deref().unwrap().contains("locked"));
            }
            other => panic!("unexpected state {other:?}"),
        }
    }
}
