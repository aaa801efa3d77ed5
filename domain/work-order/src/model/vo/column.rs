use super::date::format_date;
use crate::model::entity::WorkOrder;

wire_enum! {
    /// Columns of the work-order table, in display order.
    pub enum Column {
        WorkOrderNumber => "workOrderNumber",
        VisitInstDate => "visitInstDate",
        WorkOrderType => "workOrderType",
        CustomerName => "customerName",
        CustomerPhone => "customerPhone",
        Area => "area",
        AreaCode => "areaCode",
        Supervisor => "supervisor",
        Technician => "technician",
        Hours => "hours",
        WorkOrderStatus => "workOrderStatus",
        JobStatus => "jobStatus",
        Distribution => "distribution",
        Description => "description",
        RescheduleDate => "rescheduleDate",
        AgentName => "agentName",
    }
}

impl Column {
    pub fn label(&self) -> &'static str {
        match self {
            Column::WorkOrderNumber => "WO Number",
            Column::VisitInstDate => "Visit Date",
            Column::WorkOrderType => "Type",
            Column::CustomerName => "Customer",
            Column::CustomerPhone => "Phone",
            Column::Area => "Area",
            Column::AreaCode => "Area Code",
            Column::Supervisor => "Supervisor",
            Column::Technician => "Technician",
            Column::Hours => "Hours",
            Column::WorkOrderStatus => "Status",
            Column::JobStatus => "Job Status",
            Column::Distribution => "Distribution",
            Column::Description => "Description",
            Column::RescheduleDate => "Reschedule Date",
            Column::AgentName => "Agent",
        }
    }

    /// Rendered cell text; missing values render as an empty string.
    pub fn cell(&self, work_order: &WorkOrder) -> String {
        fn text(value: &Option<String>) -> String {
            value.clone().unwrap_or_default()
        }

        match self {
            Column::WorkOrderNumber => work_order.work_order_number.clone(),
            Column::VisitInstDate => format_date(work_order.visit_inst_date),
            Column::WorkOrderType => text(&work_order.work_order_type),
            Column::CustomerName => text(&work_order.customer_name),
            Column::CustomerPhone => text(&work_order.customer_phone),
            Column::Area => text(&work_order.area),
            Column::AreaCode => work_order
                .area_code
                .map(|c| c.to_string())
                .unwrap_or_default(),
            Column::Supervisor => text(&work_order.supervisor),
            Column::Technician => text(&work_order.technician),
            Column::Hours => work_order
                .hours
                .map(|h| format!("{h:.1}"))
                .unwrap_or_default(),
            Column::WorkOrderStatus => work_order.work_order_status.to_string(),
            Column::JobStatus => work_order
                .job_status
                .map(|s| s.to_string())
                .unwrap_or_default(),
            Column::Distribution => text(&work_order.distribution),
            Column::Description => work_order.description.clone(),
            Column::RescheduleDate => work_order
                .reschedule_date
                .map(format_date)
                .unwrap_or_default(),
            Column::AgentName => text(&work_order.agent_name),
        }
    }
}
