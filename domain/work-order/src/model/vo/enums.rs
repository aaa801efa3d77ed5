wire_enum! {
    /// Lifecycle of a work order.
    pub enum WorkOrderStatus {
        Pending => "Pending",
        Assigned => "Assigned",
        InProgress => "In Progress",
        OnHold => "On Hold",
        Rescheduled => "Rescheduled",
        AwaitingParts => "Awaiting Parts",
        Escalated => "Escalated",
        CustomerNotAvailable => "Customer Not Available",
        Completed => "Completed",
        Cancelled => "Cancelled",
        Closed => "Closed",
        Reopened => "Reopened",
    }
}

wire_enum! {
    /// Whether the technician attended the visit.
    pub enum JobStatus {
        Attend => "Attend",
        NotAttend => "Not Attend",
    }
}

wire_enum! {
    pub enum AreaCode {
        North => "NORTH",
        South => "SOUTH",
        East => "EAST",
        West => "WEST",
        Central => "CENTRAL",
        Coastal => "COASTAL",
        Remote => "REMOTE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_parse_leniently() {
        assert_eq!("in-progress".parse::<WorkOrderStatus>(), Ok(WorkOrderStatus::InProgress));
        assert_eq!("CUSTOMER_NOT_AVAILABLE".parse::<WorkOrderStatus>(), Ok(WorkOrderStatus::CustomerNotAvailable));
        assert_eq!("not attend".parse::<JobStatus>(), Ok(JobStatus::NotAttend));
        assert!("Lost".parse::<WorkOrderStatus>().is_err());
        assert_eq!(WorkOrderStatus::ALL.len(), 12);
    }

    #[test]
    fn wire_spelling_is_used_by_serde() {
        assert_eq!(
            serde_json::to_string(&WorkOrderStatus::OnHold).unwrap(),
            r#""On Hold""#
        );
        assert_eq!(
            serde_json::from_str::<AreaCode>(r#""COASTAL""#).unwrap(),
            AreaCode::Coastal
        );
    }
}
