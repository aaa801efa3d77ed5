use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use domain_work_order::{
    command::{BulkChanges, WorkOrderDraft},
    exception::{WorkOrderException, WorkOrderResult},
    model::vo::{
        AreaCode, Column, DateRangeShortcut, ExportFormat, FilterField, JobStatus, ListFilter,
        WorkOrderStatus,
    },
};

/// Work Order Desk - terminal client for the work-order API
#[derive(Parser, Debug)]
#[command(name = "work-order-desk")]
#[command(version)]
#[command(about = "Browse, edit and export field-service work orders", long_about = None)]
pub struct Cli {
    /// Configuration file (YAML, TOML or JSON)
    #[arg(long = "config", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a session from an issued access token
    Login {
        /// JWT access token
        #[arg(long = "token")]
        token: String,
        #[arg(long = "refresh-token")]
        refresh_token: Option<String>,
        /// Display name; read from the token when omitted
        #[arg(long = "username")]
        username: Option<String>,
    },
    /// End the session here and on the server
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List work orders
    List(ListArgs),
    /// Interactive table with debounced search
    Browse(FilterArgs),
    /// Show one work order by id
    Get { id: String },
    /// Find a work order by its number (exact match)
    Find { number: String },
    /// Create a work order
    Create {
        #[arg(long = "number")]
        number: String,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Edit a work order; only the given fields change
    Update {
        id: String,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Change the status of a work order
    Status {
        id: String,
        status: WorkOrderStatus,
        #[arg(long = "job-status")]
        job_status: Option<JobStatus>,
    },
    /// Delete a work order after confirmation
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
    /// Apply the same changes to several work orders
    BulkUpdate(BulkArgs),
    /// Audit trail of a work order
    History { id: String },
    /// Totals by status, job status and area
    Stats,
    /// Download the filtered list as a spreadsheet
    Export(ExportArgs),
    /// KPI summary per agent
    Agents,
    /// KPI detail of one agent
    Agent { name: String },
    /// One transcribed call
    Transcript { id: String },
}

/// List filters. Values are validated before any request is sent.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long = "status")]
    pub status: Option<String>,
    #[arg(long = "job-status")]
    pub job_status: Option<String>,
    #[arg(long = "type")]
    pub work_order_type: Option<String>,
    #[arg(long = "supervisor")]
    pub supervisor: Option<String>,
    #[arg(long = "technician")]
    pub technician: Option<String>,
    #[arg(long = "area")]
    pub area: Option<String>,
    #[arg(long = "area-code")]
    pub area_code: Option<String>,
    #[arg(long = "distribution")]
    pub distribution: Option<String>,
    /// Visit date lower bound (YYYY-MM-DD)
    #[arg(long = "from")]
    pub start_date: Option<String>,
    /// Visit date upper bound (YYYY-MM-DD)
    #[arg(long = "to")]
    pub end_date: Option<String>,
    #[arg(long = "search")]
    pub search: Option<String>,
    #[arg(long = "sort-by")]
    pub sort_by: Option<String>,
    #[arg(long = "sort-order")]
    pub sort_order: Option<String>,
    /// Any other filter as name=value
    #[arg(short = 'f', long = "filter", value_name = "NAME=VALUE")]
    pub extra: Vec<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> WorkOrderResult<ListFilter> {
        let mut filter = ListFilter::new();
        for (field, value) in [
            (FilterField::Status, &self.status),
            (FilterField::JobStatus, &self.job_status),
            (FilterField::WorkOrderType, &self.work_order_type),
            (FilterField::Supervisor, &self.supervisor),
            (FilterField::Technician, &self.technician),
            (FilterField::Area, &self.area),
            (FilterField::AreaCode, &self.area_code),
            (FilterField::Distribution, &self.distribution),
            (FilterField::StartDate, &self.start_date),
            (FilterField::EndDate, &self.end_date),
            (FilterField::Search, &self.search),
            (FilterField::SortBy, &self.sort_by),
            (FilterField::SortOrder, &self.sort_order),
        ] {
            if let Some(value) = value {
                filter.set(field, value)?;
            }
        }
        let extra = self
            .extra
            .iter()
            .map(|pair| split_pair(pair))
            .collect::<WorkOrderResult<Vec<_>>>()?;
        for (name, value) in extra {
            let field =
                FilterField::from_name(name).ok_or_else(|| WorkOrderException::InvalidFilter {
                    field: name.to_owned(),
                    value: value.to_owned(),
                    reason: "unknown filter".to_owned(),
                })?;
            filter.set(field, value)?;
        }
        Ok(filter)
    }
}

/// `name=value`, as typed on the command line or in the browse prompt.
pub fn split_pair(pair: &str) -> WorkOrderResult<(&str, &str)> {
    pair.split_once('=')
        .map(|(name, value)| (name.trim(), value))
        .ok_or_else(|| WorkOrderException::InvalidFilter {
            field: pair.to_owned(),
            value: String::new(),
            reason: "expected NAME=VALUE".to_owned(),
        })
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
    #[arg(long = "page")]
    pub page: Option<u32>,
    #[arg(long = "limit")]
    pub limit: Option<u32>,
    /// Visible columns, comma separated
    #[arg(long = "columns", value_delimiter = ',')]
    pub columns: Option<Vec<Column>>,
    /// Remember `--columns` for later listings
    #[arg(long = "save-columns", requires = "columns")]
    pub save_columns: bool,
    /// Print the raw page as JSON
    #[arg(long = "json")]
    pub json: bool,
}

/// Editable fields of a work order.
#[derive(Args, Debug, Clone, Default)]
pub struct DraftArgs {
    /// Visit date (YYYY-MM-DD)
    #[arg(long = "visit-date")]
    pub visit_inst_date: Option<NaiveDate>,
    #[arg(long = "type")]
    pub work_order_type: Option<String>,
    #[arg(long = "customer")]
    pub customer_name: Option<String>,
    #[arg(long = "phone")]
    pub customer_phone: Option<String>,
    #[arg(long = "area")]
    pub area: Option<String>,
    #[arg(long = "area-code")]
    pub area_code: Option<AreaCode>,
    #[arg(long = "supervisor")]
    pub supervisor: Option<String>,
    #[arg(long = "technician")]
    pub technician: Option<String>,
    #[arg(long = "hours")]
    pub hours: Option<f64>,
    #[arg(long = "status")]
    pub work_order_status: Option<WorkOrderStatus>,
    #[arg(long = "job-status")]
    pub job_status: Option<JobStatus>,
    #[arg(long = "distribution")]
    pub distribution: Option<String>,
    #[arg(long = "description")]
    pub description: Option<String>,
    /// Reschedule date (YYYY-MM-DD)
    #[arg(long = "reschedule-date")]
    pub reschedule_date: Option<NaiveDate>,
}

impl DraftArgs {
    /// Overlay the given values on `draft`; absent arguments keep the current value.
    pub fn apply(self, draft: &mut WorkOrderDraft) {
        fn set<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        set(&mut draft.visit_inst_date, self.visit_inst_date);
        set(&mut draft.work_order_type, self.work_order_type);
        set(&mut draft.customer_name, self.customer_name);
        set(&mut draft.customer_phone, self.customer_phone);
        set(&mut draft.area, self.area);
        set(&mut draft.area_code, self.area_code);
        set(&mut draft.supervisor, self.supervisor);
        set(&mut draft.technician, self.technician);
        set(&mut draft.hours, self.hours);
        set(&mut draft.work_order_status, self.work_order_status);
        set(&mut draft.job_status, self.job_status);
        set(&mut draft.distribution, self.distribution);
        set(&mut draft.description, self.description);
        set(&mut draft.reschedule_date, self.reschedule_date);
    }
}

#[derive(Args, Debug, Clone)]
pub struct BulkArgs {
    /// Work order ids, comma separated
    #[arg(long = "ids", value_delimiter = ',', required = true)]
    pub ids: Vec<String>,
    #[arg(long = "status")]
    pub work_order_status: Option<WorkOrderStatus>,
    #[arg(long = "job-status")]
    pub job_status: Option<JobStatus>,
    #[arg(long = "supervisor")]
    pub supervisor: Option<String>,
    #[arg(long = "technician")]
    pub technician: Option<String>,
    #[arg(long = "area-code")]
    pub area_code: Option<AreaCode>,
}

impl BulkArgs {
    pub fn changes(&self) -> BulkChanges {
        BulkChanges {
            work_order_status: self.work_order_status,
            job_status: self.job_status,
            supervisor: self.supervisor.clone(),
            technician: self.technician.clone(),
            area_code: self.area_code,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
    /// csv or xlsx; defaults to the configured format
    #[arg(long = "format")]
    pub format: Option<ExportFormat>,
    /// today, 3days, 7days, 30days or all
    #[arg(long = "range")]
    pub range: Option<DateRangeShortcut>,
}
