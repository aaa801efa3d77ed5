//! Terminal output of the desk commands.

use colored::Colorize;
use domain_session::model::entity::Session;
use domain_work_order::{
    exception::WorkOrderException,
    model::{
        entity::{AgentDetail, AgentSummary, KpiRecord, WorkOrder, WorkOrderHistoryEntry},
        vo::{date::format_date, Pagination, WorkOrderStats},
    },
};
use infrastructure_command::SessionSignal;

/// Left-aligned table; column widths follow the widest cell.
pub fn table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }
    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    let mut out = String::new();
    let head = line(header.iter().map(|h| h.to_string()).collect());
    out.push_str(&head.bold().to_string());
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.clone()));
        out.push('\n');
    }
    out
}

pub fn pagination(pagination: &Pagination) -> String {
    format!(
        "Page {} of {} ({} work orders)",
        pagination.page,
        pagination.total_pages.max(1),
        pagination.total
    )
    .dimmed()
    .to_string()
}

pub fn work_order(work_order: &WorkOrder) -> String {
    fn or_dash(value: Option<String>) -> String {
        value.filter(|v| !v.is_empty()).unwrap_or_else(|| "-".to_owned())
    }

    let status = if work_order.is_closed() {
        work_order.work_order_status.to_string().dimmed()
    } else {
        work_order.work_order_status.to_string().green()
    };
    let rows = [
        ("Id", work_order.id.clone()),
        ("Visit date", format_date(work_order.visit_inst_date)),
        ("Type", or_dash(work_order.work_order_type.clone())),
        ("Customer", or_dash(work_order.customer_name.clone())),
        ("Phone", or_dash(work_order.customer_phone.clone())),
        ("Area", or_dash(work_order.area.clone())),
        ("Area code", or_dash(work_order.area_code.map(|c| c.to_string()))),
        ("Supervisor", or_dash(work_order.supervisor.clone())),
        ("Technician", or_dash(work_order.technician.clone())),
        ("Hours", or_dash(work_order.hours.map(|h| format!("{h:.1}")))),
        ("Job status", or_dash(work_order.job_status.map(|s| s.to_string()))),
        ("Distribution", or_dash(work_order.distribution.clone())),
        ("Reschedule", or_dash(work_order.reschedule_date.map(format_date))),
        ("Agent", or_dash(work_order.agent_name.clone())),
        ("Description", work_order.description.clone()),
    ];

    let mut out = format!(
        "{}  {}\n",
        work_order.work_order_number.bold(),
        status
    );
    for (label, value) in rows {
        out.push_str(&format!("  {:<13}{value}\n", format!("{label}:")));
    }
    out
}

pub fn history(entries: &[WorkOrderHistoryEntry]) -> String {
    if entries.is_empty() {
        return "No history recorded.".dimmed().to_string();
    }
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "{}  {}  {}\n",
            entry.changed_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            entry.action.bold(),
            entry.changed_by.as_deref().unwrap_or("unknown"),
        ));
        if let Some(changes) = entry.changes.as_object() {
            for (field, change) in changes {
                out.push_str(&format!("    {field}: {change}\n"));
            }
        }
    }
    out
}

pub fn stats(stats: &WorkOrderStats) -> String {
    let mut out = format!(
        "{} {}\n{} {:.1}\n",
        "Total work orders:".bold(),
        stats.total,
        "Total hours:".bold(),
        stats.total_hours
    );
    for (title, counts) in [
        ("By status", &stats.by_status),
        ("By job status", &stats.by_job_status),
        ("By area code", &stats.by_area_code),
    ] {
        if counts.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{}\n", title.bold()));
        for (name, count) in counts {
            out.push_str(&format!("  {name:<24}{count}\n"));
        }
    }
    out
}

fn summary_row(summary: &AgentSummary) -> Vec<String> {
    vec![
        summary.agent_name.clone(),
        summary.call_count.to_string(),
        format!("{:.1}", summary.avg_quality_score),
        format!("{:.1}", summary.avg_empathy_score),
        format!("{:.1}", summary.avg_compliance_score),
        format!("{:.0}%", summary.resolution_rate * 100.0),
    ]
}

const SUMMARY_HEADER: [&str; 6] = ["Agent", "Calls", "Quality", "Empathy", "Compliance", "Resolved"];

pub fn agents(agents: &[AgentSummary]) -> String {
    let rows: Vec<_> = agents.iter().map(summary_row).collect();
    table(&SUMMARY_HEADER, &rows)
}

pub fn agent(detail: &AgentDetail) -> String {
    let mut out = table(&SUMMARY_HEADER, &[summary_row(&detail.summary_or_aggregate())]);
    if !detail.calls.is_empty() {
        let rows: Vec<_> = detail
            .calls
            .iter()
            .map(|call| {
                vec![
                    call.id.clone(),
                    call.call_date
                        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default(),
                    format!("{:.1}", call.quality_score),
                    if call.resolved { "yes" } else { "no" }.to_owned(),
                ]
            })
            .collect();
        out.push('\n');
        out.push_str(&table(&["Call", "Date", "Quality", "Resolved"], &rows));
    }
    out
}

pub fn transcript(record: &KpiRecord) -> String {
    format!(
        "{}  {}\n  Quality:    {:.1}\n  Empathy:    {:.1}\n  Compliance: {:.1}\n  Resolved:   {}\n\n{}\n",
        record.agent_name.bold(),
        record
            .call_date
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
            .dimmed(),
        record.quality_score,
        record.empathy_score,
        record.compliance_score,
        if record.resolved { "yes" } else { "no" },
        record.summary.as_deref().unwrap_or("No summary."),
    )
}

pub fn session(session: &Session) -> String {
    let Some(bearer) = session.bearer() else {
        return "Not logged in.".yellow().to_string();
    };
    let user = session.display_name().unwrap_or("unknown user");
    let expiry = bearer
        .payload()
        .ok()
        .and_then(|p| p.expires_at())
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown".to_owned());
    format!("Logged in as {} (token expires {expiry})", user.bold())
}

pub fn signal(signal: &SessionSignal) -> String {
    match signal {
        SessionSignal::Expired { reason } => format!(
            "{}: {reason}. Run `work-order-desk login` to start a new session.",
            "Session ended".yellow()
        ),
    }
}

/// Error report; form errors are listed one field per line.
pub fn error(e: &anyhow::Error) -> String {
    match e.downcast_ref::<WorkOrderException>() {
        Some(WorkOrderException::Validation { errors }) => {
            let mut out = format!("{}\n", "Please fix the following:".red());
            for (field, message) in errors.iter() {
                out.push_str(&format!("  {}: {message}\n", field.as_str().bold()));
            }
            out.trim_end().to_owned()
        }
        Some(WorkOrderException::Connection { message }) => format!(
            "{}: {message}",
            "Could not reach the work-order server".red()
        ),
        Some(other) => format!("{}: {other}", "Error".red()),
        None => format!("{}: {e:#}", "Error".red()),
    }
}
