use colored::Colorize;
use domain_work_order::{
    command::{BulkUpdateCommand, ExportCommand, PatchStatusCommand},
    model::vo::{JobStatus, WorkOrderStatus},
};
use service_work_order::{DeleteFlow, ListStatus, ListView, WorkOrderForm};

use super::confirm;
use crate::{
    args::{BulkArgs, DraftArgs, ExportArgs, ListArgs},
    infrastructure::ServiceProvider,
    render,
};

pub async fn list(provider: &ServiceProvider, args: ListArgs) -> anyhow::Result<()> {
    let mut view = provider.list_view().await?;
    for (field, value) in args.filters.to_filter()?.criteria() {
        view.set_filter(field, value)?;
    }
    if let Some(limit) = args.limit {
        view.set_limit(limit);
    }
    if let Some(columns) = args.columns {
        if args.save_columns {
            provider.save_columns(&columns).await?;
        }
        view.set_columns(columns);
    }
    let requested = args.page.unwrap_or(1);
    view.set_page(requested);
    load(&mut view).await?;

    // past the last page: show the last one instead
    if view.set_page(requested) {
        load(&mut view).await?;
    }

    if args.json {
        if let Some(page) = view.page() {
            println!("{}", serde_json::to_string_pretty(&*page)?);
        }
        return Ok(());
    }
    print_view(&view);
    Ok(())
}

pub(super) async fn load(view: &mut ListView) -> anyhow::Result<()> {
    match view.load().await {
        ListStatus::Ready => Ok(()),
        ListStatus::ConnectionError => anyhow::bail!(
            "Could not reach the work-order server: {}",
            view.error().unwrap_or_default()
        ),
        _ => anyhow::bail!("{}", view.error().unwrap_or("Loading work orders failed")),
    }
}

pub(super) fn print_view(view: &ListView) {
    let (header, rows) = view.rows();
    if rows.is_empty() {
        println!("{}", "No work orders match the current filters.".dimmed());
    } else {
        print!("{}", render::table(&header, &rows));
    }
    if let Some(pagination) = view.pagination() {
        println!("{}", render::pagination(&pagination));
    }
}

pub async fn get(provider: &ServiceProvider, id: &str) -> anyhow::Result<()> {
    let work_order = provider.work_orders.get(id).await?;
    print!("{}", render::work_order(&work_order));
    Ok(())
}

pub async fn find(provider: &ServiceProvider, number: &str) -> anyhow::Result<()> {
    let work_order = provider.work_orders.find_by_number(number).await?;
    print!("{}", render::work_order(&work_order));
    Ok(())
}

pub async fn create(provider: &ServiceProvider, number: String, draft: DraftArgs) -> anyhow::Result<()> {
    let agent_name = provider
        .session
        .snapshot()
        .await
        .display_name()
        .map(str::to_owned);
    let mut form = WorkOrderForm::create(provider.work_orders.clone(), agent_name);
    form.work_order_number = number;
    draft.apply(&mut form.draft);

    let created = form.submit().await?;
    println!("{} {}", "Created".green(), created.work_order_number.bold());
    print!("{}", render::work_order(&created));
    Ok(())
}

pub async fn update(provider: &ServiceProvider, id: &str, draft: DraftArgs) -> anyhow::Result<()> {
    let current = provider.work_orders.get(id).await?;
    let mut form = WorkOrderForm::edit(provider.work_orders.clone(), &current);
    draft.apply(&mut form.draft);

    let updated = form.submit().await?;
    println!("{} {}", "Updated".green(), updated.work_order_number.bold());
    print!("{}", render::work_order(&updated));
    Ok(())
}

pub async fn status(
    provider: &ServiceProvider,
    id: String,
    work_order_status: WorkOrderStatus,
    job_status: Option<JobStatus>,
) -> anyhow::Result<()> {
    let updated = provider
        .work_orders
        .patch_status(PatchStatusCommand {
            id,
            work_order_status,
            job_status,
        })
        .await?;
    println!(
        "{} is now {}",
        updated.work_order_number.bold(),
        updated.work_order_status.to_string().green()
    );
    Ok(())
}

pub async fn delete(provider: &ServiceProvider, id: &str, yes: bool) -> anyhow::Result<()> {
    let work_order = provider.work_orders.get(id).await?;
    let mut flow = DeleteFlow::new(provider.work_orders.clone());
    flow.select(work_order.as_ref())?;

    let question = format!(
        "Delete work order {}? This cannot be undone.",
        work_order.work_order_number.bold()
    );
    if !yes && !confirm(&question).await? {
        flow.cancel()?;
        println!("{}", "Nothing deleted.".dimmed());
        return Ok(());
    }
    let deleted = flow.confirm().await?;
    println!("{} {}", "Deleted".green(), deleted.work_order_number.bold());
    Ok(())
}

pub async fn bulk_update(provider: &ServiceProvider, args: BulkArgs) -> anyhow::Result<()> {
    let result = provider
        .work_orders
        .bulk_update(BulkUpdateCommand {
            ids: args.ids.clone(),
            updates: args.changes(),
        })
        .await?;
    println!(
        "{} {} matched, {} modified",
        "Bulk update applied:".green(),
        result.matched,
        result.modified
    );
    Ok(())
}

pub async fn history(provider: &ServiceProvider, id: &str) -> anyhow::Result<()> {
    let entries = provider.work_orders.history(id).await?;
    print!("{}", render::history(&entries));
    Ok(())
}

pub async fn stats(provider: &ServiceProvider) -> anyhow::Result<()> {
    let stats = provider.work_orders.stats().await?;
    print!("{}", render::stats(&stats));
    Ok(())
}

pub async fn export(provider: &ServiceProvider, args: ExportArgs) -> anyhow::Result<()> {
    let defaults = &provider.config.export;
    let command = ExportCommand {
        filter: args.filters.to_filter()?,
        format: args.format.unwrap_or(defaults.default_format),
        range: args.range.unwrap_or(defaults.default_range),
    };
    let file = provider.export.export(command).await?;
    println!(
        "{} {} ({} bytes)",
        "Saved".green(),
        file.path.display(),
        file.size
    );
    Ok(())
}
