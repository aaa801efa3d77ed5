mod debounce;
mod delete_flow;
mod export;
mod form;
mod list_view;
mod query_cache;
mod transcriber;
mod work_order;

#[rustfmt::skip]
pub use {
    debounce::{Debouncer, DEFAULT_DEBOUNCE},
    delete_flow::{DeleteFlow, DeleteState, DeleteTarget},
    export::ExportServiceImpl,
    form::{FormMode, WorkOrderForm},
    list_view::{ListStatus, ListView},
    query_cache::{InvalidationOutcome, QueryCache, Subscription, DEFAULT_KEEP_UNUSED_FOR},
    transcriber::TranscriberServiceImpl,
    work_order::WorkOrderServiceImpl,
};
