mod download_sink;
mod export;
mod transcriber;
mod work_order;

#[rustfmt::skip]
pub use {
    download_sink::DownloadSink,
    export::{ExportService, ExportedFile},
    transcriber::TranscriberService,
    work_order::WorkOrderService,
};
