mod download_sink;
mod http_transport;
mod service_provider;
mod session_store;

#[rustfmt::skip]
pub use {
    download_sink::FileDownloadSink,
    http_transport::ReqwestTransport,
    service_provider::ServiceProvider,
    session_store::FileSessionStore,
};
