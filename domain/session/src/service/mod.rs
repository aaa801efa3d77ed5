mod clock;
mod gateway;
mod session_store;
mod transport;

#[rustfmt::skip]
pub use {
    clock::{Clock, FixedClock, SystemClock},
    gateway::ApiGateway,
    session_store::SessionStore,
    transport::HttpTransport,
};
