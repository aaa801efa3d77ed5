mod auth_gateway;
mod session_context;

pub use auth_gateway::AuthGatewayImpl;
pub use session_context::SessionContext;
