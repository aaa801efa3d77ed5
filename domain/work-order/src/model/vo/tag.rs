use std::fmt;

/// Label attached to cached reads and named by mutations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheTag {
    WorkOrderList,
    WorkOrder(String),
    WorkOrderHistory(String),
    WorkOrderStats,
    AgentList,
    Agent(String),
    Transcript(String),
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheTag::WorkOrderList => f.write_str("WorkOrder:LIST"),
            CacheTag::WorkOrder(id) => write!(f, "WorkOrder:{id}"),
            CacheTag::WorkOrderHistory(id) => write!(f, "WorkOrderHistory:{id}"),
            CacheTag::WorkOrderStats => f.write_str("WorkOrderStats"),
            CacheTag::AgentList => f.write_str("Agent:LIST"),
            CacheTag::Agent(name) => write!(f, "Agent:{name}"),
            CacheTag::Transcript(id) => write!(f, "Transcript:{id}"),
        }
    }
}

/// Identity of a cached read: endpoint name plus canonical arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub endpoint: &'static str,
    pub args: String,
}

impl CacheKey {
    pub fn new(endpoint: &'static str, args: impl Into<String>) -> Self {
        Self {
            endpoint,
            args: args.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            f.write_str(self.endpoint)
        } else {
            write!(f, "{}?{}", self.endpoint, self.args)
        }
    }
}
