use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One transcribed and scored call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub agent_name: String,
    #[serde(default)]
    pub call_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub quality_score: f64,
    #[serde(default)]
    pub empathy_score: f64,
    #[serde(default)]
    pub compliance_score: f64,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Per-agent aggregate of KPI records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentSummary {
    pub agent_name: String,
    pub call_count: u64,
    pub avg_quality_score: f64,
    pub avg_empathy_score: f64,
    pub avg_compliance_score: f64,
    /// Resolved calls over all calls, in `[0, 1]`.
    pub resolution_rate: f64,
}

impl AgentSummary {
    /// Aggregate the records of one agent. An empty slice yields zeroes.
    pub fn aggregate(agent_name: impl Into<String>, records: &[KpiRecord]) -> Self {
        let mut summary = Self {
            agent_name: agent_name.into(),
            ..Default::default()
        };
        if records.is_empty() {
            return summary;
        }
        let n = records.len() as f64;
        summary.call_count = records.len() as u64;
        summary.avg_quality_score = records.iter().map(|r| r.quality_score).sum::<f64>() / n;
        summary.avg_empathy_score = records.iter().map(|r| r.empathy_score).sum::<f64>() / n;
        summary.avg_compliance_score =
            records.iter().map(|r| r.compliance_score).sum::<f64>() / n;
        summary.resolution_rate = records.iter().filter(|r| r.resolved).count() as f64 / n;
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDetail {
    pub agent_name: String,
    #[serde(default)]
    pub summary: Option<AgentSummary>,
    #[serde(default)]
    pub calls: Vec<KpiRecord>,
}

impl AgentDetail {
    /// Server summary when present, otherwise computed from the calls.
    pub fn summary_or_aggregate(&self) -> AgentSummary {
        self.summary
            .clone()
            .unwrap_or_else(|| AgentSummary::aggregate(&self.agent_name, &self.calls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(quality: f64, resolved: bool) -> KpiRecord {
        KpiRecord {
            id: format!("call-{quality}"),
            agent_name: "Dana".into(),
            call_date: None,
            quality_score: quality,
            empathy_score: 4.0,
            compliance_score: 5.0,
            resolved,
            summary: None,
        }
    }

    #[test]
    fn aggregates_averages_and_resolution_rate() {
        let summary = AgentSummary::aggregate(
            "Dana",
            &[record(80.0, true), record(60.0, false), record(70.0, true), record(90.0, true)],
        );
        assert_eq!(summary.call_count, 4);
        assert_eq!(summary.avg_quality_score, 75.0);
        assert_eq!(summary.avg_empathy_score, 4.0);
        assert_eq!(summary.resolution_rate, 0.75);
    }

    #[test]
    fn detail_prefers_server_summary() {
        let mut detail = AgentDetail {
            agent_name: "Dana".into(),
            summary: None,
            calls: vec![record(50.0, false)],
        };
        assert_eq!(detail.summary_or_aggregate().call_count, 1);
        detail.summary = Some(AgentSummary {
            agent_name: "Dana".into(),
            call_count: 42,
            ..Default::default()
        });
        assert_eq!(detail.summary_or_aggregate().call_count, 42);
        assert_eq!(AgentSummary::aggregate("x", &[]).call_count, 0);
    }
}
