use domain_session::{
    exception::GatewayResult,
    model::vo::{ApiRequest, ApiResponse},
};

use super::{decode_data, segment, QueryEndpoint};
use crate::model::{
    entity::{AgentDetail, AgentSummary, KpiRecord},
    vo::CacheTag,
};

pub struct ListAgents;

impl QueryEndpoint for ListAgents {
    type Args = ();
    type Output = Vec<AgentSummary>;

    const NAME: &'static str = "listAgents";

    fn request(_: &()) -> ApiRequest {
        ApiRequest::get("/transcriber/agents")
    }

    fn key_args(_: &()) -> String {
        String::new()
    }

    fn decode(response: &ApiResponse) -> GatewayResult<Vec<AgentSummary>> {
        decode_data(response)
    }

    fn provides(_: &(), agents: &Vec<AgentSummary>) -> Vec<CacheTag> {
        std::iter::once(CacheTag::AgentList)
            .chain(agents.iter().map(|a| CacheTag::Agent(a.agent_name.clone())))
            .collect()
    }
}

pub struct GetAgent;

impl QueryEndpoint for GetAgent {
    type Args = String;
    type Output = AgentDetail;

    const NAME: &'static str = "getAgent";

    fn request(name: &String) -> ApiRequest {
        ApiRequest::get(format!("/transcriber/agent/{}", segment(name)))
    }

    fn key_args(name: &String) -> String {
        name.clone()
    }

    fn decode(response: &ApiResponse) -> GatewayResult<AgentDetail> {
        decode_data(response)
    }

    fn provides(name: &String, _: &AgentDetail) -> Vec<CacheTag> {
        vec![CacheTag::Agent(name.clone())]
    }
}

pub struct GetTranscript;

impl QueryEndpoint for GetTranscript {
    type Args = String;
    type Output = KpiRecord;

    const NAME: &'static str = "getTranscript";

    fn request(id: &String) -> ApiRequest {
        ApiRequest::get(format!("/transcriber/{}", segment(id)))
    }

    fn key_args(id: &String) -> String {
        id.clone()
    }

    fn decode(response: &ApiResponse) -> GatewayResult<KpiRecord> {
        decode_data(response)
    }

    fn provides(id: &String, _: &KpiRecord) -> Vec<CacheTag> {
        vec![CacheTag::Transcript(id.clone())]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn agent_list_tags_every_agent() {
        let response = ApiResponse::json(
            200,
            &json!([{ "agentName": "Dana", "callCount": 3 }, { "agentName": "Eli" }]),
        );
        let agents = ListAgents::decode(&response).unwrap();
        assert_eq!(
            ListAgents::provides(&(), &agents),
            vec![
                CacheTag::AgentList,
                CacheTag::Agent("Dana".into()),
                CacheTag::Agent("Eli".into())
            ]
        );
        assert_eq!(GetAgent::request(&"Dana Ruiz".to_owned()).path, "/transcriber/agent/Dana%20Ruiz");
    }
}
