//! Typed descriptions of the REST operations.
//!
//! A query endpoint knows how to build its request, how to name its cache
//! entry and which tags the fetched value provides. A mutation endpoint names
//! the tags it invalidates once it has succeeded.

mod transcriber;
mod work_order;

use domain_session::{
    exception::{GatewayException, GatewayResult},
    model::vo::{ApiRequest, ApiResponse},
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::vo::{CacheKey, CacheTag};

#[rustfmt::skip]
pub use {
    transcriber::{GetAgent, GetTranscript, ListAgents},
    work_order::{
        BulkUpdateWorkOrders, CreateWorkOrder, DeleteWorkOrder, ExportWorkOrders,
        FindWorkOrderByNumber, GetWorkOrder, ListWorkOrders, NumberSearch, PatchWorkOrderStatus,
        UpdateWorkOrder, WorkOrderHistory, WorkOrderStatsOverview,
    },
};

pub trait QueryEndpoint: Send + Sync + 'static {
    type Args: Clone + Send + Sync + 'static;
    type Output: Send + Sync + 'static;

    const NAME: &'static str;
    /// Zero cache lifetime: every read goes to the server.
    const REFETCH_ON_MOUNT: bool = false;

    fn request(args: &Self::Args) -> ApiRequest;
    /// Canonical serialization of the arguments.
    fn key_args(args: &Self::Args) -> String;
    fn decode(response: &ApiResponse) -> GatewayResult<Self::Output>;
    fn provides(args: &Self::Args, output: &Self::Output) -> Vec<CacheTag>;

    fn cache_key(args: &Self::Args) -> CacheKey {
        CacheKey::new(Self::NAME, Self::key_args(args))
    }
}

pub trait MutationEndpoint: Send + Sync + 'static {
    type Args: Send + Sync;
    type Output: Send;

    const NAME: &'static str;

    /// Fails when the arguments cannot be encoded as a request body.
    fn request(args: &Self::Args) -> GatewayResult<ApiRequest>;
    fn decode(response: &ApiResponse) -> GatewayResult<Self::Output>;
    fn invalidates(args: &Self::Args, output: &Self::Output) -> Vec<CacheTag>;
}

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub(crate) fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}

/// Decode a payload that may or may not be wrapped in a `data` envelope.
pub fn decode_data<T: DeserializeOwned>(response: &ApiResponse) -> GatewayResult<T> {
    let value: Value = response.json_body()?;
    if let Some(inner) = value.get("data") {
        if let Ok(decoded) = T::deserialize(inner) {
            return Ok(decoded);
        }
    }
    serde_json::from_value(value).map_err(|e| GatewayException::Decode {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::vo::WorkOrderStats;

    #[test]
    fn envelope_is_optional() {
        let wrapped = ApiResponse::json(200, &json!({ "success": true, "data": { "total": 7 } }));
        let bare = ApiResponse::json(200, &json!({ "total": 7 }));
        assert_eq!(decode_data::<WorkOrderStats>(&wrapped).unwrap().total, 7);
        assert_eq!(decode_data::<WorkOrderStats>(&bare).unwrap().total, 7);
        assert!(matches!(
            decode_data::<Vec<String>>(&ApiResponse::json(200, &json!({ "x": 1 }))),
            Err(GatewayException::Decode { .. })
        ));
    }

    #[test]
    fn path_segments_are_escaped() {
        assert_eq!(segment("Ana María/2"), "Ana%20Mar%C3%ADa%2F2");
        assert_eq!(segment("65f0-a_b.c~d"), "65f0-a_b.c~d");
    }
}
