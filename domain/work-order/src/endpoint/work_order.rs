use chrono::{DateTime, Utc};
use domain_session::{
    exception::{GatewayException, GatewayResult},
    model::vo::{ApiRequest, ApiResponse},
};

use super::{decode_data, segment, MutationEndpoint, QueryEndpoint};
use crate::command::{
    BulkUpdateCommand, CreateWorkOrderCommand, ExportCommand, PatchStatusCommand,
    UpdateWorkOrderCommand,
};
use crate::model::{
    entity::{WorkOrder, WorkOrderHistoryEntry},
    vo::{
        BulkUpdateResult, CacheTag, FilterField, ListFilter, WorkOrderPage, WorkOrderStats,
        DEFAULT_PAGE, MAX_LIMIT,
    },
};

const BASE: &str = "/work-orders";

fn item_path(id: &str) -> String {
    format!("{BASE}/{}", segment(id))
}

fn body<T: serde::Serialize>(value: &T) -> GatewayResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| GatewayException::Encode {
        message: e.to_string(),
    })
}

/// Changes to one record touch its entry, the list, its history and the totals.
fn record_changed(id: &str) -> Vec<CacheTag> {
    vec![
        CacheTag::WorkOrder(id.to_owned()),
        CacheTag::WorkOrderList,
        CacheTag::WorkOrderHistory(id.to_owned()),
        CacheTag::WorkOrderStats,
    ]
}

pub struct ListWorkOrders;

impl QueryEndpoint for ListWorkOrders {
    type Args = ListFilter;
    type Output = WorkOrderPage;

    const NAME: &'static str = "listWorkOrders";

    fn request(filter: &ListFilter) -> ApiRequest {
        ApiRequest::get(BASE).with_query(filter.to_query())
    }

    fn key_args(filter: &ListFilter) -> String {
        filter.cache_args()
    }

    fn decode(response: &ApiResponse) -> GatewayResult<WorkOrderPage> {
        decode_data(response)
    }

    fn provides(_: &ListFilter, page: &WorkOrderPage) -> Vec<CacheTag> {
        page.data
            .iter()
            .map(|w| CacheTag::WorkOrder(w.id.clone()))
            .chain(std::iter::once(CacheTag::WorkOrderList))
            .collect()
    }
}

pub struct GetWorkOrder;

impl QueryEndpoint for GetWorkOrder {
    type Args = String;
    type Output = WorkOrder;

    const NAME: &'static str = "getWorkOrder";

    fn request(id: &String) -> ApiRequest {
        ApiRequest::get(item_path(id))
    }

    fn key_args(id: &String) -> String {
        id.clone()
    }

    fn decode(response: &ApiResponse) -> GatewayResult<WorkOrder> {
        decode_data(response)
    }

    fn provides(id: &String, _: &WorkOrder) -> Vec<CacheTag> {
        vec![CacheTag::WorkOrder(id.clone())]
    }
}

/// One page of search candidates for an exact work-order number lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberSearch {
    pub number: String,
    pub page: u32,
}

impl NumberSearch {
    pub fn new(number: &str) -> Self {
        Self {
            number: number.trim().to_owned(),
            page: DEFAULT_PAGE,
        }
    }

    pub fn next(&self) -> Self {
        Self {
            number: self.number.clone(),
            page: self.page + 1,
        }
    }

    fn filter(&self) -> ListFilter {
        let mut filter = ListFilter::new();
        // a blank number yields an unfiltered search that matches nothing below
        let _ = filter.set(FilterField::Search, &self.number);
        filter.set_limit(MAX_LIMIT);
        filter.set_page(self.page);
        filter
    }
}

/// Exact lookup by work-order number, always fresh.
///
/// Search is fuzzy server-side, so the exact record may sit behind any number
/// of near matches; callers walk the pages until [`FindWorkOrderByNumber::exact`]
/// finds it or the pages run out.
pub struct FindWorkOrderByNumber;

impl QueryEndpoint for FindWorkOrderByNumber {
    type Args = NumberSearch;
    type Output = WorkOrderPage;

    const NAME: &'static str = "findWorkOrderByNumber";
    const REFETCH_ON_MOUNT: bool = true;

    fn request(search: &NumberSearch) -> ApiRequest {
        ApiRequest::get(BASE).with_query(search.filter().to_query())
    }

    fn key_args(search: &NumberSearch) -> String {
        search.filter().cache_args()
    }

    fn decode(response: &ApiResponse) -> GatewayResult<WorkOrderPage> {
        decode_data(response)
    }

    fn provides(_: &NumberSearch, page: &WorkOrderPage) -> Vec<CacheTag> {
        page.data
            .iter()
            .map(|w| CacheTag::WorkOrder(w.id.clone()))
            .collect()
    }
}

impl FindWorkOrderByNumber {
    pub fn exact(number: &str, candidates: &[WorkOrder]) -> Option<WorkOrder> {
        candidates
            .iter()
            .find(|w| w.work_order_number.trim() == number.trim())
            .cloned()
    }
}

pub struct WorkOrderHistory;

impl QueryEndpoint for WorkOrderHistory {
    type Args = String;
    type Output = Vec<WorkOrderHistoryEntry>;

    const NAME: &'static str = "workOrderHistory";

    fn request(id: &String) -> ApiRequest {
        ApiRequest::get(format!("{}/history", item_path(id)))
    }

    fn key_args(id: &String) -> String {
        id.clone()
    }

    fn decode(response: &ApiResponse) -> GatewayResult<Vec<WorkOrderHistoryEntry>> {
        decode_data(response)
    }

    fn provides(id: &String, _: &Vec<WorkOrderHistoryEntry>) -> Vec<CacheTag> {
        vec![CacheTag::WorkOrderHistory(id.clone())]
    }
}

pub struct WorkOrderStatsOverview;

impl QueryEndpoint for WorkOrderStatsOverview {
    type Args = ();
    type Output = WorkOrderStats;

    const NAME: &'static str = "workOrderStats";

    fn request(_: &()) -> ApiRequest {
        ApiRequest::get(format!("{BASE}/stats/overview"))
    }

    fn key_args(_: &()) -> String {
        String::new()
    }

    fn decode(response: &ApiResponse) -> GatewayResult<WorkOrderStats> {
        decode_data(response)
    }

    fn provides(_: &(), _: &WorkOrderStats) -> Vec<CacheTag> {
        vec![CacheTag::WorkOrderStats]
    }
}

pub struct CreateWorkOrder;

impl MutationEndpoint for CreateWorkOrder {
    type Args = CreateWorkOrderCommand;
    type Output = WorkOrder;

    const NAME: &'static str = "createWorkOrder";

    fn request(command: &CreateWorkOrderCommand) -> GatewayResult<ApiRequest> {
        Ok(ApiRequest::post(BASE).with_json(body(command)?))
    }

    fn decode(response: &ApiResponse) -> GatewayResult<WorkOrder> {
        decode_data(response)
    }

    fn invalidates(_: &CreateWorkOrderCommand, _: &WorkOrder) -> Vec<CacheTag> {
        vec![CacheTag::WorkOrderList, CacheTag::WorkOrderStats]
    }
}

pub struct UpdateWorkOrder;

impl MutationEndpoint for UpdateWorkOrder {
    type Args = UpdateWorkOrderCommand;
    type Output = WorkOrder;

    const NAME: &'static str = "updateWorkOrder";

    fn request(command: &UpdateWorkOrderCommand) -> GatewayResult<ApiRequest> {
        Ok(ApiRequest::put(item_path(&command.id)).with_json(body(command)?))
    }

    fn decode(response: &ApiResponse) -> GatewayResult<WorkOrder> {
        decode_data(response)
    }

    fn invalidates(command: &UpdateWorkOrderCommand, _: &WorkOrder) -> Vec<CacheTag> {
        record_changed(&command.id)
    }
}

pub struct PatchWorkOrderStatus;

impl MutationEndpoint for PatchWorkOrderStatus {
    type Args = PatchStatusCommand;
    type Output = WorkOrder;

    const NAME: &'static str = "patchWorkOrderStatus";

    fn request(command: &PatchStatusCommand) -> GatewayResult<ApiRequest> {
        let path = format!("{}/status", item_path(&command.id));
        Ok(ApiRequest::patch(path).with_json(body(command)?))
    }

    fn decode(response: &ApiResponse) -> GatewayResult<WorkOrder> {
        decode_data(response)
    }

    fn invalidates(command: &PatchStatusCommand, _: &WorkOrder) -> Vec<CacheTag> {
        record_changed(&command.id)
    }
}

pub struct DeleteWorkOrder;

impl MutationEndpoint for DeleteWorkOrder {
    type Args = String;
    type Output = ();

    const NAME: &'static str = "deleteWorkOrder";

    fn request(id: &String) -> GatewayResult<ApiRequest> {
        Ok(ApiRequest::delete(item_path(id)))
    }

    fn decode(_: &ApiResponse) -> GatewayResult<()> {
        Ok(())
    }

    fn invalidates(id: &String, _: &()) -> Vec<CacheTag> {
        vec![
            CacheTag::WorkOrder(id.clone()),
            CacheTag::WorkOrderList,
            CacheTag::WorkOrderStats,
        ]
    }
}

/// Invalidates the list as a whole rather than each affected record.
pub struct BulkUpdateWorkOrders;

impl MutationEndpoint for BulkUpdateWorkOrders {
    type Args = BulkUpdateCommand;
    type Output = BulkUpdateResult;

    const NAME: &'static str = "bulkUpdateWorkOrders";

    fn request(command: &BulkUpdateCommand) -> GatewayResult<ApiRequest> {
        Ok(ApiRequest::post(format!("{BASE}/bulk-update")).with_json(body(command)?))
    }

    fn decode(response: &ApiResponse) -> GatewayResult<BulkUpdateResult> {
        decode_data(response)
    }

    fn invalidates(_: &BulkUpdateCommand, _: &BulkUpdateResult) -> Vec<CacheTag> {
        vec![CacheTag::WorkOrderList, CacheTag::WorkOrderStats]
    }
}

/// Binary download; never cached.
pub struct ExportWorkOrders;

impl ExportWorkOrders {
    pub const NAME: &'static str = "exportWorkOrders";

    pub fn request(command: &ExportCommand, now: DateTime<Utc>) -> ApiRequest {
        ApiRequest::get(format!("{BASE}/export"))
            .with_query(command.to_query(now))
            .binary()
    }
}

#[cfg(test)]
mod tests {
    use domain_session::model::vo::{HttpMethod, ResponseKind};
    use serde_json::json;

    use super::*;
    use crate::model::vo::WorkOrderStatus;

    fn page(ids: &[&str]) -> ApiResponse {
        let data: Vec<_> = ids
            .iter()
            .map(|id| {
                json!({
                    "_id": id,
                    "workOrderNumber": format!("WO-{id}"),
                    "visitInstDate": "2024-01-02",
                    "description": "Routine maintenance",
                })
            })
            .collect();
        ApiResponse::json(
            200,
            &json!({ "data": data, "pagination": { "page": 1, "limit": 10, "total": ids.len(), "totalPages": 1 } }),
        )
    }

    #[test]
    fn list_provides_record_tags_and_list_tag() {
        let filter = ListFilter::new();
        let output = ListWorkOrders::decode(&page(&["a", "b"])).unwrap();
        let tags = ListWorkOrders::provides(&filter, &output);
        assert_eq!(
            tags,
            vec![
                CacheTag::WorkOrder("a".into()),
                CacheTag::WorkOrder("b".into()),
                CacheTag::WorkOrderList
            ]
        );
        let request = ListWorkOrders::request(&filter);
        assert_eq!(request.path, "/work-orders");
        assert_eq!(request.query["sortOrder"], "desc");
        assert_eq!(
            ListWorkOrders::cache_key(&filter).to_string(),
            "listWorkOrders?limit=10&page=1&sortBy=visitInstDate&sortOrder=desc"
        );
    }

    #[test]
    fn find_by_number_is_always_fresh() {
        assert!(FindWorkOrderByNumber::REFETCH_ON_MOUNT);
        assert!(!GetWorkOrder::REFETCH_ON_MOUNT);
        let search = NumberSearch::new(" WO-9 ");
        let request = FindWorkOrderByNumber::request(&search);
        assert_eq!(request.query["search"], "WO-9");
        assert_eq!(request.query["limit"], "100");
        assert_eq!(request.query["page"], "1");
        assert_eq!(FindWorkOrderByNumber::request(&search.next()).query["page"], "2");
        assert_ne!(
            FindWorkOrderByNumber::cache_key(&search),
            FindWorkOrderByNumber::cache_key(&search.next())
        );

        let found = FindWorkOrderByNumber::decode(&page(&["90", "9"])).unwrap();
        assert_eq!(
            FindWorkOrderByNumber::exact("WO-9", &found.data).map(|w| w.id),
            Some("9".to_owned())
        );
        assert_eq!(FindWorkOrderByNumber::exact("WO-901", &found.data), None);
    }

    #[test]
    fn mutations_build_expected_requests() {
        let patch = PatchStatusCommand {
            id: "65 f0".into(),
            work_order_status: WorkOrderStatus::OnHold,
            job_status: None,
        };
        let request = PatchWorkOrderStatus::request(&patch).unwrap();
        assert_eq!(request.method, HttpMethod::Patch);
        assert_eq!(request.path, "/work-orders/65%20f0/status");
        assert_eq!(request.body, Some(json!({ "workOrderStatus": "On Hold" })));

        let delete = DeleteWorkOrder::request(&"abc".to_owned()).unwrap();
        assert_eq!(delete.method, HttpMethod::Delete);
        assert!(DeleteWorkOrder::invalidates(&"abc".to_owned(), &())
            .contains(&CacheTag::WorkOrderList));

        let bulk = BulkUpdateWorkOrders::invalidates(
            &BulkUpdateCommand::default(),
            &BulkUpdateResult::default(),
        );
        assert_eq!(bulk, vec![CacheTag::WorkOrderList, CacheTag::WorkOrderStats]);
    }

    #[test]
    fn unencodable_body_is_an_error() {
        struct Unencodable;

        impl serde::Serialize for Unencodable {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("not representable"))
            }
        }

        assert!(matches!(
            body(&Unencodable),
            Err(GatewayException::Encode { message }) if message.contains("not representable")
        ));
    }

    #[test]
    fn export_is_binary() {
        let now = chrono::Utc::now();
        let request = ExportWorkOrders::request(&ExportCommand::default(), now);
        assert_eq!(request.path, "/work-orders/export");
        assert_eq!(request.response_kind, ResponseKind::Binary);
        assert_eq!(request.query["format"], "csv");
    }
}
