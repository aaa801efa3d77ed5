mod common;

use std::{sync::Arc, time::Duration};

use common::{page, FakeGateway};
use domain_session::{
    exception::GatewayException,
    model::vo::{ApiResponse, HttpMethod},
};
use domain_work_order::{
    endpoint::{ListWorkOrders, QueryEndpoint},
    exception::WorkOrderException,
    model::vo::{CacheTag, FilterField, ListFilter},
    service::WorkOrderService,
};
use serde_json::json;
use service_work_order::{QueryCache, WorkOrderServiceImpl};

fn cache(gateway: &Arc<FakeGateway>) -> Arc<QueryCache> {
    Arc::new(QueryCache::builder().gateway(gateway.clone()).build())
}

fn filter(field: FilterField, value: &str) -> ListFilter {
    ListFilter::new().with(field, value).unwrap()
}

#[tokio::test(start_paused = true)]
async fn identical_reads_share_one_request() {
    let gateway = Arc::new(FakeGateway::listing(&["1", "2"], Duration::from_millis(50)));
    let cache = cache(&gateway);
    let a = filter(FilterField::Supervisor, "Lee");
    let b = ListFilter::from_pairs([("supervisor", " Lee ")]).unwrap();

    let (first, second) = tokio::join!(
        cache.query::<ListWorkOrders>(&a),
        cache.query::<ListWorkOrders>(&b)
    );
    assert!(Arc::ptr_eq(&first.unwrap(), &second.unwrap()));
    assert_eq!(gateway.count(HttpMethod::Get, "/work-orders"), 1);

    cache.query::<ListWorkOrders>(&a).await.unwrap();
    assert_eq!(gateway.count(HttpMethod::Get, "/work-orders"), 1);
}

#[tokio::test]
async fn delete_refetches_subscribed_lists_and_drops_the_rest() {
    let gateway = Arc::new(FakeGateway::listing(&["1", "2"], Duration::ZERO));
    let cache = cache(&gateway);
    let service = WorkOrderServiceImpl::builder().cache(cache.clone()).build();

    let watched = filter(FilterField::Status, "Pending");
    let _subscription = cache.subscribe::<ListWorkOrders>(&watched);
    service.list(watched.clone()).await.unwrap();

    let abandoned = filter(FilterField::Technician, "Ravi");
    service.list(abandoned.clone()).await.unwrap();
    assert_eq!(gateway.count(HttpMethod::Get, "/work-orders"), 2);

    service.delete("1").await.unwrap();

    let lists: Vec<_> = gateway
        .calls()
        .into_iter()
        .filter(|r| r.path == "/work-orders")
        .collect();
    assert_eq!(lists.len(), 3);
    assert_eq!(lists[2].query.get("status").map(String::as_str), Some("Pending"));
    assert!(cache.contains(&ListWorkOrders::cache_key(&watched)));
    assert!(!cache.contains(&ListWorkOrders::cache_key(&abandoned)));

    // the refetch happened before delete returned
    let calls = gateway.calls();
    assert_eq!(calls[2].method, HttpMethod::Delete);
    assert_eq!(calls[3].path, "/work-orders");
}

#[tokio::test]
async fn failed_mutation_invalidates_nothing() {
    let gateway = Arc::new(FakeGateway::new(|_, request| {
        let response = match request.method {
            HttpMethod::Get => Ok(page(&["1"], 1)),
            _ => Err(GatewayException::Status {
                status: 409,
                message: "locked".into(),
            }),
        };
        (Duration::ZERO, response)
    }));
    let cache = cache(&gateway);
    let service = WorkOrderServiceImpl::builder().cache(cache.clone()).build();
    let _subscription = cache.subscribe::<ListWorkOrders>(&ListFilter::new());
    service.list(ListFilter::new()).await.unwrap();

    let err = service.delete("1").await.unwrap_err();
    assert!(matches!(err, WorkOrderException::Rejected { status: 409, .. }));
    assert_eq!(gateway.count(HttpMethod::Get, "/work-orders"), 1);
}

#[tokio::test(start_paused = true)]
async fn superseded_fetch_is_not_stored() {
    let gateway = Arc::new(FakeGateway::new(|call, _| {
        // the first call is slow and answers with stale data
        let latency = if call == 1 { 200 } else { 10 };
        let body = json!({ "total": call });
        (Duration::from_millis(latency), Ok(ApiResponse::json(200, &body)))
    }));
    let cache = cache(&gateway);
    let key = domain_work_order::endpoint::WorkOrderStatsOverview::cache_key(&());

    let slow = cache.query::<domain_work_order::endpoint::WorkOrderStatsOverview>(&());
    let forced = async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.refetch(&key).await
    };
    let (slow, forced) = tokio::join!(slow, forced);
    assert_eq!(slow.unwrap().total, 1);
    assert!(forced.unwrap());

    let stored = cache
        .peek::<domain_work_order::endpoint::WorkOrderStatsOverview>(&())
        .unwrap();
    assert_eq!(stored.total, 2);
}

#[tokio::test(start_paused = true)]
async fn unused_entries_expire() {
    let gateway = Arc::new(FakeGateway::listing(&["1"], Duration::ZERO));
    let cache = Arc::new(
        QueryCache::builder()
            .gateway(gateway.clone())
            .keep_unused_for(Duration::from_secs(60))
            .build(),
    );
    let filter = ListFilter::new();

    cache.query::<ListWorkOrders>(&filter).await.unwrap();
    tokio::time::advance(Duration::from_secs(30)).await;
    cache.query::<ListWorkOrders>(&filter).await.unwrap();
    assert_eq!(gateway.count(HttpMethod::Get, "/work-orders"), 1);

    tokio::time::advance(Duration::from_secs(61)).await;
    cache.query::<ListWorkOrders>(&filter).await.unwrap();
    assert_eq!(gateway.count(HttpMethod::Get, "/work-orders"), 2);

    let subscription = cache.subscribe::<ListWorkOrders>(&filter);
    tokio::time::advance(Duration::from_secs(120)).await;
    cache.query::<ListWorkOrders>(&filter).await.unwrap();
    assert_eq!(gateway.count(HttpMethod::Get, "/work-orders"), 2);
    assert_eq!(cache.subscribers(subscription.key()), 1);
    drop(subscription);
    assert_eq!(cache.subscribers(&ListWorkOrders::cache_key(&filter)), 0);
}

#[tokio::test]
async fn invalidation_reports_what_happened() {
    let gateway = Arc::new(FakeGateway::listing(&["7"], Duration::ZERO));
    let cache = cache(&gateway);
    let subscribed = ListFilter::new();
    let unsubscribed = filter(FilterField::Area, "Harbor");
    let _subscription = cache.subscribe::<ListWorkOrders>(&subscribed);
    cache.query::<ListWorkOrders>(&subscribed).await.unwrap();
    cache.query::<ListWorkOrders>(&unsubscribed).await.unwrap();

    let outcome = cache.invalidate(&[CacheTag::WorkOrder("7".into())]).await;
    assert_eq!(outcome.refetched, vec![ListWorkOrders::cache_key(&subscribed)]);
    assert_eq!(outcome.dropped, vec![ListWorkOrders::cache_key(&unsubscribed)]);

    let untouched = cache.invalidate(&[CacheTag::AgentList]).await;
    assert!(untouched.is_empty());
}

#[tokio::test]
async fn lookup_by_number_always_goes_to_the_server() {
    let gateway = Arc::new(FakeGateway::listing(&["5", "55"], Duration::ZERO));
    let cache = cache(&gateway);
    let service = WorkOrderServiceImpl::builder().cache(cache).build();

    assert_eq!(service.find_by_number("WO-55").await.unwrap().id, "55");
    assert_eq!(service.find_by_number("WO-55").await.unwrap().id, "55");
    assert_eq!(gateway.count(HttpMethod::Get, "/work-orders"), 2);

    let err = service.find_by_number("WO-5x").await.unwrap_err();
    assert!(matches!(err, WorkOrderException::NotFound { .. }));
}

#[tokio::test]
async fn lookup_by_number_pages_past_fuzzy_matches() {
    // WO-10 to WO-139 all contain "WO-1" and come back ahead of the exact record
    let gateway = Arc::new(FakeGateway::new(|_, request| {
        let ids: Vec<String> = (10..140)
            .chain(std::iter::once(1))
            .map(|n| n.to_string())
            .collect();
        let number = |key: &str| -> usize { request.query[key].parse().unwrap() };
        let (page, limit) = (number("page"), number("limit"));
        let data: Vec<_> = ids
            .iter()
            .skip((page - 1) * limit)
            .take(limit)
            .map(|id| common::work_order(id))
            .collect();
        let body = json!({
            "data": data,
            "pagination": {
                "page": page,
                "limit": limit,
                "total": ids.len(),
                "totalPages": ids.len().div_ceil(limit),
            },
        });
        (Duration::ZERO, Ok(ApiResponse::json(200, &body)))
    }));
    let service = WorkOrderServiceImpl::builder().cache(cache(&gateway)).build();

    assert_eq!(service.find_by_number("WO-1").await.unwrap().id, "1");

    let calls = gateway.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].query["search"], "WO-1");
    assert_eq!(calls[0].query["limit"], "100");
    assert_eq!(calls[1].query["page"], "2");

    let err = service.find_by_number("WO-1000").await.unwrap_err();
    assert!(matches!(err, WorkOrderException::NotFound { .. }));
    assert_eq!(gateway.calls().len(), 4);
}
