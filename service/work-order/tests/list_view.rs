mod common;

use std::{sync::Arc, time::Duration};

use common::{page, FakeGateway};
use domain_session::{
    exception::GatewayException,
    model::vo::HttpMethod,
};
use domain_work_order::{
    exception::WorkOrderException,
    model::vo::{Column, FilterField},
};
use service_work_order::{ListStatus, ListView, QueryCache, DEFAULT_DEBOUNCE};

fn view(gateway: &Arc<FakeGateway>) -> ListView {
    let cache = Arc::new(QueryCache::builder().gateway(gateway.clone()).build());
    ListView::new(cache, DEFAULT_DEBOUNCE)
}

#[tokio::test(start_paused = true)]
async fn rapid_keystrokes_issue_one_query_with_the_final_text() {
    let gateway = Arc::new(FakeGateway::listing(&["1"], Duration::ZERO));
    let mut view = view(&gateway);
    view.set_page(3);

    for text in ["b", "bo", "boi", "boiler"] {
        view.type_search(text);
        tokio::time::sleep(Duration::from_millis(120)).await;
    }
    assert!(view.is_searching());
    assert!(gateway.calls().is_empty());

    assert!(view.next_search().await.unwrap());
    assert!(!view.is_searching());
    assert_eq!(view.load().await, ListStatus::Ready);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].query["search"], "boiler");
    assert_eq!(calls[0].query["page"], "1");
    assert!(view.searches().is_empty());
}

#[tokio::test]
async fn filter_change_resets_the_page() {
    let gateway = Arc::new(FakeGateway::new(|_, _| (Duration::ZERO, Ok(page(&["1", "2"], 5)))));
    let mut view = view(&gateway);
    view.load().await;
    assert!(view.next_page());
    assert!(view.next_page());
    assert_eq!(view.filter().page(), 3);

    assert!(view.set_filter(FilterField::AreaCode, "north").unwrap());
    assert_eq!(view.filter().page(), 1);
    assert_eq!(view.filter().get(FilterField::AreaCode), Some("NORTH"));

    // setting the same value again is not a change
    view.next_page();
    assert!(!view.set_filter(FilterField::AreaCode, "NORTH").unwrap());
    assert_eq!(view.filter().page(), 2);
}

#[tokio::test]
async fn page_filter_is_validated() {
    let gateway = Arc::new(FakeGateway::new(|_, _| (Duration::ZERO, Ok(page(&["1"], 4)))));
    let mut view = view(&gateway);
    view.load().await;

    assert!(view.set_filter(FilterField::Page, "3").unwrap());
    assert_eq!(view.filter().page(), 3);
    assert!(matches!(
        view.set_filter(FilterField::Page, "abc"),
        Err(WorkOrderException::InvalidFilter { .. })
    ));
    assert!(view.set_filter(FilterField::Page, "0").is_err());
    assert_eq!(view.filter().page(), 3);
}

#[tokio::test]
async fn paging_is_clamped_to_known_pages() {
    let gateway = Arc::new(FakeGateway::new(|_, _| (Duration::ZERO, Ok(page(&["1"], 2)))));
    let mut view = view(&gateway);
    assert!(!view.previous_page());
    view.load().await;

    assert!(view.next_page());
    assert!(!view.next_page());
    assert_eq!(view.filter().page(), 2);
    assert!(!view.set_page(40));
    assert_eq!(view.filter().page(), 2);
}

#[tokio::test]
async fn transport_failure_shows_connection_error() {
    let gateway = Arc::new(FakeGateway::new(|_, _| {
        (
            Duration::ZERO,
            Err(GatewayException::Connection {
                message: "connection refused".into(),
            }),
        )
    }));
    let mut view = view(&gateway);
    assert_eq!(view.status(), ListStatus::Idle);
    assert_eq!(view.load().await, ListStatus::ConnectionError);
    assert!(view.error().unwrap().contains("connection refused"));
    assert!(view.work_orders().is_empty());
    assert_eq!(gateway.count(HttpMethod::Get, "/work-orders"), 1);
}

#[tokio::test]
async fn hidden_columns_are_left_out_of_rows() {
    let gateway = Arc::new(FakeGateway::listing(&["9"], Duration::ZERO));
    let mut view = view(&gateway);
    view.set_columns([Column::WorkOrderNumber, Column::WorkOrderStatus, Column::Hours]);
    assert!(!view.toggle_column(Column::Hours));
    view.load().await;

    let (header, rows) = view.rows();
    assert_eq!(header, vec!["WO Number", "Status"]);
    assert_eq!(rows, vec![vec!["WO-9".to_owned(), "Pending".to_owned()]]);
}
