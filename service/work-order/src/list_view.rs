use std::{collections::BTreeSet, sync::Arc, time::Duration};

use domain_session::exception::GatewayException;
use domain_work_order::{
    endpoint::{ListWorkOrders, QueryEndpoint},
    exception::WorkOrderResult,
    model::{
        entity::WorkOrder,
        vo::{Column, FilterField, ListFilter, Pagination, WorkOrderPage},
    },
};

use crate::{Debouncer, QueryCache, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Ready,
    /// The server could not be reached.
    ConnectionError,
    Failed,
}

/// State of the work-order table: filters, paging, visible columns and the
/// debounced search box.
pub struct ListView {
    cache: Arc<QueryCache>,
    filter: ListFilter,
    columns: BTreeSet<Column>,
    search_input: String,
    debouncer: Debouncer<String>,
    searches: flume::Receiver<String>,
    subscription: Option<Subscription>,
    status: ListStatus,
    page: Option<Arc<WorkOrderPage>>,
    error: Option<String>,
}

impl ListView {
    pub fn new(cache: Arc<QueryCache>, debounce: Duration) -> Self {
        let (debouncer, searches) = Debouncer::new(debounce);
        Self {
            cache,
            filter: ListFilter::new(),
            columns: Column::ALL.iter().copied().collect(),
            search_input: String::new(),
            debouncer,
            searches,
            subscription: None,
            status: ListStatus::Idle,
            page: None,
            error: None,
        }
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    pub fn status(&self) -> ListStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Set one filter. Any change other than paging returns to the first page.
    pub fn set_filter(&mut self, field: FilterField, value: &str) -> WorkOrderResult<bool> {
        if field == FilterField::Page {
            // validated like any other filter value, then clamped
            let page = ListFilter::new().with(field, value)?.page();
            return Ok(self.set_page(page));
        }
        let changed = self.filter.set(field, value)?;
        if changed {
            self.filter.set_page(1);
            if field == FilterField::Search {
                self.search_input = value.trim().to_owned();
                self.debouncer.cancel();
            }
        }
        Ok(changed)
    }

    pub fn set_limit(&mut self, limit: u32) -> bool {
        let before = self.filter.limit();
        self.filter.set_limit(limit);
        let changed = self.filter.limit() != before;
        if changed {
            self.filter.set_page(1);
        }
        changed
    }

    /// Drop every filter and go back to page one; the page size is kept.
    pub fn clear_filters(&mut self) {
        let limit = self.filter.limit();
        self.filter = ListFilter::new();
        self.filter.set_limit(limit);
        self.search_input.clear();
        self.debouncer.cancel();
    }

    /// Record a keystroke in the search box. The query follows after the quiet period.
    pub fn type_search(&mut self, raw: &str) {
        self.search_input = raw.to_owned();
        self.debouncer.input(raw.trim().to_owned());
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Debounced search values, ready to pass to [`ListView::apply_search`].
    pub fn searches(&self) -> flume::Receiver<String> {
        self.searches.clone()
    }

    /// True while the typed text has not reached the query yet.
    pub fn is_searching(&self) -> bool {
        self.search_input.trim() != self.filter.get(FilterField::Search).unwrap_or_default()
    }

    /// Wait for the next debounced search value and apply it.
    pub async fn next_search(&mut self) -> WorkOrderResult<bool> {
        match self.searches.recv_async().await {
            Ok(value) => self.apply_search(&value),
            Err(_) => Ok(false),
        }
    }

    pub fn apply_search(&mut self, value: &str) -> WorkOrderResult<bool> {
        let changed = self.filter.set(FilterField::Search, value)?;
        if changed {
            self.filter.set_page(1);
        }
        Ok(changed)
    }

    /// Clamp into `[1, totalPages]` once a page is known.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = match self.pagination() {
            Some(pagination) => pagination.clamp(page),
            None => page.max(1),
        };
        let changed = page != self.filter.page();
        self.filter.set_page(page);
        changed
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.filter.page().saturating_add(1))
    }

    pub fn previous_page(&mut self) -> bool {
        self.set_page(self.filter.page().saturating_sub(1))
    }

    pub fn toggle_column(&mut self, column: Column) -> bool {
        if !self.columns.remove(&column) {
            self.columns.insert(column);
        }
        self.columns.contains(&column)
    }

    pub fn set_columns(&mut self, columns: impl IntoIterator<Item = Column>) {
        self.columns = columns.into_iter().collect();
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.iter().copied()
    }

    /// Fetch the current page, keeping a subscription on it so mutations refresh it.
    #[tracing::instrument(skip_all, fields(query = %ListWorkOrders::cache_key(&self.filter)))]
    pub async fn load(&mut self) -> ListStatus {
        let subscription = self.cache.subscribe::<ListWorkOrders>(&self.filter);
        // subscribe to the new key before releasing the old one
        self.subscription = Some(subscription);
        self.status = ListStatus::Loading;

        match self.cache.query::<ListWorkOrders>(&self.filter).await {
            Ok(page) => {
                self.page = Some(page);
                self.error = None;
                self.status = ListStatus::Ready;
            }
            Err(e) => {
                tracing::warn!("Loading work orders failed: {e}");
                self.status = match e {
                    GatewayException::Connection { .. } => ListStatus::ConnectionError,
                    _ => ListStatus::Failed,
                };
                self.error = Some(e.to_string());
            }
        }
        self.status
    }

    /// Current page as last stored in the cache, refreshed by invalidations.
    pub fn page(&self) -> Option<Arc<WorkOrderPage>> {
        self.cache
            .peek::<ListWorkOrders>(&self.filter)
            .or_else(|| self.page.clone())
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.page().map(|page| page.pagination)
    }

    pub fn work_orders(&self) -> Vec<WorkOrder> {
        self.page().map(|page| page.data.clone()).unwrap_or_default()
    }

    /// Header and cell text of the visible columns.
    pub fn rows(&self) -> (Vec<&'static str>, Vec<Vec<String>>) {
        let header = self.visible_columns().map(|c| c.label()).collect();
        let rows = self
            .work_orders()
            .iter()
            .map(|w| self.visible_columns().map(|c| c.cell(w)).collect())
            .collect();
        (header, rows)
    }
}
