use std::{
    any::Any,
    collections::HashSet,
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use dashmap::DashMap;
use domain_session::{
    exception::{GatewayException, GatewayResult},
    service::ApiGateway,
};
use domain_work_order::{
    endpoint::{MutationEndpoint, QueryEndpoint},
    model::vo::{CacheKey, CacheTag},
};
use futures::{
    future::{join_all, BoxFuture, Shared},
    FutureExt,
};
use tokio::time::Instant;
use typed_builder::TypedBuilder;

pub const DEFAULT_KEEP_UNUSED_FOR: Duration = Duration::from_secs(60);

type Value = Arc<dyn Any + Send + Sync>;
type FetchResult = Result<(Value, Vec<CacheTag>), GatewayException>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;
type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, FetchResult> + Send + Sync>;
type Entries = Arc<DashMap<CacheKey, Entry>>;

enum EntryState {
    Idle,
    Pending(SharedFetch),
    Fulfilled(Value),
    Rejected(GatewayException),
}

struct Entry {
    tags: HashSet<CacheTag>,
    subscribers: usize,
    state: EntryState,
    generation: u64,
    fetcher: Fetcher,
    unused_since: Option<Instant>,
}

impl Entry {
    fn new(fetcher: Fetcher) -> Self {
        Self {
            tags: HashSet::new(),
            subscribers: 0,
            state: EntryState::Idle,
            generation: 0,
            fetcher,
            unused_since: Some(Instant::now()),
        }
    }

    fn is_expired(&self, now: Instant, keep_unused_for: Duration) -> bool {
        self.subscribers == 0
            && self
                .unused_since
                .is_some_and(|since| now.duration_since(since) >= keep_unused_for)
    }

    fn provides_any(&self, tags: &[CacheTag]) -> bool {
        tags.iter().any(|tag| self.tags.contains(tag))
    }
}

/// Keys touched by one invalidation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationOutcome {
    pub refetched: Vec<CacheKey>,
    pub dropped: Vec<CacheKey>,
}

impl InvalidationOutcome {
    pub fn is_empty(&self) -> bool {
        self.refetched.is_empty() && self.dropped.is_empty()
    }
}

/// # Tag-invalidated client cache.
///
/// Entries are keyed by endpoint name and canonical arguments. Identical
/// in-flight reads share one request. Each fetch is stamped with a
/// generation; a result whose generation was superseded is not stored.
#[derive(TypedBuilder)]
pub struct QueryCache {
    gateway: Arc<dyn ApiGateway>,
    #[builder(default = DEFAULT_KEEP_UNUSED_FOR)]
    keep_unused_for: Duration,
    #[builder(default, setter(skip))]
    entries: Entries,
    #[builder(default, setter(skip))]
    generation: AtomicU64,
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.len())
            .field("keep_unused_for", &self.keep_unused_for)
            .finish()
    }
}

/// Active interest in one cache entry. Dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    entries: Entries,
    key: CacheKey,
}

impl Subscription {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subscription").field(&self.key.to_string()).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(mut entry) = self.entries.get_mut(&self.key) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
            if entry.subscribers == 0 {
                entry.unused_since = Some(Instant::now());
            }
        }
    }
}

fn fetcher<E: QueryEndpoint>(gateway: Arc<dyn ApiGateway>, args: E::Args) -> Fetcher {
    Arc::new(move || {
        let gateway = gateway.clone();
        let args = args.clone();
        async move {
            let response = gateway.execute(E::request(&args)).await?;
            let output = E::decode(&response)?;
            let tags = E::provides(&args, &output);
            Ok((Arc::new(output) as Value, tags))
        }
        .boxed()
    })
}

fn downcast<E: QueryEndpoint>(value: Value) -> GatewayResult<Arc<E::Output>> {
    value.downcast::<E::Output>().map_err(|_| GatewayException::Decode {
        message: format!("cached value of {} has an unexpected type", E::NAME),
    })
}

impl QueryCache {
    fn entry_for<E: QueryEndpoint>(
        &self,
        key: &CacheKey,
        args: &E::Args,
    ) -> dashmap::mapref::one::RefMut<'_, CacheKey, Entry> {
        self.entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(fetcher::<E>(self.gateway.clone(), args.clone())))
    }

    fn start_fetch(&self, entry: &mut Entry) -> (u64, SharedFetch) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let fetch = (entry.fetcher)().shared();
        entry.generation = generation;
        entry.state = EntryState::Pending(fetch.clone());
        (generation, fetch)
    }

    /// Store a finished fetch unless the entry moved on to a newer one.
    fn settle(&self, key: &CacheKey, generation: u64, result: &FetchResult) {
        let Some(mut entry) = self.entries.get_mut(key) else {
            tracing::debug!(%key, "Entry dropped while fetching, result discarded");
            return;
        };
        if entry.generation != generation || !matches!(entry.state, EntryState::Pending(_)) {
            tracing::debug!(%key, generation, "Superseded fetch discarded");
            return;
        }
        match result {
            Ok((value, tags)) => {
                entry.tags = tags.iter().cloned().collect();
                entry.state = EntryState::Fulfilled(value.clone());
            }
            Err(e) => entry.state = EntryState::Rejected(e.clone()),
        }
        if entry.subscribers == 0 {
            entry.unused_since = Some(Instant::now());
        }
    }

    fn purge_expired(&self) {
        let now = Instant::now();
        let keep = self.keep_unused_for;
        self.entries.retain(|key, entry| {
            let expired =
                entry.is_expired(now, keep) && !matches!(entry.state, EntryState::Pending(_));
            if expired {
                tracing::trace!(%key, "Unused entry expired");
            }
            !expired
        });
    }

    /// Register interest in an entry so invalidation refetches it instead of dropping it.
    pub fn subscribe<E: QueryEndpoint>(&self, args: &E::Args) -> Subscription {
        let key = E::cache_key(args);
        let mut entry = self.entry_for::<E>(&key, args);
        entry.subscribers += 1;
        entry.unused_since = None;
        drop(entry);
        Subscription {
            entries: self.entries.clone(),
            key,
        }
    }

    /// Cached value when fresh, otherwise one shared request.
    pub async fn query<E: QueryEndpoint>(&self, args: &E::Args) -> GatewayResult<Arc<E::Output>> {
        self.purge_expired();
        let key = E::cache_key(args);
        let (generation, fetch) = {
            let mut entry = self.entry_for::<E>(&key, args);
            if !E::REFETCH_ON_MOUNT {
                if let EntryState::Fulfilled(value) = &entry.state {
                    tracing::trace!(%key, "Cache hit");
                    return downcast::<E>(value.clone());
                }
            }
            let pending = match &entry.state {
                EntryState::Pending(fetch) => Some((entry.generation, fetch.clone())),
                _ => None,
            };
            match pending {
                Some(pending) => {
                    tracing::trace!(%key, "Joining in-flight fetch");
                    pending
                }
                None => {
                    tracing::debug!(%key, "Fetching");
                    self.start_fetch(&mut entry)
                }
            }
        };
        let result = fetch.await;
        self.settle(&key, generation, &result);
        downcast::<E>(result?.0)
    }

    /// Last stored value, without fetching.
    pub fn peek<E: QueryEndpoint>(&self, args: &E::Args) -> Option<Arc<E::Output>> {
        let entry = self.entries.get(&E::cache_key(args))?;
        match &entry.state {
            EntryState::Fulfilled(value) => downcast::<E>(value.clone()).ok(),
            _ => None,
        }
    }

    /// Run a mutation, then invalidate the tags it names.
    ///
    /// Subscribed reads are refetched before this returns; invalidation only
    /// happens after the mutation itself succeeded.
    pub async fn mutate<E: MutationEndpoint>(&self, args: &E::Args) -> GatewayResult<E::Output> {
        let response = self.gateway.execute(E::request(args)?).await?;
        let output = E::decode(&response)?;
        let tags = E::invalidates(args, &output);
        let outcome = self.invalidate(&tags).await;
        tracing::debug!(
            mutation = E::NAME,
            refetched = outcome.refetched.len(),
            dropped = outcome.dropped.len(),
            "Mutation applied"
        );
        Ok(output)
    }

    /// Refetch subscribed entries providing any of `tags` and drop the rest.
    pub async fn invalidate(&self, tags: &[CacheTag]) -> InvalidationOutcome {
        let matched: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|entry| entry.provides_any(tags))
            .map(|entry| entry.key().clone())
            .collect();

        let mut outcome = InvalidationOutcome::default();
        let mut fetches = Vec::new();
        for key in matched {
            if self
                .entries
                .remove_if(&key, |_, entry| entry.subscribers == 0)
                .is_some()
            {
                tracing::debug!(%key, "Invalidated entry dropped");
                outcome.dropped.push(key);
                continue;
            }
            let started = self.entries.get_mut(&key).map(|mut entry| self.start_fetch(&mut entry));
            if let Some((generation, fetch)) = started {
                tracing::debug!(%key, "Invalidated entry refetching");
                fetches.push((key.clone(), generation, fetch));
                outcome.refetched.push(key);
            }
        }

        let results = join_all(fetches.iter().map(|(_, _, fetch)| fetch.clone())).await;
        for ((key, generation, _), result) in fetches.iter().zip(results) {
            if let Err(e) = &result {
                tracing::warn!(%key, "Refetch after invalidation failed: {e}");
            }
            self.settle(key, *generation, &result);
        }
        outcome
    }

    /// Force a refetch of one entry. Returns `false` when nothing is cached under `key`.
    pub async fn refetch(&self, key: &CacheKey) -> GatewayResult<bool> {
        let started = self.entries.get_mut(key).map(|mut entry| self.start_fetch(&mut entry));
        let Some((generation, fetch)) = started else {
            return Ok(false);
        };
        let result = fetch.await;
        self.settle(key, generation, &result);
        result.map(|_| true)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn subscribers(&self, key: &CacheKey) -> usize {
        self.entries.get(key).map_or(0, |entry| entry.subscribers)
    }

    /// Last error stored for `key`, if its latest fetch failed.
    pub fn error(&self, key: &CacheKey) -> Option<GatewayException> {
        match &self.entries.get(key)?.state {
            EntryState::Rejected(e) => Some(e.clone()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop everything, e.g. after the session ended.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
