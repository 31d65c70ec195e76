use crate::api::{ApiError, PropertyApi};
use crate::model::{Property, PropertyDraft, PropertySummary};
use crate::store::{LocalStore, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Writes require connectivity; nothing was sent.
    #[error("offline: the operation requires a connection")]
    Offline,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How a read was ultimately served. `fallback_from` carries the gateway
/// failure that forced a cache fallback so Unauthorized/Conflict reach the
/// presentation layer instead of being swallowed.
#[derive(Debug)]
pub enum Served {
    Remote,
    Cache { fallback_from: Option<ApiError> },
}

/// The hub: decides online/offline routing for every operation, mirrors
/// remote results into the local store, and owns the canonical in-memory
/// collections for the session.
///
/// All methods take `&mut self`, so the owner is the single writer; a push
/// merge and a caller-initiated operation can never interleave partial
/// updates to the collections.
pub struct SyncCore<A: PropertyApi> {
    api: A,
    store: LocalStore,
    offline: bool,
    loading: bool,
    properties: Vec<Property>,
    summaries: Vec<PropertySummary>,
    selected: Option<Property>,
}

impl<A: PropertyApi> SyncCore<A> {
    pub fn new(api: A, store: LocalStore) -> Self {
        Self {
            api,
            store,
            offline: false,
            loading: false,
            properties: Vec::new(),
            summaries: Vec::new(),
            selected: None,
        }
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Seed the connectivity flag before the first load. Unlike
    /// [`set_connectivity`](Self::set_connectivity) this does not trigger a
    /// refresh.
    pub fn set_initial_connectivity(&mut self, online: bool) {
        self.offline = !online;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn summaries(&self) -> &[PropertySummary] {
        &self.summaries
    }

    pub fn selected(&self) -> Option<&Property> {
        self.selected.as_ref()
    }

    /// Refresh the list. Online: fetch summaries, publish them and replace
    /// the cache (destructively: a summary-only snapshot drops previously
    /// cached detail). Offline or on gateway failure: serve the cache;
    /// a failure also pins the session offline until connectivity changes.
    pub async fn load_summaries(&mut self) -> Result<Served, SyncError> {
        self.loading = true;
        let out = self.load_summaries_inner().await;
        self.loading = false;
        out
    }

    async fn load_summaries_inner(&mut self) -> Result<Served, SyncError> {
        if self.offline {
            self.properties = self.store.get_all()?;
            return Ok(Served::Cache {
                fallback_from: None,
            });
        }

        match self.api.list_summaries().await {
            Ok(summaries) => {
                self.store.replace_with_summaries(&summaries)?;
                self.summaries = summaries;
                Ok(Served::Remote)
            }
            Err(e) => {
                eprintln!("list fetch failed, falling back to local store: {e}");
                self.properties = self.store.get_all()?;
                self.offline = true;
                Ok(Served::Cache {
                    fallback_from: Some(e),
                })
            }
        }
    }

    /// Fetch one record. Absent is `Ok(None)` ("not found"), never an error;
    /// a gateway failure falls back to the cached row if there is one.
    pub async fn load_by_id(&mut self, id: i64) -> Result<Option<Served>, SyncError> {
        self.loading = true;
        let out = self.load_by_id_inner(id).await;
        self.loading = false;
        out
    }

    async fn load_by_id_inner(&mut self, id: i64) -> Result<Option<Served>, SyncError> {
        if self.offline {
            return Ok(match self.store.get_by_id(id)? {
                Some(property) => {
                    self.selected = Some(property);
                    Some(Served::Cache {
                        fallback_from: None,
                    })
                }
                None => None,
            });
        }

        match self.api.get_by_id(id).await {
            Ok(property) => {
                self.store.upsert(&property)?;
                self.selected = Some(property);
                Ok(Some(Served::Remote))
            }
            Err(e) => {
                eprintln!("detail fetch for id {id} failed, falling back to local store: {e}");
                Ok(match self.store.get_by_id(id)? {
                    Some(property) => {
                        self.selected = Some(property);
                        Some(Served::Cache {
                            fallback_from: Some(e),
                        })
                    }
                    None => None,
                })
            }
        }
    }

    /// Create a record remotely. Rejected without a network call when
    /// offline. The server-assigned id in the response is authoritative; the
    /// in-memory list is left unchanged; re-run [`load_summaries`]
    /// to observe the new record.
    ///
    /// [`load_summaries`]: Self::load_summaries
    pub async fn add(&mut self, draft: &PropertyDraft) -> Result<Property, SyncError> {
        if self.offline {
            return Err(SyncError::Offline);
        }
        self.loading = true;
        let out = self.api.create(draft).await;
        self.loading = false;
        Ok(out?)
    }

    /// Delete a record remotely, then drop it from the in-memory list. The
    /// local store keeps any stale row; the next full resync clears it.
    pub async fn delete(&mut self, id: i64) -> Result<(), SyncError> {
        if self.offline {
            return Err(SyncError::Offline);
        }
        self.loading = true;
        let out = self.api.delete_by_id(id).await;
        self.loading = false;
        out?;
        self.properties.retain(|p| p.id != id);
        Ok(())
    }

    /// Online-only: publish the unfiltered candidate set from the search
    /// endpoint. Filtering and sorting are the caller's job (see
    /// [`crate::search`]); the local store is not consulted or updated.
    pub async fn search(&mut self) -> Result<&[Property], SyncError> {
        if self.offline {
            return Err(SyncError::Offline);
        }
        self.loading = true;
        let out = self.api.search().await;
        self.loading = false;
        self.properties = out?;
        Ok(&self.properties)
    }

    /// Merge one pushed record: append to the in-memory list (a repeated id
    /// appends again rather than deduplicating) and mirror the record into
    /// the store so the cached row matches what was pushed. Store faults on
    /// this background path are logged only.
    pub fn apply_push(&mut self, property: Property) {
        if let Err(e) = self.store.upsert(&property) {
            eprintln!("failed to mirror pushed record {}: {e}", property.id);
        }
        self.properties.push(property);
    }

    /// Re-evaluate the externally supplied connectivity signal and refresh,
    /// so a reconnect repopulates from the remote source instead of staying
    /// pinned to stale cache.
    pub async fn set_connectivity(&mut self, online: bool) -> Result<Served, SyncError> {
        self.offline = !online;
        self.load_summaries().await
    }

    /// Access the owned store, e.g. for an explicit lifecycle call.
    pub fn store_mut(&mut self) -> &mut LocalStore {
        &mut self.store
    }
}
