//! Client-side product cache with loading and error tracking.
//!
//! # Design
//! `ProductStore` never touches the network itself. Every operation is a
//! `begin_*` call that marks work in flight and hands out a ticket, and a
//! `complete_*` call that takes the ticket back together with the remote
//! result. The cache is only patched once a result is known to be a success.
//! Hosts that run I/O on their own executor drive the pairs directly; the
//! blocking `*_product(s)` methods run a pair through a `ProductService`.
//!
//! Fetch tickets carry a generation. Completing a fetch older than the most
//! recently begun one is a no-op, so a slow first list response cannot
//! overwrite the result of a later list.

use tracing::{debug, warn};

use crate::error::{ApiError, StoreError, StoreOperation};
use crate::service::ProductService;
use crate::transport::Transport;
use crate::types::{Product, ProductId, ProductInput, ProductPatch};

/// Handed out by `begin_fetch`, consumed by `complete_fetch`.
#[derive(Debug)]
#[must_use = "a fetch ticket must be passed to complete_fetch"]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Handed out by `begin_mutation`, consumed by one of the `complete_*`
/// mutation methods.
#[derive(Debug)]
#[must_use = "a mutation ticket must be passed to a complete_* method"]
pub struct MutationTicket {
    _private: (),
}

/// What `complete_fetch` did with a list result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The cache now holds this many products.
    Applied(usize),
    /// A newer fetch was begun; the result was discarded.
    Stale,
    /// The fetch failed; the previous cache was kept.
    Failed(StoreError),
}

#[derive(Debug, Default)]
pub struct ProductStore {
    products: Vec<Product>,
    in_flight: usize,
    error: Option<StoreError>,
    latest_fetch: u64,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    // -----------------------------------------------------------------------
    // Begin / complete
    // -----------------------------------------------------------------------

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_fetch += 1;
        self.start();
        FetchTicket {
            generation: self.latest_fetch,
        }
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Product>, ApiError>,
    ) -> FetchOutcome {
        self.finish();
        if ticket.generation < self.latest_fetch {
            warn!(
                generation = ticket.generation,
                latest = self.latest_fetch,
                "discarding stale product list"
            );
            return FetchOutcome::Stale;
        }
        match result {
            Ok(products) => {
                debug!(count = products.len(), "replaced product cache");
                self.products = products;
                FetchOutcome::Applied(self.products.len())
            }
            Err(source) => FetchOutcome::Failed(self.record(StoreOperation::Fetch, source)),
        }
    }

    pub fn begin_mutation(&mut self) -> MutationTicket {
        self.start();
        MutationTicket { _private: () }
    }

    pub fn complete_create(
        &mut self,
        _ticket: MutationTicket,
        result: Result<Product, ApiError>,
    ) -> Result<Product, ApiError> {
        self.finish();
        match result {
            Ok(product) => {
                debug!(id = %product.id, "appended product");
                self.products.push(product.clone());
                Ok(product)
            }
            Err(source) => Err(self.record(StoreOperation::Create, source).source),
        }
    }

    pub fn complete_update(
        &mut self,
        _ticket: MutationTicket,
        id: &ProductId,
        result: Result<Product, ApiError>,
    ) -> Result<Product, ApiError> {
        self.finish();
        match result {
            Ok(product) if &product.id != id => {
                warn!(
                    %id,
                    returned = %product.id,
                    "updated product changed identity; cache left as is"
                );
                Ok(product)
            }
            Ok(product) => {
                match self.products.iter_mut().find(|p| &p.id == id) {
                    Some(slot) => {
                        *slot = product.clone();
                        debug!(%id, "replaced product");
                    }
                    None => warn!(%id, "updated product is not cached"),
                }
                Ok(product)
            }
            Err(source) => Err(self.record(StoreOperation::Update, source).source),
        }
    }

    pub fn complete_delete(
        &mut self,
        _ticket: MutationTicket,
        id: &ProductId,
        result: Result<(), ApiError>,
    ) -> Result<(), ApiError> {
        self.finish();
        match result {
            Ok(()) => {
                let before = self.products.len();
                self.products.retain(|p| &p.id != id);
                debug!(%id, removed = before - self.products.len(), "removed product");
                Ok(())
            }
            Err(source) => Err(self.record(StoreOperation::Delete, source).source),
        }
    }

    // -----------------------------------------------------------------------
    // Blocking operations
    // -----------------------------------------------------------------------

    /// Replace the cache with the remote list. Failures are recorded in
    /// `error()` and also returned in the outcome.
    pub fn fetch_products<T: Transport>(
        &mut self,
        service: &ProductService<T>,
        search: Option<&str>,
    ) -> FetchOutcome {
        let ticket = self.begin_fetch();
        let result = service.list(search);
        self.complete_fetch(ticket, result)
    }

    pub fn create_product<T: Transport>(
        &mut self,
        service: &ProductService<T>,
        input: &ProductInput,
    ) -> Result<Product, ApiError> {
        let ticket = self.begin_mutation();
        let result = service.create(input);
        self.complete_create(ticket, result)
    }

    pub fn update_product<T: Transport>(
        &mut self,
        service: &ProductService<T>,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError> {
        let ticket = self.begin_mutation();
        let result = service.update(id, patch);
        self.complete_update(ticket, id, result)
    }

    pub fn delete_product<T: Transport>(
        &mut self,
        service: &ProductService<T>,
        id: &ProductId,
    ) -> Result<(), ApiError> {
        let ticket = self.begin_mutation();
        let result = service.delete(id);
        self.complete_delete(ticket, id, result)
    }

    fn start(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn record(&mut self, operation: StoreOperation, source: ApiError) -> StoreError {
        let error = StoreError { operation, source };
        warn!(error = %error, "product operation failed");
        self.error = Some(error.clone());
        error
    }
}
