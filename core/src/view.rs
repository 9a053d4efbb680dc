//! Storefront view: list state plus the load and purchase handlers.
//!
//! # Design
//! The view never performs I/O. Each handler returns a pending request
//! stamped with a ticket; the host executes the request and feeds the
//! outcome back together with that ticket. A ticket from an earlier mount
//! epoch, or a list ticket older than the latest issued load, is stale and
//! its outcome is dropped. This keeps a late response from landing on a
//! torn-down view or overwriting a fresher snapshot.
//!
//! The list is only ever replaced wholesale by a successful fetch. Failures
//! set the inline error and leave whatever was rendered before in place.

use crate::client::SweetsClient;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::render::{render_page, Page};
use crate::types::Sweet;

/// What the host got back from executing a request.
pub type Outcome = Result<HttpResponse, TransportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    epoch: u64,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseTicket {
    epoch: u64,
    id: u64,
}

impl PurchaseTicket {
    pub fn sweet_id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct PendingLoad {
    pub ticket: LoadTicket,
    pub request: HttpRequest,
}

#[derive(Debug, Clone)]
pub struct PendingPurchase {
    pub ticket: PurchaseTicket,
    pub request: HttpRequest,
}

/// Observable phase of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    /// Nothing loaded and no error yet.
    Unset,
    Loaded,
    /// An error is set. A previously loaded list may still be shown.
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadResult {
    Applied,
    Failed(ApiError),
    Discarded,
}

#[derive(Debug)]
pub enum PurchaseResult {
    /// Purchase went through; re-fetch the list.
    Reload(PendingLoad),
    /// Purchase failed; show `message` in a blocking notification.
    Notify(String),
    Discarded,
}

#[derive(Debug)]
pub struct Storefront {
    client: SweetsClient,
    sweets: Option<Vec<Sweet>>,
    error: Option<String>,
    mounted: bool,
    epoch: u64,
    generation: u64,
}

impl Storefront {
    pub fn new(client: SweetsClient) -> Self {
        Self {
            client,
            sweets: None,
            error: None,
            mounted: false,
            epoch: 0,
            generation: 0,
        }
    }

    pub fn client(&self) -> &SweetsClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut SweetsClient {
        &mut self.client
    }

    pub fn sweets(&self) -> Option<&[Sweet]> {
        self.sweets.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn phase(&self) -> ListPhase {
        match (&self.error, &self.sweets) {
            (Some(_), _) => ListPhase::Errored,
            (None, Some(_)) => ListPhase::Loaded,
            (None, None) => ListPhase::Unset,
        }
    }

    /// Start a new mount epoch and kick off the initial load.
    pub fn mount(&mut self) -> PendingLoad {
        self.epoch += 1;
        self.mounted = true;
        tracing::debug!(epoch = self.epoch, "storefront mounted");
        self.begin_load()
    }

    /// Tear down. Every outstanding ticket becomes stale.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.epoch += 1;
        tracing::debug!(epoch = self.epoch, "storefront unmounted");
    }

    pub fn begin_load(&mut self) -> PendingLoad {
        self.generation += 1;
        PendingLoad {
            ticket: LoadTicket {
                epoch: self.epoch,
                generation: self.generation,
            },
            request: self.client.build_list_sweets(),
        }
    }

    pub fn complete_load(&mut self, ticket: LoadTicket, outcome: Outcome) -> LoadResult {
        if !self.is_current_epoch(ticket.epoch) || ticket.generation != self.generation {
            tracing::debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                "discarding stale list response"
            );
            return LoadResult::Discarded;
        }

        let result = match outcome {
            Ok(response) => self.client.parse_list_sweets(response),
            Err(e) => {
                tracing::warn!(error = %e, "list request did not complete");
                Err(ApiError::ListFetch { status: None })
            }
        };

        match result {
            Ok(sweets) => {
                tracing::debug!(count = sweets.len(), "sweets loaded");
                self.sweets = Some(sweets);
                self.error = None;
                LoadResult::Applied
            }
            Err(e) => {
                tracing::warn!(error = %e, status = ?e.status(), "failed to load sweets");
                self.error = Some(e.to_string());
                LoadResult::Failed(e)
            }
        }
    }

    pub fn begin_purchase(&mut self, id: u64) -> PendingPurchase {
        PendingPurchase {
            ticket: PurchaseTicket {
                epoch: self.epoch,
                id,
            },
            request: self.client.build_purchase_sweet(id),
        }
    }

    pub fn complete_purchase(&mut self, ticket: PurchaseTicket, outcome: Outcome) -> PurchaseResult {
        if !self.is_current_epoch(ticket.epoch) {
            tracing::debug!(id = ticket.id, "discarding purchase response after teardown");
            return PurchaseResult::Discarded;
        }

        let result = match outcome {
            Ok(response) => self.client.parse_purchase_sweet(response),
            Err(e) => {
                tracing::warn!(error = %e, "purchase request did not complete");
                Err(ApiError::Purchase { status: None })
            }
        };

        match result {
            Ok(sweet) => {
                tracing::debug!(id = sweet.id, remaining = sweet.quantity, "purchase accepted");
                PurchaseResult::Reload(self.begin_load())
            }
            Err(e) => {
                tracing::warn!(id = ticket.id, error = %e, status = ?e.status(), "purchase failed");
                PurchaseResult::Notify(e.to_string())
            }
        }
    }

    pub fn page(&self, currency: &str) -> Page {
        render_page(self.sweets(), self.error(), currency)
    }

    fn is_current_epoch(&self, epoch: u64) -> bool {
        self.mounted && epoch == self.epoch
    }
}
