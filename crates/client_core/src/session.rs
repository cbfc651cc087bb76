use std::sync::Arc;

use shared::{
    domain::{OrderResult, Product, ProductId},
    error::ShopError,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, warn};

use crate::{cart::Cart, totals::OrderTotals, SessionEvent, ShopBackend};

pub const ORDER_REJECTED_FALLBACK: &str = "Error while saving the order";
pub const ORDER_INTERRUPTED_MESSAGE: &str =
    "Order submission was interrupted before the shop replied; the order may or may not have been saved";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded {
        order_id: Option<String>,
    },
    Failed {
        message: String,
    },
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }
}

struct SessionState {
    cart: Cart,
    submission: SubmissionState,
    last_result: Option<OrderResult>,
}

impl SessionState {
    fn ensure_not_submitting(&self) -> Result<(), ShopError> {
        if self.submission.is_submitting() {
            return Err(ShopError::SubmissionInFlight);
        }
        Ok(())
    }

    /// Moves a submission nobody is waiting on any more to `Failed`. Cart and shelf are left
    /// as they were.
    fn abandon_submission(&mut self) -> Option<OrderResult> {
        if !self.submission.is_submitting() {
            return None;
        }
        let result = OrderResult::failed(ORDER_INTERRUPTED_MESSAGE);
        self.submission = SubmissionState::Failed {
            message: result.message.clone(),
        };
        self.last_result = Some(result.clone());
        Some(result)
    }
}

/// Held by `submit_order` while the backend call is pending. If the submitting future is
/// dropped (timeout, `select!`, aborted task) the session leaves `Submitting`.
struct InFlightSubmission {
    session: Arc<ShopSession>,
    settled: bool,
}

impl Drop for InFlightSubmission {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("order submission dropped before completion");
        match self.session.inner.try_lock() {
            Ok(mut state) => {
                let abandoned = state.abandon_submission();
                drop(state);
                if let Some(result) = abandoned {
                    self.session.emit(SessionEvent::OrderCompleted(result));
                }
            }
            Err(_) => match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let session = Arc::clone(&self.session);
                    handle.spawn(async move {
                        let abandoned = session.inner.lock().await.abandon_submission();
                        if let Some(result) = abandoned {
                            session.emit(SessionEvent::OrderCompleted(result));
                        }
                    });
                }
                Err(_) => error!("no runtime to reset an interrupted order submission"),
            },
        }
    }
}

/// Shared cart controller. Catalog, cart and submission state sit behind one lock so every
/// operation observes them together.
pub struct ShopSession {
    backend: Arc<dyn ShopBackend>,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl ShopSession {
    pub fn new(backend: Arc<dyn ShopBackend>) -> Arc<Self> {
        Self::with_catalog(backend, Vec::new())
    }

    pub fn with_catalog(backend: Arc<dyn ShopBackend>, products: Vec<Product>) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            backend,
            inner: Mutex::new(SessionState {
                cart: Cart::new(products),
                submission: SubmissionState::Idle,
                last_result: None,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    /// Replaces the catalog with a fresh one from the backend, emptying the cart.
    ///
    /// A failed fetch is logged and leaves the current catalog in place.
    pub async fn load_catalog(&self) -> Result<(), ShopError> {
        self.inner.lock().await.ensure_not_submitting()?;

        let products = match self.backend.fetch_products().await {
            Ok(products) => products,
            Err(e) => {
                error!(error = %e, "failed to load products");
                return Ok(());
            }
        };

        let mut guard = self.inner.lock().await;
        if let Err(e) = guard.ensure_not_submitting() {
            warn!("order submission started while the catalog was loading; discarding catalog");
            return Err(e);
        }
        let count = products.len();
        guard.cart = Cart::new(products);
        drop(guard);

        info!(products = count, "catalog loaded");
        self.emit(SessionEvent::CatalogLoaded { products: count });
        Ok(())
    }

    pub async fn add_to_cart(&self, product_id: ProductId, quantity: u32) -> Result<(), ShopError> {
        {
            let mut guard = self.inner.lock().await;
            guard.ensure_not_submitting()?;
            guard.cart.add(product_id, quantity)?;
        }
        self.emit(SessionEvent::CartChanged);
        Ok(())
    }

    /// Returns the number of units actually taken out of the cart.
    pub async fn remove_from_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<u32, ShopError> {
        let removed = {
            let mut guard = self.inner.lock().await;
            guard.ensure_not_submitting()?;
            guard.cart.remove(product_id, quantity)?
        };
        if removed > 0 {
            self.emit(SessionEvent::CartChanged);
        }
        Ok(removed)
    }

    pub async fn order_totals(&self) -> OrderTotals {
        self.inner.lock().await.cart.totals()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.inner.lock().await.cart.products().to_vec()
    }

    pub async fn cart_lines(&self) -> Vec<(ProductId, u32)> {
        self.inner.lock().await.cart.lines().collect()
    }

    /// Consistent copy of catalog and cart taken under the lock.
    pub async fn snapshot(&self) -> Cart {
        self.inner.lock().await.cart.clone()
    }

    pub async fn submission_state(&self) -> SubmissionState {
        self.inner.lock().await.submission.clone()
    }

    pub async fn last_result(&self) -> Option<OrderResult> {
        self.inner.lock().await.last_result.clone()
    }

    /// Sends the cart as one order.
    ///
    /// `EmptyCart` and `SubmissionInFlight` are returned before any state change. Otherwise the
    /// session ends in `Succeeded` (cart emptied, shelf counts kept) or `Failed` (cart and
    /// shelf untouched), with the outcome recorded in [`ShopSession::last_result`].
    ///
    /// Dropping the returned future mid-flight moves the session to `Failed` with
    /// [`ORDER_INTERRUPTED_MESSAGE`], so it never stays stuck in `Submitting`.
    pub async fn submit_order(self: &Arc<Self>) -> Result<OrderResult, ShopError> {
        let request = {
            let mut guard = self.inner.lock().await;
            guard.ensure_not_submitting()?;
            if guard.cart.is_empty() {
                return Err(ShopError::EmptyCart);
            }
            guard.submission = SubmissionState::Submitting;
            guard.last_result = None;
            guard.cart.order_request()
        };
        let mut in_flight = InFlightSubmission {
            session: Arc::clone(self),
            settled: false,
        };
        self.emit(SessionEvent::OrderSubmitting);
        info!(items = request.items.len(), "submitting order");

        let outcome = match self.backend.save_order(&request).await {
            Ok(response) if response.success => {
                Ok(OrderResult::succeeded(
                    response.order_id.filter(|id| !id.trim().is_empty()),
                ))
            }
            Ok(response) => Err(ShopError::ServerRejected(
                response
                    .error
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| ORDER_REJECTED_FALLBACK.to_string()),
            )),
            Err(e) => Err(e),
        };

        let result = {
            let mut guard = self.inner.lock().await;
            in_flight.settled = true;
            let result = match &outcome {
                Ok(result) => {
                    guard.cart.consume_cart();
                    guard.submission = SubmissionState::Succeeded {
                        order_id: result.order_id.clone(),
                    };
                    result.clone()
                }
                Err(e) => {
                    let result = OrderResult::failed(failure_message(e));
                    guard.submission = SubmissionState::Failed {
                        message: result.message.clone(),
                    };
                    result
                }
            };
            guard.last_result = Some(result.clone());
            result
        };

        match &outcome {
            Ok(_) => info!(order_id = ?result.order_id, "order saved"),
            Err(e) => warn!(error = %e, "order submission failed"),
        }
        self.emit(SessionEvent::OrderCompleted(result));
        outcome
    }
}

fn failure_message(err: &ShopError) -> String {
    match err {
        ShopError::ServerRejected(message) => message.clone(),
        ShopError::TransportFailure(detail) => format!("Connection error: {detail}"),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
