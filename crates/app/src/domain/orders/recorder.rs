//! Order recorder.

use std::{
    mem,
    sync::{Arc, Mutex, PoisonError},
};

use jiff::Timestamp;
use storefront::{Order, OrderDraft, PaymentMethod, order_id_at};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::{
    domain::{
        cart::CartStore,
        orders::{errors::OrderError, mirror::OrderMirror},
    },
    storage::{JsonStore, KeyValueStore, LAST_ORDER_KEY, ORDERS_KEY},
};

/// Owns the order history.
///
/// Recording an order prepends it to `orders`, replaces `lastOrder`, clears the cart and,
/// when a mirror is configured, forwards a copy in the background.
pub struct OrderRecorder {
    store: Arc<dyn KeyValueStore>,
    carts: CartStore,
    mirror: Option<Arc<dyn OrderMirror>>,
    last_id: Mutex<i64>,
    mirrors: Mutex<JoinSet<()>>,
}

impl OrderRecorder {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, carts: CartStore) -> Self {
        Self {
            store,
            carts,
            mirror: None,
            last_id: Mutex::new(0),
            mirrors: Mutex::new(JoinSet::new()),
        }
    }

    /// Forward recorded orders to `mirror`.
    #[must_use]
    pub fn with_mirror(mut self, mirror: Arc<dyn OrderMirror>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Validate and record an order.
    ///
    /// Must be called from within a Tokio runtime when a mirror is configured.
    ///
    /// # Errors
    ///
    /// - [`OrderError::Validation`] when buyer details are incomplete or malformed.
    /// - [`OrderError::MissingProvider`] for an e-wallet payment without a provider.
    /// - [`OrderError::Storage`] when the order cannot be saved.
    ///
    /// Nothing is written when validation fails. Once the order is saved it is returned
    /// even if clearing the cart fails.
    pub fn record(&self, mut draft: OrderDraft) -> Result<Order, OrderError> {
        draft.customer = draft.customer.validate()?;

        if draft.method == PaymentMethod::EWallet
            && draft.payment.provider.as_deref().is_none_or(str::is_empty)
        {
            return Err(OrderError::MissingProvider);
        }

        let mut orders = self.orders()?;

        let order_id = self.next_order_id(orders.first());

        let order = draft.into_order(order_id, Timestamp::now());

        orders.insert(0, order.clone());

        self.store.set_json(ORDERS_KEY, &orders)?;
        self.store.set_json(LAST_ORDER_KEY, &order)?;

        info!(
            order_id = %order.order_id,
            total = order.total,
            status = ?order.payment.status,
            "order recorded"
        );

        self.forward(&order);

        if let Err(error) = self.carts.clear() {
            warn!(
                order_id = %order.order_id,
                "order recorded but the cart was not cleared: {error}"
            );
        }

        Ok(order)
    }

    /// Order history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored history cannot be read.
    pub fn orders(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.store.get_json(ORDERS_KEY)?.unwrap_or_default())
    }

    /// Most recently recorded order.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored order cannot be read.
    pub fn last_order(&self) -> Result<Option<Order>, OrderError> {
        Ok(self.store.get_json(LAST_ORDER_KEY)?)
    }

    /// Wait for outstanding mirror requests.
    pub async fn flush(&self) {
        let mut pending = {
            let mut mirrors = self.mirrors.lock().unwrap_or_else(PoisonError::into_inner);

            mem::take(&mut *mirrors)
        };

        while let Some(joined) = pending.join_next().await {
            if let Err(error) = joined {
                warn!("order mirror task failed: {error}");
            }
        }
    }

    /// Ids are `ORD-<millis>`, strictly increasing even within one millisecond and across
    /// processes sharing the store.
    fn next_order_id(&self, newest: Option<&Order>) -> String {
        let stored = newest
            .and_then(|order| order.order_id.strip_prefix("ORD-"))
            .and_then(|millis| millis.parse::<i64>().ok())
            .unwrap_or(0);

        let mut last = self.last_id.lock().unwrap_or_else(PoisonError::into_inner);

        let floor = (*last).max(stored).saturating_add(1);
        let millis = Timestamp::now().as_millisecond().max(floor);

        *last = millis;

        order_id_at(millis)
    }

    fn forward(&self, order: &Order) {
        let Some(mirror) = self.mirror.clone() else {
            return;
        };

        let order = order.clone();

        self.mirrors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .spawn(async move {
                if let Err(error) = mirror.mirror(&order).await {
                    warn!(order_id = %order.order_id, "failed to mirror order: {error}");
                }
            });
    }
}

impl std::fmt::Debug for OrderRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderRecorder")
            .field("carts", &self.carts)
            .field("mirrored", &self.mirror.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{io, num::NonZeroU32};

    use reqwest::StatusCode;
    use storefront::{
        BuyerDetails, BuyerField, LineItem, PaymentResult, PaymentStatus, ShippingSelection,
        compute_totals,
    };
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        domain::orders::{MirrorError, mirror::MockOrderMirror},
        storage::{CART_KEY, MemoryStore, MockKeyValueStore, StoreError},
    };

    use super::*;

    fn buyer() -> BuyerDetails {
        BuyerDetails {
            first_name: " Siti ".to_string(),
            last_name: "Rahma".to_string(),
            email: "siti@example.co.id".to_string(),
            phone: "081234567890".to_string(),
            address: "Jl. Merdeka 10".to_string(),
            city: "Bandung".to_string(),
            postal_code: "40111".to_string(),
        }
    }

    fn draft(method: PaymentMethod, payment: PaymentResult) -> TestResult<OrderDraft> {
        let items = vec![LineItem::new(
            Uuid::now_v7(),
            "Cat Food",
            100_000,
            NonZeroU32::new(2).ok_or("qty")?,
            "",
        )];
        let shipping = ShippingSelection::regular();
        let totals = compute_totals(&items, &shipping, method)?;

        Ok(OrderDraft {
            customer: buyer(),
            items,
            shipping,
            method,
            payment,
            totals,
        })
    }

    fn bank_draft() -> TestResult<OrderDraft> {
        let payment = PaymentResult::offline(PaymentMethod::BankTransfer, 1).ok_or("payment")?;

        draft(PaymentMethod::BankTransfer, payment)
    }

    fn recorder() -> (Arc<MemoryStore>, CartStore, OrderRecorder) {
        let store = Arc::new(MemoryStore::new());
        let carts = CartStore::new(store.clone());
        let recorder = OrderRecorder::new(store.clone(), carts.clone());

        (store, carts, recorder)
    }

    #[tokio::test]
    async fn records_order_and_clears_cart() -> TestResult {
        let (_store, carts, recorder) = recorder();

        let mut draft = bank_draft()?;

        for item in &draft.items {
            carts.add_item(item.clone())?;
        }

        let mut changes = carts.subscribe();

        draft.customer.city = " Bandung ".to_string();

        let order = recorder.record(draft)?;

        assert_eq!(order.customer.first_name, "Siti", "buyer details are trimmed");
        assert_eq!(order.customer.city, "Bandung", "buyer details are trimmed");
        assert_eq!(order.total, 237_000);
        assert_eq!(order.payment.status, PaymentStatus::Pending);
        assert_eq!(recorder.last_order()?, Some(order.clone()));
        assert_eq!(recorder.orders()?, vec![order]);
        assert!(carts.items()?.is_empty());
        assert!(changes.has_changed()?, "cart observers are notified");

        Ok(())
    }

    #[tokio::test]
    async fn history_is_newest_first_with_increasing_ids() -> TestResult {
        let (_store, _carts, recorder) = recorder();

        let first = recorder.record(bank_draft()?)?;
        let second = recorder.record(bank_draft()?)?;
        let third = recorder.record(bank_draft()?)?;

        let ids: Vec<String> = recorder
            .orders()?
            .into_iter()
            .map(|order| order.order_id)
            .collect();

        assert_eq!(ids, vec![third.order_id, second.order_id, first.order_id]);

        let millis: Vec<i64> = ids
            .iter()
            .filter_map(|id| id.strip_prefix("ORD-")?.parse().ok())
            .collect();

        assert!(
            millis.windows(2).all(|pair| pair.first() > pair.get(1)),
            "ids must be strictly increasing: {ids:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn new_recorder_continues_after_stored_ids() -> TestResult {
        let (store, carts, recorder) = recorder();

        let first = recorder.record(bank_draft()?)?;
        let second = OrderRecorder::new(store, carts).record(bank_draft()?)?;

        assert_ne!(first.order_id, second.order_id);

        Ok(())
    }

    #[tokio::test]
    async fn invalid_buyer_has_no_side_effects() -> TestResult {
        let (store, carts, recorder) = recorder();

        let mut draft = bank_draft()?;

        for item in &draft.items {
            carts.add_item(item.clone())?;
        }

        draft.customer.email = "not-an-email".to_string();

        let result = recorder.record(draft);

        assert!(
            matches!(result, Err(OrderError::Validation(_))),
            "expected Validation, got {result:?}"
        );
        assert_eq!(store.get(ORDERS_KEY)?, None);
        assert_eq!(carts.items()?.len(), 1, "cart is kept");

        Ok(())
    }

    #[tokio::test]
    async fn email_with_surrounding_spaces_is_rejected() -> TestResult {
        let (store, _carts, recorder) = recorder();

        let mut draft = bank_draft()?;

        draft.customer.email = " siti@example.co.id ".to_string();

        let result = recorder.record(draft);

        assert!(
            matches!(
                &result,
                Err(OrderError::Validation(error)) if error.fields() == [BuyerField::Email]
            ),
            "expected an email validation error, got {result:?}"
        );
        assert_eq!(store.get(ORDERS_KEY)?, None);

        Ok(())
    }

    #[tokio::test]
    async fn cart_clear_failure_still_returns_saved_order() -> TestResult {
        let mut store = MockKeyValueStore::new();
        let saved = Arc::new(MemoryStore::new());

        let reads = saved.clone();
        let writes = saved;

        store.expect_get().returning(move |key| reads.get(key));
        store.expect_set().returning(move |key, value| {
            if key == CART_KEY {
                Err(StoreError::Io(io::Error::other("disk full")))
            } else {
                writes.set(key, value)
            }
        });

        let store: Arc<dyn KeyValueStore> = Arc::new(store);
        let carts = CartStore::new(store.clone());
        let recorder = OrderRecorder::new(store, carts);

        let order = recorder.record(bank_draft()?)?;

        assert_eq!(recorder.orders()?, vec![order.clone()]);
        assert_eq!(recorder.last_order()?, Some(order));

        Ok(())
    }

    #[tokio::test]
    async fn e_wallet_without_provider_is_rejected() -> TestResult {
        let (_store, _carts, recorder) = recorder();

        let mut payment = PaymentResult::settled("gopay", 1);

        payment.provider = None;

        let result = recorder.record(draft(PaymentMethod::EWallet, payment)?);

        assert!(matches!(result, Err(OrderError::MissingProvider)));
        assert!(recorder.orders()?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn mirror_receives_recorded_order() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let carts = CartStore::new(store.clone());

        let mut mirror = MockOrderMirror::new();

        mirror
            .expect_mirror()
            .once()
            .withf(|order| order.payment.provider == "gopay")
            .returning(|_| Ok(()));

        let recorder = OrderRecorder::new(store, carts).with_mirror(Arc::new(mirror));

        recorder.record(draft(
            PaymentMethod::EWallet,
            PaymentResult::settled("gopay", 1),
        )?)?;

        recorder.flush().await;

        Ok(())
    }

    #[tokio::test]
    async fn mirror_failure_keeps_local_order() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let carts = CartStore::new(store.clone());

        let mut mirror = MockOrderMirror::new();

        mirror
            .expect_mirror()
            .once()
            .returning(|_| Err(MirrorError::Status(StatusCode::INTERNAL_SERVER_ERROR)));

        let recorder = OrderRecorder::new(store, carts).with_mirror(Arc::new(mirror));

        let order = recorder.record(bank_draft()?)?;

        recorder.flush().await;

        assert_eq!(recorder.last_order()?, Some(order));

        Ok(())
    }
}
