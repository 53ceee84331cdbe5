use crate::models::{Order, OrderError, OrderSnapshot};
use barista_catalog::{Beverage, PricingStrategy};
use barista_shared::{OrderStatus, OrderStatusEvent};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use uuid::Uuid;

/// Simulated per-stage processing delays
#[derive(Debug, Clone, Copy)]
pub struct StageDelays {
    /// Pending -> Processing
    pub accept: Duration,
    /// Processing -> Ready
    pub prepare: Duration,
    /// Ready -> Completed
    pub pickup: Duration,
}

impl Default for StageDelays {
    fn default() -> Self {
        Self {
            accept: Duration::from_millis(500),
            prepare: Duration::from_secs(3),
            pickup: Duration::from_secs(1),
        }
    }
}

/// All live orders plus the creation sequence for stable listing
#[derive(Default)]
struct OrderBook {
    by_id: HashMap<Uuid, Order>,
    sequence: Vec<Uuid>,
}

struct Inner {
    orders: RwLock<OrderBook>,
    tasks: Mutex<HashMap<Uuid, JoinHandle<()>>>,
    events: broadcast::Sender<OrderStatusEvent>,
    delays: StageDelays,
}

/// Drives accepted orders through their lifecycle, one tokio task per order.
///
/// The order map is the only shared mutable structure; every mutation goes
/// through its write lock and external readers only ever receive snapshots.
#[derive(Clone)]
pub struct OrderService {
    inner: Arc<Inner>,
}

impl OrderService {
    pub fn new(delays: StageDelays) -> Self {
        let (events, _) = broadcast::channel(100);
        Self {
            inner: Arc::new(Inner {
                orders: RwLock::new(OrderBook::default()),
                tasks: Mutex::new(HashMap::new()),
                events,
                delays,
            }),
        }
    }

    /// Validate, register and schedule a new order.
    ///
    /// Returns as soon as the order is Pending; advancement runs on its own
    /// task and never blocks other orders.
    pub async fn submit(
        &self,
        beverage: Beverage,
        quantity: u32,
        strategy: PricingStrategy,
    ) -> Result<Uuid, OrderError> {
        self.submit_with_delays(beverage, quantity, strategy, self.inner.delays)
            .await
    }

    /// Submit with order-specific stage delays (longer drinks take longer)
    pub async fn submit_with_delays(
        &self,
        beverage: Beverage,
        quantity: u32,
        strategy: PricingStrategy,
        delays: StageDelays,
    ) -> Result<Uuid, OrderError> {
        let order = Order::create(Arc::new(beverage), quantity, strategy)?;
        let id = order.id();
        let beverage_name = order.beverage().name.clone();

        {
            let mut book = self.inner.orders.write().await;
            book.by_id.insert(id, order);
            book.sequence.push(id);
        }
        tracing::info!(order_id = %id, beverage = %beverage_name, quantity, "order submitted");
        let _ = self
            .inner
            .events
            .send(OrderStatusEvent::new(id, beverage_name, OrderStatus::Pending));

        // Hold the task lock across spawn + insert so the task's own cleanup
        // cannot observe the map without its handle present.
        let mut tasks = self.inner.tasks.lock().await;
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(drive_order(inner, id, delays));
        tasks.insert(id, handle);

        Ok(id)
    }

    /// Cancel an order still in Pending/Processing
    pub async fn cancel(&self, id: Uuid) -> Result<(), OrderError> {
        let mut book = self.inner.orders.write().await;
        let order = book
            .by_id
            .get_mut(&id)
            .ok_or_else(|| OrderError::NotFound(id.to_string()))?;

        order.cancel()?;
        let beverage_name = order.beverage().name.clone();
        tracing::info!(order_id = %id, "order cancelled");
        let _ = self.inner.events.send(OrderStatusEvent::new(
            id,
            beverage_name,
            OrderStatus::Cancelled,
        ));

        // Abort while still holding the write lock so the advancement task
        // cannot slip in another transition first.
        if let Some(handle) = self.inner.tasks.lock().await.remove(&id) {
            handle.abort();
        }
        Ok(())
    }

    pub async fn get_status(&self, id: Uuid) -> Result<OrderStatus, OrderError> {
        let book = self.inner.orders.read().await;
        book.by_id
            .get(&id)
            .map(|order| order.status())
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    pub async fn get_order(&self, id: Uuid) -> Result<OrderSnapshot, OrderError> {
        let book = self.inner.orders.read().await;
        book.by_id
            .get(&id)
            .map(|order| order.snapshot())
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    /// Snapshots of all orders in creation order
    pub async fn list_orders(&self) -> Vec<OrderSnapshot> {
        let book = self.inner.orders.read().await;
        book.sequence
            .iter()
            .filter_map(|id| book.by_id.get(id))
            .map(|order| order.snapshot())
            .collect()
    }

    pub async fn orders_by_status(&self, status: OrderStatus) -> Vec<OrderSnapshot> {
        self.list_orders()
            .await
            .into_iter()
            .filter(|snapshot| snapshot.status == status)
            .collect()
    }

    /// Number of orders still being driven
    pub async fn active_count(&self) -> usize {
        self.inner.tasks.lock().await.len()
    }

    /// Join all in-flight advancement tasks (demo/test helper)
    pub async fn wait_for_all(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut tasks = self.inner.tasks.lock().await;
            tasks.drain().map(|(_, handle)| handle).collect()
        };
        for handle in handles {
            // Aborted (cancelled) tasks surface a JoinError here; expected.
            let _ = handle.await;
        }
    }

    /// Drop terminal orders, returning how many were removed
    pub async fn clear_completed(&self) -> usize {
        let mut book = self.inner.orders.write().await;
        let before = book.by_id.len();
        book.by_id.retain(|_, order| !order.status().is_terminal());
        let retained: Vec<Uuid> = book
            .sequence
            .iter()
            .copied()
            .filter(|id| book.by_id.contains_key(id))
            .collect();
        book.sequence = retained;
        before - book.by_id.len()
    }

    /// Status-change feed for the GUI boundary
    pub fn subscribe(&self) -> broadcast::Receiver<OrderStatusEvent> {
        self.inner.events.subscribe()
    }
}

impl Default for OrderService {
    fn default() -> Self {
        Self::new(StageDelays::default())
    }
}

async fn drive_order(inner: Arc<Inner>, id: Uuid, delays: StageDelays) {
    sleep(delays.accept).await;
    if advance_stage(&inner, id, OrderStatus::Pending).await {
        sleep(delays.prepare).await;
        if advance_stage(&inner, id, OrderStatus::Processing).await {
            sleep(delays.pickup).await;
            advance_stage(&inner, id, OrderStatus::Ready).await;
        }
    }
    inner.tasks.lock().await.remove(&id);
}

/// Advance one stage if the order still holds the expected status.
///
/// A mismatch means the order was cancelled (or already moved) while this
/// task slept; the task then stops driving it.
async fn advance_stage(inner: &Inner, id: Uuid, expected: OrderStatus) -> bool {
    let mut book = inner.orders.write().await;
    let order = match book.by_id.get_mut(&id) {
        Some(order) => order,
        None => return false,
    };
    if order.status() != expected {
        return false;
    }

    match order.advance() {
        Ok(next) => {
            tracing::info!(order_id = %id, status = %next, "order advanced");
            let _ = inner
                .events
                .send(OrderStatusEvent::new(id, order.beverage().name.clone(), next));
            next != OrderStatus::Completed
        }
        Err(err) => {
            tracing::error!(order_id = %id, error = %err, "advance failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barista_catalog::{BeverageKind, BeverageRegistry};
    use rust_decimal_macros::dec;
    use tokio::time::Instant;

    fn beverage(kind: BeverageKind) -> Beverage {
        BeverageRegistry::standard().create_kind(kind).unwrap()
    }

    fn fast_delays() -> StageDelays {
        StageDelays {
            accept: Duration::from_millis(100),
            prepare: Duration::from_millis(200),
            pickup: Duration::from_millis(100),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_reaches_completed() {
        let service = OrderService::new(fast_delays());
        let id = service
            .submit(beverage(BeverageKind::Coffee), 2, PricingStrategy::standard())
            .await
            .unwrap();

        assert_eq!(service.get_status(id).await.unwrap(), OrderStatus::Pending);
        service.wait_for_all().await;

        let snapshot = service.get_order(id).await.unwrap();
        assert_eq!(snapshot.status, OrderStatus::Completed);
        assert_eq!(snapshot.total_price, dec!(5.00));
        assert!(snapshot.completed_at.is_some());
        assert_eq!(service.active_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_parallel_orders_are_not_serialized() {
        let service = OrderService::new(fast_delays());
        let start = Instant::now();

        for _ in 0..5 {
            service
                .submit(beverage(BeverageKind::Tea), 1, PricingStrategy::standard())
                .await
                .unwrap();
        }
        service.wait_for_all().await;

        // One order takes 400ms of simulated time; five concurrent orders
        // must finish in about that, not 2s.
        let elapsed = start.elapsed();
        assert!(
            elapsed < Duration::from_millis(450),
            "expected concurrent completion, took {:?}",
            elapsed
        );

        for snapshot in service.list_orders().await {
            assert_eq!(snapshot.status, OrderStatus::Completed);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending_order() {
        let slow = StageDelays {
            accept: Duration::from_secs(60),
            prepare: Duration::from_secs(60),
            pickup: Duration::from_secs(60),
        };
        let service = OrderService::new(slow);
        let id = service
            .submit(beverage(BeverageKind::Beer), 1, PricingStrategy::standard())
            .await
            .unwrap();

        service.cancel(id).await.unwrap();
        assert_eq!(
            service.get_status(id).await.unwrap(),
            OrderStatus::Cancelled
        );

        // Cancelled orders never advance further
        service.wait_for_all().await;
        assert_eq!(
            service.get_status(id).await.unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_completed_order_fails() {
        let service = OrderService::new(fast_delays());
        let id = service
            .submit(beverage(BeverageKind::Water), 1, PricingStrategy::standard())
            .await
            .unwrap();
        service.wait_for_all().await;

        assert!(matches!(
            service.cancel(id).await,
            Err(OrderError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_order_id() {
        let service = OrderService::default();
        let missing = Uuid::new_v4();
        assert!(matches!(
            service.get_status(missing).await,
            Err(OrderError::NotFound(_))
        ));
        assert!(matches!(
            service.get_order(missing).await,
            Err(OrderError::NotFound(_))
        ));
        assert!(matches!(
            service.cancel(missing).await,
            Err(OrderError::NotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_orders_keeps_creation_order() {
        let service = OrderService::new(fast_delays());
        let slow = StageDelays {
            accept: Duration::from_millis(100),
            prepare: Duration::from_secs(2),
            pickup: Duration::from_millis(100),
        };

        // First order is slow, second is fast; completion order inverts
        let first = service
            .submit_with_delays(
                beverage(BeverageKind::Cappuccino),
                1,
                PricingStrategy::standard(),
                slow,
            )
            .await
            .unwrap();
        let second = service
            .submit(beverage(BeverageKind::Juice), 1, PricingStrategy::standard())
            .await
            .unwrap();

        service.wait_for_all().await;

        let ids: Vec<Uuid> = service
            .list_orders()
            .await
            .iter()
            .map(|snapshot| snapshot.id)
            .collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_events_in_order() {
        let service = OrderService::new(fast_delays());
        let mut events = service.subscribe();

        let id = service
            .submit(beverage(BeverageKind::Latte), 1, PricingStrategy::standard())
            .await
            .unwrap();
        service.wait_for_all().await;

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            assert_eq!(event.order_id, id);
            seen.push(event.status);
        }
        assert_eq!(
            seen,
            vec![
                OrderStatus::Pending,
                OrderStatus::Processing,
                OrderStatus::Ready,
                OrderStatus::Completed,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_completed() {
        let service = OrderService::new(fast_delays());
        service
            .submit(beverage(BeverageKind::Coffee), 1, PricingStrategy::standard())
            .await
            .unwrap();
        let open = service
            .submit_with_delays(
                beverage(BeverageKind::Tea),
                1,
                PricingStrategy::standard(),
                StageDelays {
                    accept: Duration::from_secs(120),
                    prepare: Duration::from_secs(120),
                    pickup: Duration::from_secs(120),
                },
            )
            .await
            .unwrap();

        // Let the fast order finish while the slow one is still pending
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(service.clear_completed().await, 1);
        let remaining = service.list_orders().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, open);
        service.cancel(open).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_validation_is_synchronous() {
        let service = OrderService::new(fast_delays());
        let result = service
            .submit(beverage(BeverageKind::Coffee), 0, PricingStrategy::standard())
            .await;
        assert!(matches!(result, Err(OrderError::Validation(_))));
        assert!(service.list_orders().await.is_empty());
        assert_eq!(service.active_count().await, 0);
    }
}
