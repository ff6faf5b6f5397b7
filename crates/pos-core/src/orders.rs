//! Open orders: checkout, browsing and loading back into the cart.

use async_trait::async_trait;
use parking_lot::RwLock;
use pos_auth::Session;
use pos_commerce::cart::LineItem;
use pos_commerce::order::{sort_orders_newest_first, Order};
use pos_commerce::{CompanyId, OrderId, UserId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cart_store::CartStore;
use crate::scope::CompanyScope;
use crate::CoreError;

/// Conditions for an open-order query. Unset fields don't constrain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFilter {
    pub company_id: Option<CompanyId>,
    pub uid: Option<UserId>,
    pub limit: usize,
}

impl OrderFilter {
    pub fn new(limit: usize) -> Self {
        Self {
            company_id: None,
            uid: None,
            limit,
        }
    }

    pub fn company(mut self, company: Option<CompanyId>) -> Self {
        self.company_id = company;
        self
    }

    pub fn uid(mut self, uid: UserId) -> Self {
        self.uid = Some(uid);
        self
    }

    pub fn matches(&self, order: &Order) -> bool {
        order.is_open()
            && self.company_id.as_ref().map_or(true, |c| &order.company_id == c)
            && self.uid.as_ref().map_or(true, |u| &order.uid == u)
    }
}

/// The `orders` collection. Query results come back in no particular
/// order.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Store a new order and return its assigned identifier.
    async fn insert(&self, order: Order) -> Result<OrderId, CoreError>;

    async fn query_open(&self, filter: &OrderFilter) -> Result<Vec<Order>, CoreError>;

    async fn get(&self, id: &OrderId) -> Result<Option<Order>, CoreError>;

    async fn delete(&self, id: &OrderId) -> Result<(), CoreError>;
}

/// In-process order collection.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: RwLock<Vec<Order>>,
    restricted: AtomicBool,
    read_only: AtomicBool,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, queries not limited to a single user are refused, the
    /// way access rules refuse a customer browsing a whole company.
    pub fn set_restricted(&self, restricted: bool) {
        self.restricted.store(restricted, Ordering::SeqCst);
    }

    /// While set, inserts and deletes fail.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Store an order as-is, keeping its identifier (or assigning one).
    pub fn seed(&self, mut order: Order) -> OrderId {
        if order.id.is_empty() {
            order.id = OrderId::generate();
        }
        let id = order.id.clone();
        self.orders.write().push(order);
        id
    }

    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }

    fn check_writable(&self) -> Result<(), CoreError> {
        if self.read_only.load(Ordering::SeqCst) {
            Err(CoreError::OrderStore("order store is read-only".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<OrderId, CoreError> {
        self.check_writable()?;
        Ok(self.seed(order))
    }

    async fn query_open(&self, filter: &OrderFilter) -> Result<Vec<Order>, CoreError> {
        if self.restricted.load(Ordering::SeqCst) && filter.uid.is_none() {
            return Err(CoreError::OrderStore("missing or insufficient permissions".to_string()));
        }
        Ok(self
            .orders
            .read()
            .iter()
            .filter(|o| filter.matches(o))
            .take(filter.limit)
            .cloned()
            .collect())
    }

    async fn get(&self, id: &OrderId) -> Result<Option<Order>, CoreError> {
        Ok(self.orders.read().iter().find(|o| &o.id == id).cloned())
    }

    async fn delete(&self, id: &OrderId) -> Result<(), CoreError> {
        self.check_writable()?;
        self.orders.write().retain(|o| &o.id != id);
        Ok(())
    }
}

/// Order operations on behalf of the signed-in user.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    cart: CartStore,
    scope: CompanyScope,
    limit: usize,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, cart: CartStore, scope: CompanyScope) -> Self {
        Self {
            store,
            cart,
            scope,
            limit: 200,
        }
    }

    /// Cap on orders fetched per query.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn store(&self) -> &Arc<dyn OrderStore> {
        &self.store
    }

    /// Turn the cart into an open order. The cart is cleared only once the
    /// order is stored.
    pub async fn checkout(&self, session: &Session) -> Result<Order, CoreError> {
        let cart = self.cart.read();
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let mut order = Order::from_cart(session.uid.clone(), session.company_id.clone(), &cart)?;
        order.id = self.store.insert(order.clone()).await?;
        self.cart.clear()?;

        tracing::info!(order = %order.id, total = order.total, "checked out");
        Ok(order)
    }

    /// Open orders visible to `session`, newest first.
    ///
    /// When the scoped query is refused, falls back to the user's own
    /// orders within the same company.
    pub async fn list_open(&self, session: &Session) -> Result<Vec<Order>, CoreError> {
        let company = self.scope.resolve(session)?;
        let filter = match &company {
            Some(company) => OrderFilter::new(self.limit).company(Some(company.clone())),
            None => OrderFilter::new(self.limit).uid(session.uid.clone()),
        };

        let mut orders = match self.store.query_open(&filter).await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::warn!(error = %e, "scoped order query failed, retrying own orders");
                let own = OrderFilter::new(self.limit)
                    .company(company)
                    .uid(session.uid.clone());
                self.store.query_open(&own).await?
            }
        };

        sort_orders_newest_first(&mut orders);
        Ok(orders)
    }

    /// Replace the cart with the order's items. Returns what the cart held
    /// before.
    pub async fn load_into_cart(&self, id: &OrderId) -> Result<Vec<LineItem>, CoreError> {
        let order = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))?;
        let previous = self.cart.replace_with(order.to_cart())?;
        Ok(previous.into_items())
    }

    pub async fn delete(&self, id: &OrderId) -> Result<(), CoreError> {
        self.store.delete(id).await
    }
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}
