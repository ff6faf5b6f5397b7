//! Wiring: stores, services and the router with the built-in routes.

use parking_lot::RwLock;
use pos_auth::{Accounts, MemoryDirectory, Registration, Session, UserDirectory};
use pos_cache::Cache;
use pos_commerce::cart::Cart;
use pos_commerce::order::Order;
use pos_commerce::Currency;
use pos_router::{
    DispatchOutcome, HashChange, Location, MemoryLocation, MemoryMount, Mount, RouteContext,
    RouteChanged, Router, RouterOptions,
};
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::cart_store::CartStore;
use crate::config::AppConfig;
use crate::drafts::DraftStore;
use crate::events::{CartChanged, SessionChanged};
use crate::nav::{dashboard_path, keeps_cart_sidebar, NavState};
use crate::orders::{MemoryOrderStore, OrderService, OrderStore};
use crate::scope::CompanyScope;
use crate::session_store::SessionStore;
use crate::CoreError;

/// Redirect hops followed by [`HeadlessApp::visit`] before giving up.
const MAX_REDIRECTS: usize = 5;

/// Header, sidebar and current path, kept current by store and router
/// notifications.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chrome {
    pub nav: NavState,
    pub path: String,
    pub cart_sidebar_open: bool,
}

/// The application shell.
#[derive(Clone)]
pub struct App {
    config: AppConfig,
    cache: Cache,
    session: SessionStore,
    cart: CartStore,
    drafts: DraftStore,
    scope: CompanyScope,
    accounts: Arc<Accounts>,
    orders: OrderService,
    router: Router,
    chrome: Arc<RwLock<Chrome>>,
}

impl App {
    /// Build the shell over the given storage and collaborators, and
    /// register the built-in routes.
    pub fn new(
        config: AppConfig,
        cache: Cache,
        location: Arc<dyn Location>,
        mount: Arc<dyn Mount>,
        directory: Arc<dyn UserDirectory>,
        order_store: Arc<dyn OrderStore>,
    ) -> Result<Self, CoreError> {
        let keys = &config.storage;
        let session = SessionStore::with_key(cache.clone(), &keys.session);
        let cart = CartStore::with_key(cache.clone(), keys.cart.clone());
        let drafts = DraftStore::with_key(cache.clone(), keys.drafts.clone(), cart.clone());
        let scope = CompanyScope::with_key(cache.clone(), keys.company_scope.clone());
        let orders = OrderService::new(order_store, cart.clone(), scope.clone())
            .with_limit(config.orders.open_limit);

        let router = Router::new(location, mount);
        router.configure(RouterOptions::from(&config.router));

        let chrome = Arc::new(RwLock::new(Chrome {
            nav: NavState::from_session(session.current().as_ref(), cart.count()),
            ..Chrome::default()
        }));

        let app = Self {
            config,
            cache,
            session,
            cart,
            drafts,
            scope,
            accounts: Arc::new(Accounts::new(directory)),
            orders,
            router,
            chrome,
        };
        app.watch();
        app.register_routes()?;
        tracing::debug!(name = %app.config.name, routes = app.router.patterns().len(), "app ready");
        Ok(app)
    }

    /// A shell with in-process collaborators over `cache`, for tools and
    /// tests. The location starts at `fragment`.
    pub fn headless(config: AppConfig, cache: Cache, fragment: &str) -> Result<HeadlessApp, CoreError> {
        let (location, changes) = MemoryLocation::with_listener();
        let location = Arc::new(location.starting_at(fragment));
        let mount = Arc::new(MemoryMount::new());
        let app = Self::new(
            config,
            cache,
            location,
            mount.clone(),
            Arc::new(MemoryDirectory::new()),
            Arc::new(MemoryOrderStore::new()),
        )?;
        Ok(HeadlessApp {
            app,
            mount,
            changes,
        })
    }

    /// A headless shell whose storage lives in memory.
    pub fn in_memory(config: AppConfig) -> Result<HeadlessApp, CoreError> {
        Self::headless(config, Cache::in_memory(), "")
    }

    /// Open storage per `config.data_dir` (in memory when unset).
    pub fn open_cache(config: &AppConfig) -> Result<Cache, CoreError> {
        Ok(match &config.data_dir {
            Some(dir) => Cache::open_dir(dir)?,
            None => Cache::in_memory(),
        })
    }

    fn watch(&self) {
        let chrome = self.chrome.clone();
        let cart = self.cart.clone();
        self.session.changed().subscribe(move |e: &SessionChanged| {
            chrome.write().nav = NavState::from_session(e.session.as_ref(), cart.count());
        });

        let chrome = self.chrome.clone();
        let session = self.session.clone();
        let cart = self.cart.clone();
        self.cart.changed().subscribe(move |_: &CartChanged| {
            chrome.write().nav = NavState::from_session(session.current().as_ref(), cart.count());
        });

        let chrome = self.chrome.clone();
        self.router.route_changed().subscribe(move |e: &RouteChanged| {
            let mut chrome = chrome.write();
            chrome.path = e.path.clone();
            chrome.cart_sidebar_open = keeps_cart_sidebar(&e.path);
        });
    }

    fn register_routes(&self) -> Result<(), CoreError> {
        let router = &self.router;

        let session = self.session.clone();
        router.add_route("/login", move |_ctx: RouteContext| {
            let current = session.current();
            async move {
                Ok(Some(match current {
                    Some(s) => format!("Signed in as {} ({})", s.display_name(), s.role.label()),
                    None => "Login".to_string(),
                }))
            }
        })?;

        let session = self.session.clone();
        router.add_route("/dashboard", move |ctx: RouteContext| {
            let current = session.current();
            async move {
                match current {
                    Some(s) => ctx.redirect(dashboard_path(Some(&s))),
                    None => ctx.redirect("/login"),
                }
                Ok(None)
            }
        })?;

        for role in pos_auth::Role::ALL {
            let path = dashboard_path_for(role);
            let session = self.session.clone();
            let cart = self.cart.clone();
            let currency = self.config.currency;
            router.add_route(path, move |ctx: RouteContext| {
                let current = session.current();
                let cart = cart.read();
                async move {
                    let Some(s) = current else {
                        ctx.redirect("/login");
                        return Ok(None);
                    };
                    let mut out = format!("{} dashboard\nWelcome, {}\n", role.label(), s.display_name());
                    let _ = write!(out, "Cart: {} item(s), {}", cart.count(), currency.format(cart.total()));
                    Ok(Some(out))
                }
            })?;
        }

        let cart = self.cart.clone();
        let currency = self.config.currency;
        router.add_route("/admin/pos", move |_ctx: RouteContext| {
            let cart = cart.read();
            async move { Ok(Some(render_cart(&cart, currency))) }
        })?;

        let orders = self.orders.clone();
        let session = self.session.clone();
        let currency = self.config.currency;
        router.add_route("/admin/orders", move |ctx: RouteContext| {
            let orders = orders.clone();
            let current = session.current();
            async move {
                let Some(s) = current else {
                    ctx.redirect("/login");
                    return Ok(None);
                };
                let listed = orders.list_open(&s).await;
                if ctx.is_cancelled() {
                    return Ok(None);
                }
                Ok(Some(match listed {
                    Ok(list) => render_orders(&list, currency),
                    Err(e) if e.needs_user_action() => e.to_string(),
                    Err(e) => {
                        tracing::warn!(error = %e, "open orders unavailable");
                        "No permission or no data".to_string()
                    }
                }))
            }
        })?;

        let drafts = self.drafts.clone();
        router.add_route("/admin/drafts", move |_ctx: RouteContext| {
            let list = drafts.list();
            async move { Ok(Some(render_drafts(&list))) }
        })?;

        router.add_route("/company/:id", |ctx: RouteContext| async move {
            let id = ctx.param("id").unwrap_or_default();
            let mut out = format!("Company {id}");
            if let Some(tab) = ctx.query_param("tab") {
                let _ = write!(out, "\nTab: {tab}");
            }
            Ok(Some(out))
        })?;

        router.add_route("/search", |ctx: RouteContext| async move {
            let q = ctx.query_param("q").unwrap_or_default();
            Ok(Some(format!("Search: {q}")))
        })?;

        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    pub fn scope(&self) -> &CompanyScope {
        &self.scope
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    pub fn orders(&self) -> &OrderService {
        &self.orders
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn currency(&self) -> Currency {
        self.config.currency
    }

    /// Current header and sidebar state.
    pub fn chrome(&self) -> Chrome {
        self.chrome.read().clone()
    }

    /// Sign in and persist the session.
    pub async fn login(&self, identity: &str, password: &str) -> Result<Session, CoreError> {
        let session = self.accounts.login(identity, password).await?;
        self.session.save(session.clone())?;
        Ok(session)
    }

    /// Create a customer account and sign in as it.
    pub async fn register(&self, registration: Registration) -> Result<Session, CoreError> {
        let session = self.accounts.register(registration).await?;
        self.session.save(session.clone())?;
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), CoreError> {
        self.session.clear()
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("name", &self.config.name)
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

/// An [`App`] over an in-process location and mount.
pub struct HeadlessApp {
    pub app: App,
    pub mount: Arc<MemoryMount>,
    changes: mpsc::UnboundedReceiver<HashChange>,
}

impl HeadlessApp {
    /// Navigate to `target` and dispatch it, following redirects issued by
    /// handlers. Returns the last dispatch and the mounted content.
    pub async fn visit(&mut self, target: &str) -> (DispatchOutcome, String) {
        let router = self.app.router.clone();
        let mut outcome = match router.navigate(target).await {
            Some(outcome) => outcome,
            None => {
                self.drain();
                router.on_route().await
            }
        };
        for _ in 0..MAX_REDIRECTS {
            if !self.drain() {
                break;
            }
            outcome = router.on_route().await;
        }
        (outcome, self.mount.content())
    }

    /// Discard queued hash changes; true if there were any.
    fn drain(&mut self) -> bool {
        let mut any = false;
        while self.changes.try_recv().is_ok() {
            any = true;
        }
        any
    }
}

impl std::ops::Deref for HeadlessApp {
    type Target = App;

    fn deref(&self) -> &App {
        &self.app
    }
}

fn dashboard_path_for(role: pos_auth::Role) -> &'static str {
    let session = Session {
        role,
        ..Session::default()
    };
    dashboard_path(Some(&session))
}

/// Plain-text cart listing.
pub fn render_cart(cart: &Cart, currency: Currency) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }
    let mut out = String::new();
    for item in cart.items() {
        let _ = writeln!(
            out,
            "{}  x{}  {}",
            item.display_name(),
            item.qty,
            currency.format(item.subtotal())
        );
    }
    let _ = write!(out, "Total: {}", currency.format(cart.total()));
    out
}

fn render_orders(orders: &[Order], currency: Currency) -> String {
    if orders.is_empty() {
        return "No open orders".to_string();
    }
    orders
        .iter()
        .map(|o| format!("{}  {} item(s)  {}", o.id, o.item_count(), currency.format(o.total)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_drafts(drafts: &[pos_commerce::draft::DraftOrder]) -> String {
    if drafts.is_empty() {
        return "No drafts".to_string();
    }
    drafts
        .iter()
        .map(|d| format!("{}  {} item(s)", d.short_id(), d.item_count()))
        .collect::<Vec<_>>()
        .join("\n")
}
