//! The fragment router.
//!
//! Routes are tried in registration order and the first match wins. Each
//! navigation gets its own [`CancellationToken`]; starting a new navigation
//! cancels the previous one, and a handler that finishes after it was
//! superseded has its output discarded.

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::{HandlerResult, RouterError};
use crate::location::{HashChange, Location};
use crate::mount::Mount;
use crate::pattern::{Params, RoutePattern};
use crate::query::{normalize_target, parse_fragment, Query};
use crate::signal::Signal;

type Handler = Arc<dyn Fn(RouteContext) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Router behavior switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterOptions {
    /// Path dispatched when the fragment is empty.
    pub home_path: String,
    /// Scroll the mount to the top after each dispatch.
    pub scroll_top: bool,
    /// Render a loading placeholder before invoking a matched handler.
    pub show_loading: bool,
    /// Placeholder content; a default card is used when unset.
    pub loading_content: Option<String>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            home_path: "/dashboard".to_string(),
            scroll_top: true,
            show_loading: false,
            loading_content: None,
        }
    }
}

const DEFAULT_LOADING: &str = r#"<div class="card">Loading…</div>"#;

/// What a handler receives.
#[derive(Clone)]
pub struct RouteContext {
    /// Decoded path parameters.
    pub params: Params,
    /// Decoded query parameters.
    pub query: Query,
    /// Normalized path for matched routes; the original fragment for the
    /// not-found handler.
    pub path: String,
    /// Cancelled when a newer navigation starts.
    pub token: CancellationToken,
    location: Arc<dyn Location>,
}

impl RouteContext {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Send the user elsewhere, e.g. to the login page.
    pub fn redirect(&self, target: &str) {
        self.location.set_fragment(&normalize_target(target));
    }
}

impl std::fmt::Debug for RouteContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteContext")
            .field("params", &self.params)
            .field("query", &self.query)
            .field("path", &self.path)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

/// Which handler a navigation resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Route { pattern: String, path: String },
    NotFound { path: String },
}

/// How the handler run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerStatus {
    /// Returned content, which was mounted.
    Rendered,
    /// Returned no content.
    Completed,
    /// Returned an error, which was logged.
    Failed,
    /// A newer navigation started first; output discarded.
    Superseded,
}

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub resolved: Resolved,
    pub status: HandlerStatus,
}

/// Emitted after a navigation that was not superseded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChanged {
    /// Normalized path.
    pub path: String,
}

struct Route {
    pattern: RoutePattern,
    handler: Handler,
}

struct Inner {
    routes: RwLock<Vec<Route>>,
    not_found: RwLock<Option<Handler>>,
    options: RwLock<RouterOptions>,
    location: Arc<dyn Location>,
    mount: Arc<dyn Mount>,
    current: Mutex<Option<CancellationToken>>,
    route_changed: Signal<RouteChanged>,
}

/// Fragment router. Clones share state.
#[derive(Clone)]
pub struct Router {
    inner: Arc<Inner>,
}

impl Router {
    pub fn new(location: Arc<dyn Location>, mount: Arc<dyn Mount>) -> Self {
        Self {
            inner: Arc::new(Inner {
                routes: RwLock::new(Vec::new()),
                not_found: RwLock::new(None),
                options: RwLock::new(RouterOptions::default()),
                location,
                mount,
                current: Mutex::new(None),
                route_changed: Signal::new(),
            }),
        }
    }

    /// Append a route. A pattern already registered stays first in line,
    /// so the later registration never matches.
    pub fn add_route<F, Fut>(&self, pattern: &str, handler: F) -> Result<(), RouterError>
    where
        F: Fn(RouteContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let pattern = RoutePattern::compile(pattern)?;
        let handler: Handler = Arc::new(move |ctx| handler(ctx).boxed());
        self.inner.routes.write().push(Route { pattern, handler });
        Ok(())
    }

    /// Replace the not-found handler.
    pub fn set_not_found<F, Fut>(&self, handler: F)
    where
        F: Fn(RouteContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |ctx| handler(ctx).boxed());
        *self.inner.not_found.write() = Some(handler);
    }

    pub fn configure(&self, options: RouterOptions) {
        *self.inner.options.write() = options;
    }

    pub fn options(&self) -> RouterOptions {
        self.inner.options.read().clone()
    }

    /// Registered patterns in match order.
    pub fn patterns(&self) -> Vec<String> {
        self.inner
            .routes
            .read()
            .iter()
            .map(|r| r.pattern.source().to_string())
            .collect()
    }

    /// Signal fired after each navigation that was not superseded.
    pub fn route_changed(&self) -> &Signal<RouteChanged> {
        &self.inner.route_changed
    }

    pub fn location(&self) -> &Arc<dyn Location> {
        &self.inner.location
    }

    /// Navigate.
    ///
    /// A non-empty target is assigned to the location (with a leading `#`)
    /// and dispatched by whoever listens for hash changes; `None` is
    /// returned. An empty target re-dispatches the current fragment
    /// immediately.
    pub async fn navigate(&self, target: &str) -> Option<DispatchOutcome> {
        if target.is_empty() {
            Some(self.on_route().await)
        } else {
            self.inner.location.set_fragment(&normalize_target(target));
            None
        }
    }

    /// Dispatch the current fragment and wait for its handler.
    pub async fn on_route(&self) -> DispatchOutcome {
        self.begin(self.inner.location.fragment()).finish().await
    }

    /// Dispatch every hash change from `changes` until the channel closes.
    ///
    /// Navigations start in arrival order. Handlers run concurrently so a
    /// slow one can be superseded by the next change.
    pub async fn listen(&self, mut changes: mpsc::UnboundedReceiver<HashChange>) {
        let mut running = JoinSet::new();
        loop {
            tokio::select! {
                change = changes.recv() => match change {
                    Some(change) => {
                        tracing::debug!(fragment = %change.fragment, "hash change");
                        running.spawn(self.begin(change.fragment).finish());
                    }
                    None => break,
                },
                Some(_) = running.join_next(), if !running.is_empty() => {}
            }
        }
        while running.join_next().await.is_some() {}
    }

    /// Resolve `raw` (a fragment without `#`) and start its handler.
    ///
    /// Runs synchronously up to the point where the handler future exists,
    /// so navigations begin in the order they were requested.
    fn begin(&self, raw: String) -> PendingDispatch {
        let token = CancellationToken::new();
        if let Some(previous) = self.inner.current.lock().replace(token.clone()) {
            previous.cancel();
        }

        let options = self.options();
        let raw = if raw.is_empty() {
            options.home_path.clone()
        } else {
            raw
        };
        let parsed = parse_fragment(&raw);

        let matched = self.inner.routes.read().iter().find_map(|route| {
            route
                .pattern
                .match_path(&parsed.path)
                .map(|params| (route.pattern.source().to_string(), params, route.handler.clone()))
        });

        let (resolved, future) = match matched {
            Some((pattern, params, handler)) => {
                tracing::debug!(path = %parsed.path, %pattern, "route matched");
                if options.show_loading {
                    let loading = options.loading_content.as_deref().unwrap_or(DEFAULT_LOADING);
                    self.inner.mount.render(loading);
                }
                let ctx = RouteContext {
                    params,
                    query: parsed.query,
                    path: parsed.path.clone(),
                    token: token.clone(),
                    location: self.inner.location.clone(),
                };
                (
                    Resolved::Route {
                        pattern,
                        path: parsed.path.clone(),
                    },
                    handler(ctx),
                )
            }
            None => {
                tracing::debug!(path = %raw, "no route");
                let ctx = RouteContext {
                    params: Params::new(),
                    query: Query::new(),
                    path: raw.clone(),
                    token: token.clone(),
                    location: self.inner.location.clone(),
                };
                let not_found = self.inner.not_found.read().clone();
                let future = match not_found {
                    Some(handler) => handler(ctx),
                    None => {
                        let content = default_not_found(&raw);
                        async move { Ok(Some(content)) }.boxed()
                    }
                };
                (Resolved::NotFound { path: raw.clone() }, future)
            }
        };

        PendingDispatch {
            resolved,
            changed_path: parsed.path,
            future,
            token,
            scroll_top: options.scroll_top,
            mount: self.inner.mount.clone(),
            route_changed: self.inner.route_changed.clone(),
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("patterns", &self.patterns())
            .field("options", &self.options())
            .finish()
    }
}

/// A navigation whose handler has been invoked but not awaited.
struct PendingDispatch {
    resolved: Resolved,
    changed_path: String,
    future: BoxFuture<'static, HandlerResult>,
    token: CancellationToken,
    scroll_top: bool,
    mount: Arc<dyn Mount>,
    route_changed: Signal<RouteChanged>,
}

impl PendingDispatch {
    async fn finish(self) -> DispatchOutcome {
        let result = self.future.await;

        if self.token.is_cancelled() {
            tracing::debug!(path = %self.changed_path, "navigation superseded");
            return DispatchOutcome {
                resolved: self.resolved,
                status: HandlerStatus::Superseded,
            };
        }

        let status = match result {
            Ok(Some(content)) => {
                self.mount.render(&content);
                HandlerStatus::Rendered
            }
            Ok(None) => HandlerStatus::Completed,
            Err(e) => {
                tracing::warn!(path = %self.changed_path, error = %e, "route handler failed");
                HandlerStatus::Failed
            }
        };

        if self.scroll_top {
            self.mount.scroll_to_top();
        }
        self.route_changed.emit(&RouteChanged {
            path: self.changed_path,
        });

        DispatchOutcome {
            resolved: self.resolved,
            status,
        }
    }
}

fn default_not_found(raw: &str) -> String {
    format!(
        r#"<div class="card"><h3>Not Found</h3><p>No route for <code>{}</code></p></div>"#,
        escape_html(raw)
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
