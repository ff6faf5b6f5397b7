//! End-to-end behavior across the stores, accounts and router.

use parking_lot::Mutex;
use pos_auth::{
    Accounts, AuthError, MemoryDirectory, NewUser, Registration, Role, Session, UserDirectory,
};
use pos_cache::{keys, Cache};
use pos_commerce::cart::{Cart, LineItem, ProductRef};
use pos_commerce::{CompanyId, ProductId, UserId};
use pos_core::prelude::*;
use pos_router::{MemoryLocation, MemoryMount, RouteContext, Router};
use serde_json::json;
use std::sync::Arc;

fn alice() -> Registration {
    Registration {
        username: "alice".into(),
        email: "alice@example.com".into(),
        password: "wonderland".into(),
        first_name: "Alice".into(),
        last_name: "Liddell".into(),
        company_id: None,
    }
}

fn actor(role: Role) -> Session {
    Session {
        uid: UserId::new(format!("actor-{}", role.as_str())),
        username: role.as_str().to_string(),
        email: format!("{}@example.com", role.as_str()),
        role,
        first_name: "Act".into(),
        last_name: "Or".into(),
        company_id: Some(CompanyId::new("c1")),
    }
}

fn router_at(fragment: &str) -> (Router, Arc<MemoryMount>) {
    let location = Arc::new(MemoryLocation::new().starting_at(fragment));
    let mount = Arc::new(MemoryMount::new());
    (Router::new(location, mount.clone()), mount)
}

#[tokio::test]
async fn test_duplicate_username_registration() {
    let directory = Arc::new(MemoryDirectory::new());
    let accounts = Accounts::new(directory.clone());

    let session = accounts.register(alice()).await.unwrap();
    assert_eq!(session.role, Role::Customer);
    assert_eq!(session.username, "alice");

    let again = Registration {
        email: "other@example.com".into(),
        ..alice()
    };
    let err = accounts.register(again).await.unwrap_err();
    assert!(matches!(err, AuthError::UsernameTaken));
    assert_eq!(err.to_string(), "Username already taken");
    assert_eq!(directory.len(), 1);
}

#[test]
fn test_cart_total_and_count() {
    let cart = CartStore::new(Cache::in_memory());
    cart.add_item(&ProductRef::new("p1").with_price(100.0), 2.0).unwrap();
    cart.add_item(&ProductRef::new("p2").with_price(50.0), 1.0).unwrap();

    assert_eq!(cart.total(), 250.0);
    assert_eq!(cart.count(), 3.0);
}

#[test]
fn test_cart_merge_same_product() {
    let cart = CartStore::new(Cache::in_memory());
    cart.add_item(&ProductRef::new("p1"), 2.0).unwrap();
    cart.add_item(&ProductRef::new("p1"), 3.0).unwrap();

    let read = cart.read();
    assert_eq!(read.len(), 1);
    assert_eq!(read.items()[0].qty, 5.0);
    // Defaults when the reference carries no details.
    assert_eq!(read.items()[0].display_name(), "p1");
    assert_eq!(read.items()[0].price, 0.0);
}

#[test]
fn test_cart_zero_quantity_removal() {
    let cart = CartStore::new(Cache::in_memory());
    cart.add_item(&ProductRef::new("p1").with_price(10.0), 2.0).unwrap();
    cart.add_item(&ProductRef::new("p2").with_price(5.0), 4.0).unwrap();

    cart.set_quantity(&ProductId::new("p1"), 0.0).unwrap();

    let read = cart.read();
    assert!(read.get(&ProductId::new("p1")).is_none());
    assert_eq!(cart.count(), 4.0);
}

#[test]
fn test_cart_persistence_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let items = Cart::from_items([
        LineItem::new("p1", "Coffee", 100.0, 2.0),
        LineItem::new("p2", "Bread", 50.0, 1.0),
    ]);

    CartStore::new(Cache::open_dir(dir.path()).unwrap())
        .write(&items)
        .unwrap();

    let reopened = CartStore::new(Cache::open_dir(dir.path()).unwrap());
    assert_eq!(reopened.read(), items);

    // The stored form is the bare item list.
    let raw: serde_json::Value = Cache::open_dir(dir.path())
        .unwrap()
        .get(keys::CART)
        .unwrap()
        .unwrap();
    assert_eq!(raw[0]["id"], "p1");
    assert_eq!(raw[1]["qty"], 1.0);
}

#[test]
fn test_draft_replace_is_destructive() {
    let cache = Cache::in_memory();
    let cart = CartStore::new(cache.clone());
    cart.add_item(&ProductRef::new("old-1"), 1.0).unwrap();
    cart.add_item(&ProductRef::new("old-2"), 1.0).unwrap();

    let draft_items = vec![
        json!({"id": "d1", "name": "Tea", "price": 40, "qty": 1}),
        json!({"productId": "d2", "title": "Cake", "price": "120.5", "qty": "2"}),
    ];
    let previous = cart.replace_from_items(&draft_items).unwrap();

    assert_eq!(previous.len(), 2);
    let ids: Vec<_> = cart.read().items().iter().map(|i| i.id.as_str().to_string()).collect();
    assert_eq!(ids, vec!["d1", "d2"]);
    assert_eq!(cart.total(), 40.0 + 241.0);
}

#[tokio::test]
async fn test_role_creation_allow_list() {
    use Role::*;
    let allowed: [(Role, &[Role]); 7] = [
        (SuperAdmin, &[Customer, Staff, Supervisor, Manager, President, Owner]),
        (Owner, &[Customer, Staff, Supervisor, Manager, President]),
        (President, &[Customer, Staff, Supervisor, Manager]),
        (Manager, &[Customer, Staff, Supervisor]),
        (Supervisor, &[Customer, Staff]),
        (Staff, &[Customer]),
        (Customer, &[Customer]),
    ];

    for (actor_role, creatable) in allowed {
        for target in Role::ALL {
            let directory = Arc::new(MemoryDirectory::new());
            let accounts = Accounts::new(directory.clone());
            let new_user = NewUser {
                username: format!("new-{}", target.as_str()),
                email: format!("new-{}@example.com", target.as_str()),
                password: "pw".into(),
                role: target,
                ..NewUser::default()
            };

            let result = accounts.create_user(&actor(actor_role), new_user).await;
            if creatable.contains(&target) {
                let id = result.unwrap();
                let stored = directory.get(&id).await.unwrap().unwrap();
                assert_eq!(stored.role, target);
                assert_eq!(stored.company_id, CompanyId::new("c1"));
            } else {
                let err = result.unwrap_err();
                assert!(
                    matches!(err, AuthError::CreateNotAllowed(r) if r == target),
                    "{actor_role} creating {target}: {err}"
                );
                assert!(directory.is_empty(), "{actor_role} wrote a {target}");
            }
        }
    }
}

#[tokio::test]
async fn test_route_params_and_first_match() {
    let (router, _) = router_at("#/company/acme-123");
    let hits = Arc::new(Mutex::new(Vec::new()));

    let h = hits.clone();
    router
        .add_route("/company/:id", move |ctx: RouteContext| {
            h.lock().push(format!("param:{}", ctx.param("id").unwrap_or_default()));
            async { Ok(None) }
        })
        .unwrap();
    let h = hits.clone();
    router
        .add_route("/company/acme-123", move |_ctx: RouteContext| {
            h.lock().push("literal".to_string());
            async { Ok(None) }
        })
        .unwrap();

    router.on_route().await;
    assert_eq!(*hits.lock(), vec!["param:acme-123"]);
}

#[tokio::test]
async fn test_query_decoding() {
    let (router, mount) = router_at("#/search?q=shoes%20red");
    router
        .add_route("/search", |ctx: RouteContext| async move {
            Ok(Some(ctx.query_param("q").unwrap_or_default().to_string()))
        })
        .unwrap();

    router.on_route().await;
    assert_eq!(mount.content(), "shoes red");
}

#[tokio::test]
async fn test_trailing_slash_same_handler() {
    for fragment in ["#/marketplace", "#/marketplace/"] {
        let (router, mount) = router_at(fragment);
        router
            .add_route("/marketplace", |ctx: RouteContext| async move {
                Ok(Some(format!("market {}", ctx.path)))
            })
            .unwrap();

        router.on_route().await;
        assert_eq!(mount.content(), "market /marketplace");
    }
}

#[tokio::test]
async fn test_checkout_then_browse_open_orders() {
    let mut headless = App::in_memory(AppConfig::default()).unwrap();
    headless.register(alice()).await.unwrap();
    let session = headless.session().require().unwrap();

    headless
        .cart()
        .add_item(&ProductRef::new("p1").with_name("Coffee").with_price(100.0), 2.0)
        .unwrap();
    let order = headless.orders().checkout(&session).await.unwrap();
    assert_eq!(headless.cart().count(), 0.0);

    let open = headless.orders().list_open(&session).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, order.id);

    let (_, content) = headless.visit("/admin/orders").await;
    assert!(content.contains(order.id.as_str()));
    assert!(content.contains("₱200.00"));
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::default().with_data_dir(dir.path());

    {
        let cache = App::open_cache(&config).unwrap();
        let headless = App::headless(config.clone(), cache, "").unwrap();
        headless.register(alice()).await.unwrap();
        headless
            .cart()
            .add_item(&ProductRef::new("p1").with_price(1.0), 3.0)
            .unwrap();
    }

    let cache = App::open_cache(&config).unwrap();
    let headless = App::headless(config, cache, "").unwrap();
    let chrome = headless.chrome();
    assert!(chrome.nav.signed_in);
    assert_eq!(chrome.nav.cart_badge.as_deref(), Some("3"));
}
