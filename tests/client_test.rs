//! Behaviour of the cart client against a scripted transport and an
//! in-memory page.

use async_trait::async_trait;
use futures_util::poll;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;

use storefront_cart_client::cart::models::UpdateItemResponse;
use storefront_cart_client::cart::{Action, CartAction, PageContext, SessionIdentity, UpdateCartControl};
use storefront_cart_client::client::{
    CartBinding, CartTransport, CartUpdateClient, ClickOutcome, MemoryPage, Notice,
    PageCredentials, GUEST_CART_MESSAGE,
};
use storefront_cart_client::config::ClientConfig;
use storefront_cart_client::{CartError, Result};

/// One request as the transport saw it
#[derive(Debug, Clone, PartialEq)]
struct Sent {
    cart_action: CartAction,
    cookies: String,
    csrf_token: Option<String>,
}

/// Replies with a fixed count, or fails with a status, and records requests
struct FixedTransport {
    reply: std::result::Result<u32, u16>,
    sent: Mutex<Vec<Sent>>,
}

impl FixedTransport {
    fn replying(cart_items: u32) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(cart_items),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl CartTransport for FixedTransport {
    async fn update_item(
        &self,
        cart_action: &CartAction,
        credentials: PageCredentials<'_>,
    ) -> Result<UpdateItemResponse> {
        self.sent.lock().push(Sent {
            cart_action: cart_action.clone(),
            cookies: credentials.cookies.to_string(),
            csrf_token: credentials.csrf_token.map(str::to_string),
        });
        match self.reply {
            Ok(cart_items) => Ok(UpdateItemResponse { cart_items }),
            Err(status) => Err(CartError::Status(status)),
        }
    }
}

/// Holds each response until the test releases it, keyed by product id
struct GatedTransport {
    gates: Mutex<HashMap<String, oneshot::Receiver<u32>>>,
}

#[async_trait]
impl CartTransport for GatedTransport {
    async fn update_item(
        &self,
        cart_action: &CartAction,
        _credentials: PageCredentials<'_>,
    ) -> Result<UpdateItemResponse> {
        let gate = self
            .gates
            .lock()
            .remove(&cart_action.product_id)
            .expect("no gate for product");
        let cart_items = gate.await.expect("gate dropped");
        Ok(UpdateItemResponse { cart_items })
    }
}

fn authenticated(initial_cart_count: u32) -> PageContext {
    PageContext {
        user: SessionIdentity::Authenticated("alice".into()),
        initial_cart_count,
    }
}

fn setup(
    transport: Arc<dyn CartTransport>,
    page: Arc<MemoryPage>,
    context: PageContext,
) -> CartBinding {
    let client = CartUpdateClient::new(ClientConfig::default(), transport, page);
    CartBinding::initialize(Arc::new(client), context)
}

async fn finish(outcome: ClickOutcome) -> Result<storefront_cart_client::client::CartUpdate> {
    match outcome {
        ClickOutcome::Dispatched(handle) => handle.await.expect("update task panicked"),
        other => panic!("expected a dispatched request, got {other:?}"),
    }
}

#[tokio::test]
async fn test_initial_count_shown_before_any_click() {
    let page = Arc::new(MemoryPage::new("/", "csrftoken=t"));
    let transport = FixedTransport::replying(0);
    let _binding = setup(transport.clone(), page.clone(), authenticated(3));

    assert_eq!(page.cart_count().as_deref(), Some("3"));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_anonymous_click_alerts_and_sends_nothing() {
    let page = Arc::new(MemoryPage::new("/", "csrftoken=t"));
    let transport = FixedTransport::replying(1);
    let binding = setup(
        transport.clone(),
        page.clone(),
        PageContext {
            user: SessionIdentity::from_marker("AnonymousUser"),
            initial_cart_count: 0,
        },
    );

    for _ in 0..3 {
        let outcome = binding.click(&UpdateCartControl::new("42", "add"));
        assert!(matches!(outcome, ClickOutcome::Blocked));
    }

    assert!(transport.sent().is_empty());
    let snapshot = page.snapshot();
    assert_eq!(snapshot.alerts, vec![GUEST_CART_MESSAGE.to_string(); 3]);
    assert_eq!(snapshot.cart_count.as_deref(), Some("0"));
}

#[tokio::test]
async fn test_click_sends_one_request_and_updates_counter() {
    let page = Arc::new(MemoryPage::new("/product/42/", "sessionid=s; csrftoken=abc%3D%3D"));
    let transport = FixedTransport::replying(7);
    let binding = setup(transport.clone(), page.clone(), authenticated(6));

    let update = finish(binding.click(&UpdateCartControl::new("42", "add")))
        .await
        .unwrap();

    assert_eq!(
        transport.sent(),
        vec![Sent {
            cart_action: CartAction::new("42", Action::Add),
            cookies: "sessionid=s; csrftoken=abc%3D%3D".into(),
            csrf_token: Some("abc==".into()),
        }]
    );
    assert_eq!(page.cart_count().as_deref(), Some("7"));
    assert!(update.applied);
    assert!(!update.reloaded);
    assert_eq!(page.snapshot().reloads, 0);
    assert_eq!(binding.client().confirmed_count(), 7);
}

#[tokio::test]
async fn test_cart_page_reloads_once_after_counter_update() {
    let page = Arc::new(MemoryPage::new("/cart/", "csrftoken=t"));
    let transport = FixedTransport::replying(2);
    let binding = setup(transport, page.clone(), authenticated(3));

    let update = finish(binding.click(&UpdateCartControl::new("5", "remove")))
        .await
        .unwrap();

    assert!(update.reloaded);
    let snapshot = page.snapshot();
    assert_eq!(snapshot.reloads, 1);
    assert_eq!(snapshot.count_at_reload, vec![Some("2".to_string())]);
}

#[tokio::test]
async fn test_missing_csrf_cookie_sends_without_token() {
    let page = Arc::new(MemoryPage::new("/", "sessionid=s"));
    let transport = FixedTransport::replying(1);
    let binding = setup(transport.clone(), page, authenticated(0));

    finish(binding.click(&UpdateCartControl::new("1", "add")))
        .await
        .unwrap();

    assert_eq!(transport.sent()[0].csrf_token, None);
}

#[tokio::test]
async fn test_token_read_at_click_time() {
    let page = Arc::new(MemoryPage::new("/", ""));
    let transport = FixedTransport::replying(1);
    let binding = setup(transport.clone(), page.clone(), authenticated(0));

    page.set_cookies("csrftoken=late");
    finish(binding.click(&UpdateCartControl::new("1", "add")))
        .await
        .unwrap();

    let sent = transport.sent();
    assert_eq!(sent[0].csrf_token.as_deref(), Some("late"));
    assert_eq!(sent[0].cookies, "csrftoken=late");
}

#[tokio::test]
async fn test_malformed_control_is_rejected_without_request() {
    let page = Arc::new(MemoryPage::new("/", "csrftoken=t"));
    let transport = FixedTransport::replying(1);
    let binding = setup(transport.clone(), page, authenticated(0));

    let outcome = binding.click(&UpdateCartControl::new("1", "buy"));
    assert!(matches!(
        outcome,
        ClickOutcome::Rejected(CartError::UnknownAction(_))
    ));

    let outcome = binding.click(&UpdateCartControl {
        product: Some("1".into()),
        action: None,
    });
    assert!(matches!(
        outcome,
        ClickOutcome::Rejected(CartError::MissingControlAttribute("action"))
    ));

    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_failure_restores_count_and_notifies() {
    let page = Arc::new(MemoryPage::new("/cart/", "csrftoken=t"));
    let transport = FixedTransport::failing(403);
    let binding = setup(transport, page.clone(), authenticated(4));

    let err = finish(binding.click(&UpdateCartControl::new("1", "add")))
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::Status(403)));

    let snapshot = page.snapshot();
    assert_eq!(snapshot.cart_count.as_deref(), Some("4"));
    assert_eq!(snapshot.reloads, 0, "no reload after a failed update");
    assert!(snapshot.alerts.is_empty(), "failures are not blocking");
    assert!(matches!(
        snapshot.notices.as_slice(),
        [Notice::UpdateFailed(msg)] if msg.contains("403")
    ));
}

#[tokio::test]
async fn test_stale_response_does_not_overwrite_newer_count() {
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let transport = Arc::new(GatedTransport {
        gates: Mutex::new(HashMap::from([
            ("first".to_string(), first_rx),
            ("second".to_string(), second_rx),
        ])),
    });
    let page = Arc::new(MemoryPage::new("/", "csrftoken=t"));
    let client = Arc::new(CartUpdateClient::new(
        ClientConfig::default(),
        transport,
        page.clone(),
    ));
    client.show_initial_count(0);

    let first_action = CartAction::new("first", Action::Add);
    let second_action = CartAction::new("second", Action::Add);
    let mut first = Box::pin(client.submit_cart_action(&first_action));
    let mut second = Box::pin(client.submit_cart_action(&second_action));

    // Issue both, in order, before either response arrives.
    assert!(poll!(first.as_mut()).is_pending());
    assert!(poll!(second.as_mut()).is_pending());

    // Newer request completes first, then the older one straggles in.
    second_tx.send(2).unwrap();
    let second = second.await.unwrap();
    first_tx.send(1).unwrap();
    let first = first.await.unwrap();

    assert!(second.applied);
    assert!(!first.applied);
    assert!(first.sequence < second.sequence);
    assert_eq!(page.cart_count().as_deref(), Some("2"));
    assert_eq!(client.confirmed_count(), 2);
}

#[tokio::test]
async fn test_in_order_responses_last_wins() {
    let page = Arc::new(MemoryPage::new("/", "csrftoken=t"));
    let client = CartUpdateClient::new(
        ClientConfig::default(),
        FixedTransport::replying(5),
        page.clone(),
    );

    let add = CartAction::new("1", Action::Add);
    let a = client.submit_cart_action(&add).await.unwrap();
    let b = client.submit_cart_action(&add).await.unwrap();

    assert!(a.applied && b.applied);
    assert_eq!(b.sequence, a.sequence + 1);
    assert_eq!(page.snapshot().counter_writes, vec!["5", "5"]);
}
