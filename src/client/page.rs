//! Page seam: everything the cart client reads from or writes to the page

use parking_lot::Mutex;

/// Non-blocking messages shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A cart update failed; the counter shows the last confirmed count.
    UpdateFailed(String),
}

/// The parts of the storefront page the cart client touches.
///
/// Implemented over the DOM in a browser build and by [`MemoryPage`] in tests.
pub trait PageView: Send + Sync {
    /// Replaces the text of the `cart-count` element.
    fn set_cart_count(&self, text: &str);

    /// Current `document.cookie` string.
    fn cookies(&self) -> String;

    /// Current `location.pathname`.
    fn pathname(&self) -> String;

    /// Full page reload.
    fn reload(&self);

    /// Blocking, modal message.
    fn alert(&self, message: &str);

    /// Non-blocking message.
    fn notify(&self, notice: Notice);
}

/// Everything a [`MemoryPage`] has recorded.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    /// Text of the `cart-count` element, `None` until first written
    pub cart_count: Option<String>,
    /// Every counter write, in order
    pub counter_writes: Vec<String>,
    pub reloads: usize,
    /// Counter text at the moment of each reload
    pub count_at_reload: Vec<Option<String>>,
    pub alerts: Vec<String>,
    pub notices: Vec<Notice>,
}

/// In-memory [`PageView`] that records every side effect.
pub struct MemoryPage {
    cookies: Mutex<String>,
    pathname: Mutex<String>,
    recorded: Mutex<PageSnapshot>,
}

impl MemoryPage {
    pub fn new(pathname: impl Into<String>, cookies: impl Into<String>) -> Self {
        Self {
            cookies: Mutex::new(cookies.into()),
            pathname: Mutex::new(pathname.into()),
            recorded: Mutex::new(PageSnapshot::default()),
        }
    }

    pub fn set_cookies(&self, cookies: impl Into<String>) {
        *self.cookies.lock() = cookies.into();
    }

    pub fn navigate(&self, pathname: impl Into<String>) {
        *self.pathname.lock() = pathname.into();
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.recorded.lock().clone()
    }

    pub fn cart_count(&self) -> Option<String> {
        self.recorded.lock().cart_count.clone()
    }
}

impl PageView for MemoryPage {
    fn set_cart_count(&self, text: &str) {
        let mut recorded = self.recorded.lock();
        recorded.cart_count = Some(text.to_string());
        recorded.counter_writes.push(text.to_string());
    }

    fn cookies(&self) -> String {
        self.cookies.lock().clone()
    }

    fn pathname(&self) -> String {
        self.pathname.lock().clone()
    }

    fn reload(&self) {
        let mut recorded = self.recorded.lock();
        recorded.reloads += 1;
        let current = recorded.cart_count.clone();
        recorded.count_at_reload.push(current);
    }

    fn alert(&self, message: &str) {
        self.recorded.lock().alerts.push(message.to_string());
    }

    fn notify(&self, notice: Notice) {
        self.recorded.lock().notices.push(notice);
    }
}
