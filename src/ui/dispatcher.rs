use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, ThreadId};
use tokio::sync::{Notify, mpsc};

/// Work item marshalled onto the UI thread
pub type UiAction = Box<dyn FnOnce() + Send>;

struct DispatcherInner {
    ui_thread: ThreadId,
    tx: mpsc::UnboundedSender<UiAction>,
    rx: Mutex<mpsc::UnboundedReceiver<UiAction>>,
    queued: AtomicUsize,
    wake: Notify,
}

/// Marshals work onto the single thread that owns widget state.
///
/// The thread that constructs the dispatcher is the UI thread. Work coming
/// from that thread runs inline; everything else is queued until the UI
/// loop calls [`UiDispatcher::pump`].
#[derive(Clone)]
pub struct UiDispatcher {
    inner: Arc<DispatcherInner>,
}

impl UiDispatcher {
    pub fn for_current_thread() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            inner: Arc::new(DispatcherInner {
                ui_thread: thread::current().id(),
                tx,
                rx: Mutex::new(rx),
                queued: AtomicUsize::new(0),
                wake: Notify::new(),
            }),
        }
    }

    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.inner.ui_thread
    }

    /// Run now if already on the UI thread, otherwise queue
    pub fn invoke<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_ui_thread() {
            action();
        } else {
            self.post(action);
        }
    }

    /// Always queue, even from the UI thread
    pub fn post<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.queued.fetch_add(1, Ordering::SeqCst);
        if self.inner.tx.send(Box::new(action)).is_err() {
            self.inner.queued.fetch_sub(1, Ordering::SeqCst);
            log::warn!("UI dispatcher queue closed, dropping action");
            return;
        }
        self.inner.wake.notify_one();
    }

    /// Number of actions waiting for the next pump
    pub fn pending(&self) -> usize {
        self.inner.queued.load(Ordering::SeqCst)
    }

    /// Drain queued actions in FIFO order. Returns how many ran.
    ///
    /// Only the UI thread may pump; calls from elsewhere run nothing.
    pub fn pump(&self) -> usize {
        if !self.is_ui_thread() {
            log::warn!("pump() called off the UI thread, ignoring");
            return 0;
        }

        let mut ran = 0;
        loop {
            // Release the receiver before running so actions can post more work
            let next = self.inner.rx.lock().try_recv();
            match next {
                Ok(action) => {
                    self.inner.queued.fetch_sub(1, Ordering::SeqCst);
                    action();
                    ran += 1;
                }
                Err(_) => break,
            }
        }
        ran
    }

    /// Wait until something is posted. Meant for a UI loop driven by tokio.
    pub async fn wait_for_work(&self) {
        if self.pending() > 0 {
            return;
        }
        self.inner.wake.notified().await;
    }
}

impl std::fmt::Debug for UiDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiDispatcher")
            .field("ui_thread", &self.inner.ui_thread)
            .field("pending", &self.pending())
            .finish()
    }
}
