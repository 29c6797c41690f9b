//! Process-wide default exception sink
//!
//! Reactive pipelines (the routed view host in particular) run detached from
//! the call that triggered them, so their failures can't be returned to a
//! caller. They are reported here instead.

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::Error;

/// Callback that receives errors raised inside detached pipelines
pub type ExceptionHandler = Arc<dyn Fn(&Error) + Send + Sync>;

struct Sink {
    handler: ExceptionHandler,
}

static DEFAULT_EXCEPTION_HANDLER: Lazy<ArcSwap<Sink>> =
    Lazy::new(|| ArcSwap::from_pointee(Sink { handler: log_handler() }));

fn log_handler() -> ExceptionHandler {
    Arc::new(|err: &Error| log::error!("Unhandled error in reactive pipeline: {}", err))
}

/// Replace the process-wide handler
pub fn set_default_exception_handler<F>(handler: F)
where
    F: Fn(&Error) + Send + Sync + 'static,
{
    DEFAULT_EXCEPTION_HANDLER.store(Arc::new(Sink {
        handler: Arc::new(handler),
    }));
}

/// Restore the logging handler
pub fn reset_default_exception_handler() {
    DEFAULT_EXCEPTION_HANDLER.store(Arc::new(Sink { handler: log_handler() }));
}

/// Send an error to the current process-wide handler
pub fn report(err: &Error) {
    let sink = DEFAULT_EXCEPTION_HANDLER.load();
    (sink.handler)(err);
}
