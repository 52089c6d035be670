//! Logging and panic reporting for the `golite` binary.

use std::sync::Once;

use golite_interp::Fault;

static TRACING_INIT: Once = Once::new();
static PANIC_HOOK: Once = Once::new();

/// Filter variable checked before `RUST_LOG`.
pub const LOG_VAR: &str = "GOLITE_LOG";

/// Initialize tracing to stderr.
///
/// Safe to call multiple times. Does nothing unless `GOLITE_LOG` or
/// `RUST_LOG` is set, e.g. `GOLITE_LOG=golite_session=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Some(directives) = std::env::var(LOG_VAR)
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
        else {
            return;
        };
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::new(directives))
            .init();
    });
}

/// Keep recovered evaluation faults out of the default panic report.
///
/// Faults are expected and come back to the host as `panic: ...` errors, so
/// they are only traced. Every other panic still reaches the default hook.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if let Some(fault) = info.payload().downcast_ref::<Fault>() {
                tracing::debug!(%fault, "evaluation fault raised");
            } else {
                default_hook(info);
            }
        }));
    });
}
