use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "casa_admin=info,casa_client=info";

/// Install the global `tracing` subscriber: an `EnvFilter` read from
/// `RUST_LOG` (falling back to `default_filter`) and a `fmt` layer.
///
/// Returns `false` when a subscriber was already installed, so it is safe to
/// call more than once.
pub fn init_tracing(default_filter: &str) -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
