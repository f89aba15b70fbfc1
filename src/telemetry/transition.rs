//! Transition span helpers.
//!
//! Provides span creation and state-transition recording for `up`/`down`
//! invocations.

use tracing::Span;

/// Start a span for one `up`/`down` invocation.
///
/// The `vpn.status` field is declared empty and filled in with the
/// terminal outcome via [`record_state_transition`].
pub fn start_transition_span(command: &str) -> Span {
    tracing::info_span!(
        "vpn.transition",
        "vpn.command" = command,
        "vpn.status" = tracing::field::Empty,
    )
}

/// Record a state transition event on the given span.
pub fn record_state_transition(span: &Span, from: &str, to: &str) {
    span.record("vpn.status", to);
    span.in_scope(|| {
        tracing::info!(from = from, to = to, "state_transition");
    });
}
