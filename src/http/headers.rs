//! Header relay between inbound and outbound messages.
//!
//! # Responsibilities
//! - Copy header name/value pairs from one message to another
//! - Preserve duplicate header names and their order of arrival
//!
//! # Design Decisions
//! - The copy step sits behind a trait so a filtering relay (e.g. one
//!   that strips headers named in `Connection`) can be swapped in
//!   without touching the dispatcher's control flow
//! - The default relay copies everything, hop-by-hop headers included

use axum::http::HeaderMap;

/// Copies headers from a source message onto a destination message.
pub trait HeaderRelay: Send + Sync {
    /// Append every relayed header pair from `source` onto `dest`.
    fn relay(&self, source: &HeaderMap, dest: &mut HeaderMap);
}

/// Relay that copies every header pair verbatim.
///
/// No filtering is performed; headers named in a `Connection` header are
/// copied through like any other.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRelay;

impl HeaderRelay for PassthroughRelay {
    fn relay(&self, source: &HeaderMap, dest: &mut HeaderMap) {
        for (name, value) in source {
            dest.append(name.clone(), value.clone());
        }
    }
}
