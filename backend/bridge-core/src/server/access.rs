//! Client access control for every bridge surface.
//!
//! The paired host window sets its `User-Agent` to the client token; any other
//! client is refused before a path is even resolved.

use common::ClientToken;

use std::sync::Arc;

#[derive(Clone)]
pub struct AccessPolicy {
    expected: Arc<ClientToken>,
}

impl AccessPolicy {
    pub fn new(token: ClientToken) -> Self {
        Self {
            expected: Arc::new(token),
        }
    }

    pub fn permits(&self, presented: Option<&str>) -> bool {
        presented.is_some_and(|value| self.expected.matches(value))
    }
}
