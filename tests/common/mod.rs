//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests:
//! a real server wired against stub upstream services, plus an HTTP client
//! for talking to it. Tests should only import from this module, not from
//! internal submodules.

mod stubs;

// Public API - this is what tests import
pub use client::TestClient;
pub use server::{Fixture, TestServer, TEST_API_KEY, TEST_BEARER_TOKEN};
pub use stubs::{shelf_page_html, tag_mappings, RecordedTagRequest, StubBook};
