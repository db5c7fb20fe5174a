//! Test utilities for entitycache integration tests
//!
//! `TestFixture` wires an identifier cache and a result store over in-memory
//! backends, with a counting resolver and a frozen clock.

pub mod test_fixture;
