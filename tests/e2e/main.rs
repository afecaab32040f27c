// End-to-end tests for the Voice Studio HTTP API
//
// Each test gets its own server on an ephemeral port, backed by in-memory
// settings and a mock speech provider, through test-context lifecycle hooks.

mod helpers;
mod test_credentials;
mod test_health;
mod test_segments;
