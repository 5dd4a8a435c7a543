//! End-to-end tests: the assembled Axum application over real sockets, and
//! the connection engine over the in-process transport.

mod dispatch_test;
mod health_test;
mod heartbeat_test;
mod helpers;
mod hub_harness;
mod registry_test;
mod session_failure_test;
