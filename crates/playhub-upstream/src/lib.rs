//! # playhub-upstream
//!
//! Outbound bridge to the platform backend. Game logic calls
//! [`UpstreamClient::post`] with a JSON body; the bridge encrypts it to the
//! backend's RSA public key, posts the result as `sign` with a short timeout
//! and hands back the raw response body.

pub mod client;
pub mod sealer;

pub use client::UpstreamClient;
pub use sealer::PayloadSealer;
