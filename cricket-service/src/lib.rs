//! Cricket chat: a proxy in front of the hosted cricket AI service, and the
//! conversation client that talks to it.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod i18n;
pub mod proxy;
pub mod upstream;

#[cfg(test)]
mod test_support;
