pub mod api;
pub mod components;
pub mod components_impl;
pub mod error;
pub mod projection;
pub mod types;

#[cfg(feature = "ssr")]
pub mod api_impl;
#[cfg(feature = "ssr")]
pub mod command;
#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod dispatcher;
#[cfg(feature = "ssr")]
pub mod geocoder;
#[cfg(feature = "ssr")]
pub mod map;
#[cfg(feature = "ssr")]
pub mod store;
#[cfg(feature = "ssr")]
pub mod telegram;
