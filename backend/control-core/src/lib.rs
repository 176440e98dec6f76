pub mod bootstrap;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod picker;
pub mod rpc;
pub mod store;

#[cfg(test)]
mod tests;

pub const PANEL_APP_NAME: &str = "davpanel";
pub const BACKEND_HOSTNAME: &str = "127.0.0.1";
pub const BACKEND_PORT: u16 = 7878;
pub const DEFAULT_BACKEND_URL: &str =
    const_format::concatcp!("http://", BACKEND_HOSTNAME, ":", BACKEND_PORT, "/");
