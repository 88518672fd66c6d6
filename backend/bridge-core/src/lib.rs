pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod gate;
pub mod pack;
pub mod resource;
pub mod rpc;
pub mod server;

#[cfg(test)]
mod tests;

/// Salt shared by the offline packager and the runtime archive provider.
pub const ASSET_SALT: &[u8] = b"$qu0Osh-N4t1v3!!";
pub const BRIDGE_HOSTNAME: &str = "127.0.0.1";
pub const BRIDGE_BASE_URL: &str = const_format::concatcp!("http://", BRIDGE_HOSTNAME);
pub const DEFAULT_DOCUMENT: &str = "index.html";
pub const RPC_CONTENT_TYPE: &str = "application/msgpack";
pub const RPC_ROUTE_PREFIX: &str = "/api/";
pub const DIRECT_ROUTE_PREFIX: &str = "/direct/";
