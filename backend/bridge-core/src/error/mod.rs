pub mod asset;
pub mod codec;
pub mod config;
pub mod pack;
pub mod resource;
pub mod rpc;
pub mod server;

pub use asset::AssetError;
pub use codec::CodecError;
pub use config::ConfigError;
pub use pack::PackError;
pub use resource::ResourceError;
pub use rpc::{HandlerFailure, RpcError};
pub use server::ServerError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Resource(#[from] resource::ResourceError),

    #[error(transparent)]
    Pack(#[from] pack::PackError),

    #[error(transparent)]
    Server(#[from] server::ServerError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Rpc(#[from] rpc::RpcError),
}
