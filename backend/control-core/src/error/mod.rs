pub mod config;
pub mod rpc;
pub mod server;
pub mod validation;

pub use config::ConfigError;
pub use rpc::RpcError;
pub use server::ServerError;
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] validation::ValidationError),

    #[error(transparent)]
    Server(#[from] server::ServerError),

    #[error(transparent)]
    Rpc(#[from] rpc::RpcError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
