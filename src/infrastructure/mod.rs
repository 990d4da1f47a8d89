pub mod codec;
pub mod credentials;
pub mod http_executor;

pub use credentials::{Credentials, MemorySecretStore, SecretStore, TomlSecretStore};
pub use http_executor::HttpExecutor;
