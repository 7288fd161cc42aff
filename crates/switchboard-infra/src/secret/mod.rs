pub mod env;

pub use env::EnvSecrets;
