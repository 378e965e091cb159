//! MongoDB adapter for recordlayer.
//!
//! This crate implements the same
//! [`PersistenceEngine`](recordlayer_core::engine::PersistenceEngine) contract
//! as the in-memory and file-backed engines, but with no local cache: every
//! operation is translated into a single filter-by-identity round trip against
//! a MongoDB connection established at open time.
//!
//! To use this backend through the facade crate, enable the `mongodb` feature:
//!
//! ```toml
//! [dependencies]
//! recordlayer = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Configuration
//!
//! Connection settings carry no defaults so that `open` can fail fast naming
//! the missing key:
//!
//! - `connection.type` - must equal `"mongodb"`
//! - `connection.host`, `connection.port`, `connection.database`
//! - `credential.username`, `credential.password` - optional
//! - `options.pool_size` (4), `options.connect_timeout` ms (5000),
//!   `options.max_page_size` (100)
//!
//! # Example
//!
//! ```ignore
//! use recordlayer::{PersistenceEngine, config::ConfigParams, mongodb::MongoPersistence};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = MongoPersistence::<User>::new();
//!     store.configure(&ConfigParams::from_tuples(&[
//!         ("connection.type", "mongodb"),
//!         ("connection.host", "localhost"),
//!         ("connection.port", "27017"),
//!         ("connection.database", "app"),
//!     ]))?;
//!
//!     store.open(None).await?;
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as recordlayer_mongodb;

pub mod store;

pub use store::MongoPersistence;
