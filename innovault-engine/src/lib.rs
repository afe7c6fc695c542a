pub mod config;
pub mod cosine;
pub mod error;
pub mod notifier;
pub mod persistence;
pub mod policy;
pub mod protocol;
pub mod server;
pub mod store;
pub mod text_source;
pub mod tokenizer;
pub mod transport;
pub mod types;
pub mod vault;
pub mod vectorizer;
