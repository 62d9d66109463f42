pub mod app;
pub mod attachment;
pub mod chat_request;
pub mod composer;
pub mod config;
pub mod constants;
pub mod export;
pub mod message;
pub mod session;
pub mod store;
