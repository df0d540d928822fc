pub mod config;
pub mod controller;
pub mod division;
pub mod dom;
pub mod errors;
pub mod models;
pub mod popup;
pub mod reconcile;
pub mod storage;
pub mod transport;

#[cfg(test)]
mod testing;

pub use config::{ControllerConfig, resolve_page_path};
pub use controller::{DomEvent, PageController};
pub use dom::Document;
pub use errors::PageError;
pub use storage::{load_page, persist_page};
pub use transport::HttpTransport;
