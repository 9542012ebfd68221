pub mod drive_client;
pub mod drive_models;
pub mod drive_service;

pub use drive_client::{DriveClient, DriveError, ExtractError, TextExtractor};
pub use drive_models::RemoteDocument;
pub use drive_service::{FetchError, FetchService};
