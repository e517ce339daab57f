pub mod api_client;
pub mod status_fetcher;
