pub mod http_client;
pub mod websocket_client;
