pub mod code;
pub mod command;
pub mod controller;
pub mod dispatcher;
pub mod engine;
pub mod reconciler;
pub mod renderer;
pub mod session;
pub mod snapshot;
pub mod view;

// Wire events and the per-connection outbox
pub mod websocket;
