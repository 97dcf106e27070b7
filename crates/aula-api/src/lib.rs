//! # aula-api
//!
//! Backend integration for the Aula client. Provides:
//!
//! - Gateway traits for notifications, security settings, and the
//!   session-activity heartbeat, plus their REST implementations
//! - A realtime-channel gateway trait and its WebSocket implementation
//! - An HTTP reachability probe implementing the connectivity capability
//!
//! Gateways are consumed as trait objects so tests can substitute
//! in-memory fakes.

pub mod client;
pub mod gateway;
pub mod notifications;
pub mod probe;
pub mod realtime;
pub mod session;
pub mod settings;

pub use client::ApiClient;
pub use gateway::{NotificationGateway, SecuritySettingsGateway, SessionActivityGateway};
pub use notifications::HttpNotificationGateway;
pub use probe::HttpConnectivityProbe;
pub use realtime::{
    ChannelEvent, ChannelHandle, ChannelStatus, RealtimeGateway, RowChange, WsRealtimeGateway,
};
pub use session::HttpSessionActivityGateway;
pub use settings::HttpSecuritySettingsGateway;
