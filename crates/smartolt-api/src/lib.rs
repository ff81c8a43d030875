// smartolt-api: Async Rust client for the SmartOLT fiber-network management API

pub mod availability;
pub mod client;
pub mod error;
pub mod models;
pub mod onu;
pub mod reboot;
pub mod system;
pub mod transport;

pub use availability::calculate_odb_availability;
pub use client::{ClientConfig, SmartOltClient};
pub use error::Error;
pub use models::{
    AuthorizeOnu, GponChannel, Odb, OdbAvailability, OnuDetails, OnuListItem, OnuMode,
    OnuSignal, OnuStatus, PonType, ServicePort, SpeedProfile, UnconfiguredOnu,
};
pub use reboot::stale_online_onus;
pub use transport::{
    ApiRequest, FormBody, HttpTransport, RawResponse, TOKEN_HEADER, TlsMode, TokenTransport,
    Transport, TransportConfig,
};
