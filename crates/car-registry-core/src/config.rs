//! Centralized configuration for the car registry.

/// Server-level defaults.
pub struct ServerConfig;

impl ServerConfig {
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 6000;
    pub const WELCOME_MESSAGE: &'static str = "Welcome to the Car Dealership API!";
    /// Stdout prefix announcing the bound port to a supervising process.
    pub const PORT_ANNOUNCE_PREFIX: &'static str = "CAR_REGISTRY_PORT=";
}

/// Messages returned in response bodies.
pub struct MessageConfig;

impl MessageConfig {
    pub const CAR_DELETED: &'static str = "Car deleted successfully";
}
