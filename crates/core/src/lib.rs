//! Shared foundation for the trade desk: domain types, provider trait
//! seams, mandates, configuration, and the intake session store.

pub mod config;
pub mod config_loader;
pub mod mandate;
pub mod providers;
pub mod session;
pub mod types;

pub use config::{AllocatorConfig, DeskConfig, GuardrailConfig, KillSwitchConfig};
pub use config_loader::ConfigLoader;
pub use mandate::{Mandate, MandateBook, Objective};
pub use providers::{
    EventCalendar, FeatureProvider, MandateProvider, MarketDataProvider, PositionProvider,
    ProviderError,
};
pub use session::SessionStore;
pub use types::{
    Account, AccountId, AccountStatus, CalendarEvent, CandidateSignal, ClosedPosition, Direction,
    EventRecord, FeatureSnapshot, OpenPosition, Scope,
};
