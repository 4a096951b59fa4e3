pub mod controller;
pub mod filter;
pub mod geolocation;
pub mod inflight;
pub mod persistence;
pub mod receipt_image;
pub mod state;

pub use controller::App;
pub use filter::{filter_stores, FilterInputs, Proximity, RankedStore};
pub use geolocation::{GeolocationError, IpLocator, LocationSource, PositionOptions};
pub use inflight::{Feature, InFlight, RequestToken};
pub use persistence::{
    FileStore, KeyValueStore, MemoryStore, Persistence, PersistenceError, FAVORITES_KEY,
    RECEIPT_HISTORY_KEY,
};
pub use receipt_image::{ImageError, ReceiptImage};
pub use state::{reduce, Action, AnalysisSession, AppState, Notification, NotificationKind, View};
