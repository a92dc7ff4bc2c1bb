//! Application layer: listing queries, booking requests and the event bus
//! that carries invalidations to cache holders.

pub mod booking;
pub mod events;
pub mod listing;
pub mod marketplace;
pub mod policy;

#[cfg(test)]
pub(crate) mod test_support;

pub use booking::{
    BookingGuard, BookingHistoryCache, BookingService, GuardDecision, InvalidationSink,
    RejectReason,
};
pub use events::{create_event_bus, Event, EventBus, EventSubscriber, SharedEventBus};
pub use listing::{ListingComposer, ViewState};
pub use marketplace::Marketplace;
pub use policy::StorePolicy;
