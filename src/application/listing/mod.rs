//! Listing queries and the browse-screen selection state that drives them.

pub mod composer;
pub mod view_state;

pub use composer::ListingComposer;
pub use view_state::ViewState;
