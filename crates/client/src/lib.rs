//! Client-side notification store for the Concierge API.
//!
//! [`NotificationStore`] keeps an in-memory copy of the current user's
//! notifications, refreshed by explicit fetches and periodic polls driven by
//! an external scheduler. The HTTP boundary sits behind the
//! [`NotificationsApi`] trait so the store's state machine can be tested
//! without a server.

pub mod api;
pub mod store;

pub use api::{ClientError, HttpNotificationsApi, Notification, NotificationsApi};
pub use store::{FetchQuery, NotificationStore};
