//! fOS Browser - Headless Page Host
//!
//! A single-threaded, headless page that provides the host services
//! `fos-visibility` observes: computed style, window focus, the page
//! visibility API, and intersection/mutation observers.

pub mod events;
pub mod intersection_observer;
pub mod mutation_observer;
pub mod page;
pub mod page_visibility;

pub use intersection_observer::IntersectionObserverManager;
pub use mutation_observer::MutationObserverManager;
pub use page::HeadlessPage;
pub use page_visibility::{DocumentVisibility, VisibilityState, VisibilityVendor};
