//! Outbound notification delivery for the helpdesk.
//!
//! All ticket lifecycle notifications (confirmations, updates, assignment
//! and breach alerts, reminders) go through [`Notifier::send`]. Delivery is
//! fire-and-forget: callers log failures and carry on -- a lost email never
//! fails a ticket operation.

mod email;

pub use email::{EmailConfig, Notifier, NotifyError};
