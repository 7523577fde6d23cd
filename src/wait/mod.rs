//! Waiting on a page that renders asynchronously.
//!
//! [`ChangeWatcher`] answers one question per call: has the text at a
//! selector changed yet? [`poll_until`] owns the timing and turns "never" into
//! [`WaitError::Timeout`].

pub mod backoff;
pub mod poll;
pub mod watcher;

pub use backoff::calculate_backoff_delay;
pub use poll::{
    Condition, ElementPresent, PollPolicy, WaitError, poll_until, wait_for_change,
    wait_for_element,
};
pub use watcher::{ChangeState, ChangeWatcher};
