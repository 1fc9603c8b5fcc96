//! Dependent selection chains with cascade invalidation
//!
//! A chain is an ordered list of levels (client → plant → area → location,
//! or any other parent → child hierarchy). Selecting at one level clears
//! every level below it and loads the options of the next level only.
//!
//! Loads follow a three-step protocol so that UI events can interleave with
//! pending I/O without sharing the selector:
//!
//! 1. [`CascadingSelector::select`] or [`CascadingSelector::load_root`]
//!    mutate state and hand back a [`PendingLoad`] ticket.
//! 2. [`PendingLoad::run`] performs the I/O.
//! 3. [`CascadingSelector::resolve`] applies the [`LoadOutcome`], or drops it
//!    when the level has moved on since the ticket was issued.

mod level;
mod loader;
mod selector;

pub use level::{LevelKey, SelectionLevel};
pub use loader::{location_selector, LocationOptions, OptionLoader};
pub use selector::{CascadingSelector, LoadOutcome, PendingLoad, Resolution, SelectorError};
