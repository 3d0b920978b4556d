pub mod event;

pub use event::{Condition, NewEvent, RetailEvent};
