pub mod dispatch;
pub mod events;

pub use dispatch::{
    dispatch_event, replay_events, DispatchError, DispatchOutcome, RecordedEvent, ReplayStats,
};
