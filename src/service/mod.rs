//! Actor tasks behind the relay.
//!
//! Every actor owns its state inside a spawned task and is reached through a
//! cloneable `Handle` wrapping a bounded channel. The delivery service sits in
//! the middle of a star: user actors never hold handles to each other, only to
//! the delivery service, which routes messages by recipient name.

pub mod delivery;
pub mod socket;
pub mod user;

const CHANNEL_CAPACITY: usize = 8;
