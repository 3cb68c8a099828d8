pub mod broadcast;

pub use broadcast::{spawn_broadcast_task, BroadcastCycle};
