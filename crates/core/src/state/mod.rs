//! Run lifecycle: seeding, phase transitions and progress events.

pub mod run;
