pub mod client;
pub mod leads;
pub mod meetings;
pub mod reminders;

pub use client::*;
