pub mod blueprints;
pub mod checkins;
pub mod events;
pub mod profiles;
pub mod pulses;
pub mod share;
pub mod streaks;
