//! Crosswalk Simulation Library
//!
//! Real-time simulation core for a street crossing arcade game: pedestrians
//! cross a road while the player taps them to stop or sprint, vehicles obey
//! (or ignore) a traffic light, and difficulty climbs tier by tier.

pub mod simulation;
