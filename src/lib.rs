//! Control panel for the system's MPRIS media players and default audio sink,
//! driven through `playerctl` and `pactl`.

pub mod app;
pub mod config;
pub mod controller;
pub mod deps;
pub mod registry;
pub mod runner;
pub mod schedule;
pub mod selection;
pub mod status;
pub mod theme;
