//! Screen-level state for players and admins, independent of any UI toolkit.

pub mod admin;
pub mod draw_panel;
pub mod grid;
pub mod player;
pub mod selection;
