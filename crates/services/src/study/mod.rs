//! Card navigation and rendering for a study run.

mod controller;
mod navigation;
mod render;

pub use controller::{LoadOutcome, LoadTicket, StudyController};
pub use navigation::{Face, Navigation};
pub use render::{CardField, CardView, StudyStatus, clear_card, render_card};
