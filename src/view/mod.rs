//! View model for the page surfaces.
//!
//! A [`Container`] stands in for a DOM element whose whole content is
//! replaced on every update. The markup projection lives in [`html`].

pub mod container;
pub mod html;
pub mod progress;
pub mod state;

pub use container::Container;
pub use progress::{ProgressSnapshot, ProgressStatus, ProgressSurface};
pub use state::{Control, Preview, ResultBlock, ViewState};
