pub mod render;
pub mod state;
pub mod view;

pub use render::{render, screen, Screen, TableRow};
pub use state::ViewState;
pub use view::{Completion, SearchView, Submission};
