pub mod controller;
pub mod history;
pub mod settings;

pub use controller::{DragSession, InteractionController, ViewState};
pub use history::{ViewEntry, ViewHistory};
pub use settings::ViewSettings;
