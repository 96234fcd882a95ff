pub mod handlers;
mod state;
mod view;

pub use state::PresentationStateMachine;
pub use view::PresentationView;
