pub mod badge;
pub mod session;
pub mod state;
pub mod view;

#[cfg(test)]
pub(crate) mod fixtures;

pub use state::{DashboardState, Notice, NoticeLevel, ViewState};
pub use view::{DashboardView, ModalView};
