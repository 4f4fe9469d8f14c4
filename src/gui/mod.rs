//! GUI module - Dashboard window, page rendering and widgets

mod app;
mod dashboard;
mod page_view;
mod selection;

pub use app::DashboardApp;
pub use dashboard::Dashboard;
pub use page_view::{PageAction, PageView};
pub use selection::CountrySelection;
