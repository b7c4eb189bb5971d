mod buffer_view;
mod status_bar;

pub use buffer_view::BufferViewWidget;
pub use status_bar::StatusBarWidget;
