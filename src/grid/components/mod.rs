//! Components mounted into cells

pub mod editor;
pub mod registry;
pub mod renderer;

pub use editor::{AppEditor, BooleanEditor, CellEditor, CURRENT_VALUE_PORT};
pub use registry::{Application, Component, ComponentRegistry, PortCallback};
pub use renderer::{render_boolean_cell, AppRenderer, BooleanCell, REFRESH_PORT};
