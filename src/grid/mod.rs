// SPDX-License-Identifier: MIT

pub mod column;
pub mod components;
pub mod decimal;
pub mod definition;
pub mod element;
pub mod filter;
pub mod loader;
pub mod menu;

pub use column::{ColumnDefinition, ComparatorKind, ComponentSpec, FilterSpec};
pub use decimal::{DecimalEditor, DecimalFormat, DecimalSettings};
pub use definition::{ElementSettings, GridDefinition, RowReport};
pub use element::{ElementChange, GridElement, PropertyChange};
pub use filter::{date_time_comparator, DateRangeFilter, FilterModel};
pub use loader::GridLoader;
pub use menu::{MenuEntry, MenuItem, ResolvedMenuEntry};
