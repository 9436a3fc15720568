// SPDX-License-Identifier: MIT

//! Expression-driven rules for data grids
//!
//! `rules` evaluates JSON-encoded expressions against row data; `grid`
//! uses them for editability, CSS classes and context menus, and carries
//! the grid-side pieces (filters, decimal input, mounted components).

pub mod grid;
pub mod rules;
