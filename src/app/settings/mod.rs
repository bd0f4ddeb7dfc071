// SPDX-License-Identifier: GPL-3.0-only

//! Settings UI module
//!
//! Camera selection, photo format and quality, save location, theme.

pub mod view;
