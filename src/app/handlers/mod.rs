// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! Handlers are grouped by functional domain.

pub mod capture;
pub mod system;
