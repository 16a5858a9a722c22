// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers, grouped by route prefix.

pub mod audio;
pub mod chat;
pub mod history;
pub mod meta;
