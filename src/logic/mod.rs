// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Side-effecting business logic: avatar upload and record rendering.

pub mod storage;
pub mod submission;
