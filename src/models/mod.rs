// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: submission data types and the validation ruleset, free of UI concerns.

pub mod submission;
pub mod validation;
