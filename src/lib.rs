// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analyze;
pub mod classify;
pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod loan;
pub mod models;
pub mod report;
pub mod rules;
pub mod tax;
pub mod utils;
