// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod emotions;
pub mod error;
pub mod models;
pub mod query;
pub mod stats;
pub mod store;
pub mod telemetry;
pub mod utils;
pub mod views;
