// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // processor config + loaders
pub mod engine;     // dispatch, rewriters, fallback walker
pub mod errors;     // error handling
pub mod observability;
pub mod sexp;       // tagged trees and queries
pub mod traits;     // handler contracts
