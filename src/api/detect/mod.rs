// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection endpoints: POST /detect and POST /detect-batch

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{detect_batch_handler, detect_handler};
pub use request::{BatchDetectRequest, DetectRequest};
pub use response::{BatchDetectResponse, BatchItemResult, DetectResponse};
