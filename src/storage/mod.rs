// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod prediction_store;

pub use prediction_store::{PredictionRecord, PredictionStore, StoreError};
