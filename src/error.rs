// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error types for the analytics core.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Malformed date, amount, or status in a stored record.
    #[error("Invalid record '{id}': {reason}")]
    Parse { id: String, reason: String },

    /// A required input is missing, non-numeric, or outside its domain.
    #[error("Invalid value for {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// A min/max pair is inverted.
    #[error("Invalid range for {field}: min {min} is greater than max {max}")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

impl AnalyticsError {
    pub fn parse(id: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalyticsError::Parse {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        AnalyticsError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
