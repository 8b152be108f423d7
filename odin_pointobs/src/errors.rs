/*
 * Copyright © 2024, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OdinPointObsError>;

#[derive(Error,Debug)]
pub enum OdinPointObsError {
    /// unknown variable, wrong value tuple shape, kind or unit mismatch
    #[error("schema error {0}")]
    SchemaError(String),

    /// invalid analysis or construction parameters
    #[error("argument error {0}")]
    ArgumentError(String),

    /// the caller provided cancellation check fired between time slices
    #[error("operation cancelled")]
    Cancelled,

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("config RON error {0}")]
    RonError( #[from] ron::error::SpannedError),
}

pub fn schema_error (msg: impl ToString)->OdinPointObsError {
    OdinPointObsError::SchemaError(msg.to_string())
}

pub fn argument_error (msg: impl ToString)->OdinPointObsError {
    OdinPointObsError::ArgumentError(msg.to_string())
}
