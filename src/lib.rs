//! OpenFeature provider for Kameleoon, a feature flagging and experimentation platform.
//!
//! # Overview
//!
//! The crate revolves around a [`KameleoonProvider`] that implements the OpenFeature
//! [`FeatureProvider`] interface on top of a Kameleoon client. Flags are evaluated for a visitor
//! identified by the [`EvaluationContext`] targeting key. Every evaluation results in
//! [`ResolutionDetails`] carrying the resolved value, the variation key and, when something went
//! wrong, an [`ErrorCode`] with a message.
//!
//! # Evaluation context
//!
//! Besides the targeting key, the context may carry Kameleoon data that is sent to the SDK before
//! the flag is evaluated:
//! - `"customData"`: a structure (or a list of structures) with an integer `"index"` and a
//!   string or list of strings under `"values"`.
//! - `"conversion"`: a structure (or a list of structures) with an integer `"goalId"` and an
//!   optional numeric `"revenue"`.
//!
//! A string under `"variableKey"` selects which variable of the assigned variation is returned.
//! Without it, the first variable of the variation is used.
//!
//! ```
//! # use kameleoon_openfeature::{EvaluationContext, Structure, Value};
//! let context = EvaluationContext::default()
//!     .with_targeting_key("visitorCode")
//!     .with_field("variableKey", "title")
//!     .with_field(
//!         "customData",
//!         Structure::new().with("index", 1).with("values", vec![Value::from("premium")]),
//!     );
//! ```
//!
//! # Kameleoon client
//!
//! The provider talks to Kameleoon through the [`KameleoonClient`] trait. Clients are built by a
//! [`KameleoonClientFactory`], which keeps one client per site code so providers created for the
//! same site share it.
//!
//! # Error Handling
//!
//! Flag evaluation never fails: errors are reported through [`ResolutionDetails::error_code`] and
//! the default value is returned. Provider construction and initialization return the [`Error`]
//! enum.
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate for logging messages under
//! the `kameleoon` target. Consider integrating a `log`-compatible logger implementation for better
//! visibility into flag evaluation.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod client;
mod config;
mod context;
mod converter;
mod data;
mod error;
mod evaluation;
mod factory;
mod provider;
mod readiness;
mod resolver;
mod value;

#[cfg(test)]
mod test_utils;

pub use client::{InitState, KameleoonClient, VariableValue, Variables};
pub use config::ClientConfig;
pub use context::EvaluationContext;
pub use converter::{to_kameleoon, to_open_feature};
pub use data::{
    Conversion, ConversionType, CustomData, CustomDataType, Data, DataType, VARIABLE_KEY,
};
pub use error::{Error, KameleoonError, Result};
pub use evaluation::{ErrorCode, Reason, ResolutionDetails};
pub use factory::{ClientBuilder, KameleoonClientFactory};
pub use provider::{FeatureProvider, KameleoonProvider, ProviderMetadata, ProviderState};
pub use readiness::Readiness;
pub use resolver::{FlagValue, KameleoonResolver, Resolver};
pub use value::{Structure, Value};
