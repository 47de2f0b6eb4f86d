//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use siesta::prelude::*;
//! ```

pub use crate::distribution::{CountDistribution, HdiInterval, Moments};
pub use crate::error::{Result, SiestaError};
pub use crate::estimator::EbEstimator;
pub use crate::prior::{PriorTable, ReferenceMeanTable};
pub use crate::report::{ReportRow, RetentionReport};
pub use crate::retention::{RetentionMode, RetentionPolicy, RetentionRange};
pub use crate::scenario::{Scenario, ScenarioGenerator};
