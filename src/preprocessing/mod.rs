//! Turning a series into a supervised multi-step dataset.
//!
//! Features are computed over trailing windows and keyed by the window's last
//! timestamp; targets hold the following `horizon` values keyed by the current
//! timestamp. [`align`] keeps the timestamps present in both.

mod alignment;
mod features;
mod split;
mod table;
mod target;

pub use alignment::{align, build_rolling_xy, AlignedDataset, RollingConfig, RollingDataset};
pub use features::{build_rolling_features, feature_names, RollingFeatureBuilder};
pub use split::{temporal_train_test_split, TrainTestSplit};
pub use table::{FeatureTable, Table, TargetTable};
pub use target::{build_rolling_target, target_names};
