//! Where [`LocationDimension::load_default`](crate::LocationDimension::load_default)
//! looks for the table.

use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable holding the table path.
pub const DIM_LOCATION_ENV: &str = "FAB_LOCATE_DIM_LOCATION";

/// Used when [`DIM_LOCATION_ENV`] is unset or empty. Relative to the
/// working directory.
pub const DEFAULT_DIMENSION_PATH: &str = "data/dimensions/dim_location.csv";

/// The dimension table path, from [`DIM_LOCATION_ENV`] or
/// [`DEFAULT_DIMENSION_PATH`].
#[must_use]
pub fn dimension_path() -> PathBuf {
    resolve(std::env::var_os(DIM_LOCATION_ENV))
}

fn resolve(value: Option<OsString>) -> PathBuf {
    value
        .filter(|value| !value.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_DIMENSION_PATH), PathBuf::from)
}
