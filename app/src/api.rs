use leptos::prelude::*;

#[cfg(feature = "ssr")]
use crate::api_impl;

/// Location of the records file, provided to server functions as context.
#[cfg(feature = "ssr")]
#[derive(Clone, Debug)]
pub struct DataFile(pub std::path::PathBuf);

/// Get the records file path from Leptos context
#[cfg(feature = "ssr")]
pub fn get_data_file_from_context() -> Result<DataFile, ServerFnError> {
    use_context::<DataFile>().ok_or_else(|| ServerFnError::new("Data file not configured"))
}

/// Region names for the selection control, read fresh from disk.
#[server]
pub async fn list_regions() -> Result<Vec<String>, ServerFnError> {
    let data_file = get_data_file_from_context()?;
    Ok(api_impl::list_regions_impl(&data_file.0))
}

/// Details and chart data for one region; `None` when it no longer exists.
#[server]
pub async fn region_details(
    name: String,
) -> Result<Option<crate::projection::RegionDetails>, ServerFnError> {
    let data_file = get_data_file_from_context()?;
    Ok(api_impl::region_details_impl(&data_file.0, &name))
}
