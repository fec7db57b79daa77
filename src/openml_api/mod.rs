//! Data set descriptions and downloads from OpenML

mod api_types;
mod web_access;

use log::info;

use crate::error::{Error, Result};

use self::api_types::GenericResponse;
use self::web_access::get_cached;

/// The parts of an OpenML data set description needed to fetch the data
#[derive(Debug, Clone, PartialEq)]
pub struct DataDescription {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub default_target: Option<String>,
}

impl DataDescription {
    /// Fetch the description of data set `id`
    pub fn from_openml(id: u32) -> Result<Self> {
        let info_url = format!("https://www.openml.org/api/v1/json/data/{}", id);
        let raw = get_cached(&info_url)?;
        DataDescription::from_json(id, &raw)
    }

    fn from_json(id: u32, raw: &str) -> Result<Self> {
        let info: GenericResponse = serde_json::from_str(raw)?;

        let url = info
            .look_up_str("/data_set_description/url")
            .ok_or_else(|| Error::DatasetSchema(format!("data set {} has no download url", id)))?;
        let name = info
            .look_up_str("/data_set_description/name")
            .unwrap_or("unnamed");
        let default_target = info
            .look_up_str("/data_set_description/default_target_attribute")
            .map(str::to_owned);

        Ok(DataDescription {
            id,
            name: name.to_owned(),
            url: url.to_owned(),
            default_target,
        })
    }

    /// Download (or read from cache) the ARFF text of the data set
    pub fn fetch_arff(&self) -> Result<String> {
        info!("Fetching data set {} ({})", self.id, self.name);
        get_cached(&self.url)
    }
}
