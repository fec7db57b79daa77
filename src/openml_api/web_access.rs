//! Access the OpenML REST API

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};

use app_dirs::{app_root, AppDataType, AppInfo};
use log::{error, info};

use crate::error::Result;
use crate::file_lock::{ExclusiveLock, SharedLock};

const APP_INFO: AppInfo = AppInfo {
    name: "housing-ols",
    author: "housing-ols",
};

/// Query a URL. If possible read the response from local cache
pub fn get_cached(url: &str) -> Result<String> {
    let mut path = app_root(AppDataType::UserCache, &APP_INFO)?;
    path.push(url_to_file(url));

    loop {
        if let Ok(f) = File::open(&path) {
            info!("Loading cached {}", url);
            let mut file = SharedLock::new(f)?;
            let mut data = String::new();
            file.read_to_string(&mut data)?;
            if !data.is_empty() {
                return Ok(data);
            }
            // a writer created the file but has not locked it yet, or a download failed
            drop(file);
            let _ = fs::remove_file(&path);
        }

        match OpenOptions::new().create_new(true).write(true).open(&path) {
            Err(e) => {
                match e.kind() {
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied => continue,
                    _ => {}
                }
                error!("Error while opening cache for writing: {:?}", e);
                return Err(e.into());
            }
            Ok(f) => {
                info!("Downloading {}", url);
                let mut file = ExclusiveLock::new(f)?;
                let data = match download(url) {
                    Ok(data) => data,
                    Err(e) => {
                        drop(file);
                        let _ = fs::remove_file(&path);
                        return Err(e);
                    }
                };
                file.write_all(data.as_bytes())?;
                return Ok(data);
            }
        }
    }
}

/// Query a URL.
fn download(url: &str) -> Result<String> {
    Ok(reqwest::blocking::get(url)?.error_for_status()?.text()?)
}

/// Convert URL to file name for caching
fn url_to_file(s: &str) -> String {
    s.replace('/', "_").replace(':', "")
}

#[test]
fn cache_file_names_are_flat() {
    assert_eq!(
        url_to_file("https://www.openml.org/api/v1/json/data/531"),
        "https__www.openml.org_api_v1_json_data_531"
    );
}
