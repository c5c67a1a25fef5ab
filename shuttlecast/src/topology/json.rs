//! JSON-file topology store.
//!
//! The whole network is one small document:
//!
//! ```text
//! {
//!   "version": 1,
//!   "stops":  [{"id": 1, "name": "Vadi Campus", "location": {"lat": 41.0652, "lon": 29.0062}}, ...],
//!   "routes": [{"id": 101, "name": "...", "stops": [5, 2, 1], "distance_km": 20.0, "direction": "inbound"}, ...]
//! }
//! ```
//!
//! Writes go to a temp file that is renamed over the target, so a crash
//! mid-write leaves the previous document intact.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::{check_route_stops, SeedReport, TopologyError, TopologyResult, TopologyStore};
use crate::model::{Route, Stop};

/// Document format version.
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct TopologyDocument {
    version: u32,
    #[serde(default)]
    stops: Vec<Stop>,
    #[serde(default)]
    routes: Vec<Route>,
}

/// Default location of the topology file (`~/.shuttlecast/topology.json`).
pub fn default_topology_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".shuttlecast")
        .join("topology.json")
}

/// Topology store backed by a JSON document.
///
/// A missing file reads as an empty network.
#[derive(Debug)]
pub struct JsonTopologyStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonTopologyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the backing file so the next seed starts from scratch.
    pub fn clear(&self) -> TopologyResult<()> {
        let _guard = self.write_lock.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "Topology file removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(TopologyError::WriteFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn read_document(&self) -> TopologyResult<TopologyDocument> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(TopologyDocument {
                    version: FORMAT_VERSION,
                    ..Default::default()
                })
            }
            Err(source) => {
                return Err(TopologyError::ReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let document: TopologyDocument =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| TopologyError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        if document.version != FORMAT_VERSION {
            return Err(TopologyError::Corrupt {
                path: self.path.clone(),
                reason: format!(
                    "unsupported format version {} (expected {})",
                    document.version, FORMAT_VERSION
                ),
            });
        }

        Ok(document)
    }

    fn write_document(&self, document: &TopologyDocument) -> TopologyResult<()> {
        let write_err = |source: io::Error| TopologyError::WriteFailed {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("json.tmp");
        let file = File::create(&temp_path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document)
            .map_err(|e| write_err(io::Error::other(e)))?;
        writer.flush().map_err(write_err)?;
        drop(writer);

        fs::rename(&temp_path, &self.path).map_err(write_err)
    }
}

impl TopologyStore for JsonTopologyStore {
    fn load_stops(&self) -> TopologyResult<Vec<Stop>> {
        Ok(self.read_document()?.stops)
    }

    fn load_routes(&self) -> TopologyResult<Vec<Route>> {
        Ok(self.read_document()?.routes)
    }

    fn save_if_absent(&self, stops: &[Stop], routes: &[Route]) -> TopologyResult<SeedReport> {
        let _guard = self.write_lock.lock();
        let mut document = self.read_document()?;
        let mut report = SeedReport::default();

        if document.routes.is_empty() {
            let known = if document.stops.is_empty() {
                stops
            } else {
                document.stops.as_slice()
            };
            check_route_stops(known, routes)?;
        }

        if document.stops.is_empty() {
            tracing::info!(count = stops.len(), "Adding stops");
            document.stops = stops.to_vec();
            report.stops_written = stops.len();
        }
        if document.routes.is_empty() {
            tracing::info!(count = routes.len(), "Adding routes");
            document.routes = routes.to_vec();
            report.routes_written = routes.len();
        }

        if report.wrote_anything() {
            self.write_document(&document)?;
            tracing::info!(
                path = %self.path.display(),
                stops = report.stops_written,
                routes = report.routes_written,
                "Topology seeded"
            );
        } else {
            tracing::debug!(path = %self.path.display(), "Topology already present, nothing seeded");
        }

        Ok(report)
    }
}
