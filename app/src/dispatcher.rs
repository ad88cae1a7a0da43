//! Operator commands applied to the record store.
//!
//! Each command is one transaction: it either succeeds completely (store
//! mutated, file saved, map re-rendered) or leaves memory and disk exactly as
//! they were. Operator mistakes come back as [`RiskError`] values for which
//! [`RiskError::is_operator_error`] holds; anything else is fatal for the
//! command in flight.

use crate::command::Command;
use crate::error::{Result, RiskError};
use crate::geocoder::Geocoder;
use crate::map::MapRenderer;
use crate::store::RecordStore;
use crate::types::{Coordinates, Field, FieldValue, RegionRecord};
use std::path::PathBuf;
use tracing::{error, info};

pub const WELCOME: &str = "Hello! Welcome to the Health Risk Bot.";

pub const HELP: &str = "The following commands are available:

/start -> Welcome message
/help -> This message
/add_city <city/state> -> Add a city or state with coordinates
/update <state> <parameter> <value> -> Update a specific parameter for a state
/show <state> -> Show current risk data for a particular state
/remove <city/state> -> Remove a city/state from the map
/map -> Show the current risk map";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Document(PathBuf),
}

impl Reply {
    pub fn text(message: impl Into<String>) -> Self {
        Self::Text(message.into())
    }
}

pub struct Dispatcher {
    store: RecordStore,
    geocoder: Geocoder,
    renderer: MapRenderer,
}

impl Dispatcher {
    pub fn new(store: RecordStore, geocoder: Geocoder, renderer: MapRenderer) -> Self {
        Self {
            store,
            geocoder,
            renderer,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Run one command to completion and build the operator's reply.
    ///
    /// Operator errors become text replies. Fatal errors are returned so the
    /// caller can log them and tell the operator the command was aborted.
    pub async fn handle(&mut self, command: Command) -> Result<Reply> {
        let outcome = match command {
            Command::Start => Ok(Reply::text(WELCOME)),
            Command::Help => Ok(Reply::text(HELP)),
            Command::Usage(usage) => Ok(Reply::text(usage)),
            Command::Unknown(name) => Ok(Reply::text(format!(
                "Unknown command /{name}. Use /help to see the available commands."
            ))),
            Command::Text(text) => Ok(Reply::text(format!(
                "You said: {text}. Use the commands with /"
            ))),
            Command::AddCity(name) => self.add(&name).await.map(|coords| {
                Reply::text(format!("{name} has been added with coordinates: {coords}."))
            }),
            Command::Update {
                region,
                parameter,
                value,
            } => match self.update(&region, &parameter, &value) {
                Err(RiskError::RegionNotFound(_)) => Ok(Reply::text(format!(
                    "No data for {region}. Use /add_city to add it first."
                ))),
                other => other.map(|_| {
                    Reply::text(format!("{parameter} for {region} updated to '{value}'."))
                }),
            },
            Command::Show(region) => match self.show(&region) {
                Err(RiskError::RegionNotFound(_)) => {
                    Ok(Reply::text(format!("No data available for {region}.")))
                }
                other => other.map(Reply::Text),
            },
            Command::Remove(name) => self.remove(&name).map(|_| {
                Reply::text(format!("{name} has been removed from the map and data."))
            }),
            Command::Map => self.show_map().map(Reply::Document),
        };

        match outcome {
            Err(e) if e.is_operator_error() => Ok(Reply::text(e.to_string())),
            other => other,
        }
    }

    /// Geocode and insert a new region with the default template.
    pub async fn add(&mut self, name: &str) -> Result<Coordinates> {
        if self.store.contains(name) {
            return Err(RiskError::RegionExists(name.to_string()));
        }

        let coords = self
            .geocoder
            .resolve(name)
            .await
            .ok_or_else(|| RiskError::GeocodeFailed(name.to_string()))?;

        self.store.put(name, RegionRecord::new(coords));
        if let Err(e) = self.store.save() {
            self.store.delete(name);
            return Err(e);
        }

        info!("Added region {} at {}", name, coords);
        self.refresh_map();
        Ok(coords)
    }

    /// Overwrite one field with the literal value. Values are not validated;
    /// non-numeric metrics only fail later, when charted.
    pub fn update(&mut self, name: &str, parameter: &str, value: &str) -> Result<Field> {
        let record = self
            .store
            .get_mut(name)
            .ok_or_else(|| RiskError::RegionNotFound(name.to_string()))?;

        let field = Field::lookup(parameter).ok_or_else(|| RiskError::UnknownField {
            region: name.to_string(),
            field: parameter.to_string(),
        })?;

        let previous = record.set(field, FieldValue::text(value));
        if let Err(e) = self.store.save() {
            if let Some(record) = self.store.get_mut(name) {
                record.set(field, previous);
            }
            return Err(e);
        }

        info!("Updated {} of {} to '{}'", field.key(), name, value);
        self.refresh_map();
        Ok(field)
    }

    pub fn show(&self, name: &str) -> Result<String> {
        let record = self
            .store
            .get(name)
            .ok_or_else(|| RiskError::RegionNotFound(name.to_string()))?;
        Ok(format_record(name, record))
    }

    pub fn remove(&mut self, name: &str) -> Result<RegionRecord> {
        let index = self
            .store
            .index_of(name)
            .ok_or_else(|| RiskError::RegionNotFound(name.to_string()))?;
        let record = self
            .store
            .delete(name)
            .ok_or_else(|| RiskError::RegionNotFound(name.to_string()))?;

        if let Err(e) = self.store.save() {
            self.store.restore(index, name, record);
            return Err(e);
        }

        info!("Removed region {}", name);
        self.refresh_map();
        Ok(record)
    }

    pub fn show_map(&self) -> Result<PathBuf> {
        self.renderer.current()
    }

    /// The store is already persisted at this point, so a rendering failure
    /// only leaves a stale map behind; it is logged and the command stands.
    fn refresh_map(&self) {
        if let Err(e) = self.renderer.render(self.store.records()) {
            error!("Failed to render map: {}", e);
        }
    }
}

/// Text block answering `/show`.
pub fn format_record(name: &str, record: &RegionRecord) -> String {
    let mut out = format!("{name} Risk Data:");
    for (field, value) in record.fields() {
        out.push('\n');
        out.push_str(&format!("{}: {}", field.label(), value));
    }
    out
}
