// src/client/console.rs
// DOCUMENTATION: Terminal implementations of the orchestrator collaborators
// PURPOSE: Drive the client flow from the `locate` binary

use super::collaborators::{
    GeolocationProvider, ListView, MapHandle, MapSurface, Marker, MarkerKind, Notifier,
};
use super::error::{ClientError, Notice};
use crate::models::{Coordinate, MapCredential};
use async_trait::async_trait;
use std::io::BufRead;
use tokio::sync::mpsc;

/// Parse "lat,lon" (whitespace tolerant)
pub fn parse_position(line: &str) -> Option<Coordinate> {
    let (lat, lon) = line.trim().split_once(',')?;
    let coordinate = Coordinate::new(lat.trim().parse().ok()?, lon.trim().parse().ok()?);
    coordinate.is_valid().then_some(coordinate)
}

/// Position given on the command line; watching reads "lat,lon" lines from stdin
pub struct ConsoleGeolocation {
    position: Option<Coordinate>,
}

impl ConsoleGeolocation {
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl GeolocationProvider for ConsoleGeolocation {
    async fn current_position(&self) -> Result<Coordinate, ClientError> {
        self.position.ok_or_else(|| {
            ClientError::GeolocationUnavailable("no position given (use --lat/--lon)".to_string())
        })
    }

    /// Stdin is read on a detached thread; a blocked read never holds up shutdown
    fn watch(&self) -> Option<mpsc::Receiver<Coordinate>> {
        let (tx, rx) = mpsc::channel(8);
        let initial = self.position;

        std::thread::spawn(move || {
            if let Some(position) = initial {
                if tx.blocking_send(position).is_err() {
                    return;
                }
            }

            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match parse_position(&line) {
                    Some(position) => {
                        if tx.blocking_send(position).is_err() {
                            break;
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => log::warn!("Ignoring position line {:?}", line),
                }
            }
        });

        Some(rx)
    }
}

/// Map that logs what a widget would draw
pub struct ConsoleMap;

#[async_trait]
impl MapSurface for ConsoleMap {
    async fn open(
        &self,
        center: Coordinate,
        credential: &MapCredential,
    ) -> Result<Box<dyn MapHandle>, ClientError> {
        log::info!(
            "Map ready at {} (zoom 12, auth {})",
            center,
            credential.auth_type()
        );
        Ok(Box::new(ConsoleMapHandle {
            markers: Vec::new(),
        }))
    }
}

pub struct ConsoleMapHandle {
    markers: Vec<Marker>,
}

impl MapHandle for ConsoleMapHandle {
    fn add_marker(&mut self, marker: Marker) {
        let color = match marker.kind {
            MarkerKind::User => "red",
            MarkerKind::Service => "blue",
        };
        let [lon, lat] = marker.position.map_position();
        log::info!("Added {} marker for {} at [{}, {}]", color, marker.label, lon, lat);
        self.markers.push(marker);
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn marker_count(&self) -> usize {
        self.markers.len()
    }
}

/// Prints list entries to stdout
pub struct ConsoleList;

impl ListView for ConsoleList {
    fn clear(&mut self) {
        println!();
    }

    fn append(&mut self, entry: String) {
        println!("{}", entry);
    }
}

/// Prints alerts to stderr
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, notice: &Notice) {
        eprintln!("ALERT: {}", notice.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        assert_eq!(
            parse_position(" 40.4168, -3.7038 "),
            Some(Coordinate::new(40.4168, -3.7038))
        );
        assert_eq!(parse_position("40.4"), None);
        assert_eq!(parse_position("abc,1"), None);
        assert_eq!(parse_position("120,1"), None);
    }

    #[tokio::test]
    async fn test_console_geolocation_without_position() {
        let geo = ConsoleGeolocation::new(None);
        assert!(geo.current_position().await.is_err());
    }

    #[tokio::test]
    async fn test_watch_yields_initial_position_first() {
        let geo = ConsoleGeolocation::new(Some(Coordinate::new(1.0, 2.0)));
        let mut positions = geo.watch().unwrap();

        assert_eq!(positions.recv().await, Some(Coordinate::new(1.0, 2.0)));
    }

    #[tokio::test]
    async fn test_console_map_counts_markers() {
        let credential = MapCredential::SubscriptionKey("k".to_string());
        let mut map = ConsoleMap
            .open(Coordinate::new(1.0, 2.0), &credential)
            .await
            .unwrap();

        map.add_marker(Marker::user(Coordinate::new(1.0, 2.0)));
        assert_eq!(map.marker_count(), 1);
        map.clear_markers();
        assert_eq!(map.marker_count(), 0);
    }
}
