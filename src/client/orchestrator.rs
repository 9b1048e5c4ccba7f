// src/client/orchestrator.rs
// DOCUMENTATION: Client orchestrator
// PURPOSE: Sequence locate -> authenticate/init map -> fetch -> render

use super::backend::ServicesSource;
use super::collaborators::{
    GeolocationProvider, ListView, LocationStore, MapSurface, Marker, Notifier,
};
use super::config::{ClientConfig, CredentialSource, LocationMode};
use super::error::{ClientError, ErrorKind};
use super::location_store::SavedLocation;
use super::render::list_entry;
use super::session::Session;
use crate::models::{sort_by_distance, Coordinate, MapCredential, ServiceRecord};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Everything the orchestrator talks to besides the network
pub struct Collaborators {
    pub geolocation: Arc<dyn GeolocationProvider>,
    pub surface: Arc<dyn MapSurface>,
    pub list: Box<dyn ListView>,
    pub notifier: Arc<dyn Notifier>,
    pub store: Option<Arc<dyn LocationStore>>,
}

/// Result of one locate -> render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Rendered { count: usize },
    NoServices,
    Aborted(ErrorKind),
    /// A newer position arrived before this pass could render
    Superseded,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TrackingSummary {
    pub cycles: usize,
    pub rendered: usize,
    pub no_services: usize,
    pub aborted: usize,
    pub superseded: usize,
}

impl TrackingSummary {
    fn record(&mut self, outcome: &CycleOutcome) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::Rendered { .. } => self.rendered += 1,
            CycleOutcome::NoServices => self.no_services += 1,
            CycleOutcome::Aborted(_) => self.aborted += 1,
            CycleOutcome::Superseded => self.superseded += 1,
        }
    }
}

enum Step {
    Finished(CycleOutcome),
    Superseded(Coordinate),
    Shutdown,
}

pub struct Orchestrator {
    config: ClientConfig,
    geolocation: Arc<dyn GeolocationProvider>,
    surface: Arc<dyn MapSurface>,
    list: Box<dyn ListView>,
    notifier: Arc<dyn Notifier>,
    store: Option<Arc<dyn LocationStore>>,
    source: ServicesSource,
    session: Session,
}

impl Orchestrator {
    pub fn new(config: ClientConfig, collaborators: Collaborators) -> Self {
        let source = ServicesSource::from_config(&config);
        let session = Session::new();
        log::debug!("Created session {}", session.id());

        Self {
            config,
            geolocation: collaborators.geolocation,
            surface: collaborators.surface,
            list: collaborators.list,
            notifier: collaborators.notifier,
            store: collaborators.store,
            source,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run according to the configured location mode.
    /// Continuous mode runs until the position stream ends or `shutdown` fires.
    pub async fn run(&mut self, shutdown: CancellationToken) -> TrackingSummary {
        if self.config.location_mode != LocationMode::Continuous {
            let mut summary = TrackingSummary::default();
            summary.record(&self.run_once().await);
            return summary;
        }

        match self.geolocation.watch() {
            Some(positions) => self.track(positions, shutdown).await,
            None => {
                let mut summary = TrackingSummary::default();
                let outcome = self.report(ClientError::GeolocationUnavailable(
                    "continuous tracking is not supported".to_string(),
                ));
                summary.record(&outcome);
                summary
            }
        }
    }

    /// One linear pass: locate, open the map, fetch, render
    pub async fn run_once(&mut self) -> CycleOutcome {
        let center = match self.acquire_location().await {
            Ok(center) => center,
            Err(e) => return self.report(e),
        };

        self.run_cycle(center).await
    }

    /// Continuous tracking
    /// DOCUMENTATION: Each position starts a fresh cycle. A newer position
    /// drops the in-flight cycle before it renders, so results never appear
    /// out of order relative to position updates.
    pub async fn track(
        &mut self,
        mut positions: mpsc::Receiver<Coordinate>,
        shutdown: CancellationToken,
    ) -> TrackingSummary {
        let mut summary = TrackingSummary::default();
        let mut stream_open = true;

        let mut next = tokio::select! {
            _ = shutdown.cancelled() => None,
            position = positions.recv() => position,
        };

        while let Some(position) = next.take() {
            log::info!("Position update: {}", position);
            self.remember(position);
            let ticket = self.session.begin_cycle(&shutdown);

            let step = {
                let cycle = self.run_cycle(position);
                tokio::pin!(cycle);

                loop {
                    tokio::select! {
                        biased;
                        _ = ticket.token.cancelled() => break Step::Shutdown,
                        update = positions.recv(), if stream_open => match update {
                            Some(newer) => break Step::Superseded(newer),
                            None => stream_open = false,
                        },
                        outcome = &mut cycle => break Step::Finished(outcome),
                    }
                }
            };

            match step {
                Step::Finished(outcome) => {
                    summary.record(&outcome);
                    if !stream_open {
                        break;
                    }
                    next = tokio::select! {
                        _ = shutdown.cancelled() => None,
                        position = positions.recv() => position,
                    };
                }
                Step::Superseded(newer) => {
                    ticket.token.cancel();
                    log::info!("Cycle {} superseded by a newer position", ticket.generation);
                    summary.record(&CycleOutcome::Superseded);
                    next = Some(newer);
                }
                Step::Shutdown => {
                    log::info!("Tracking stopped during cycle {}", ticket.generation);
                    break;
                }
            }
        }

        summary
    }

    /// The user's position
    /// DOCUMENTATION: cached-then-live reads the store first. Live fixes are
    /// bounded by the location timeout and saved. On failure the configured
    /// fallback is substituted; without one the error is returned.
    pub async fn acquire_location(&self) -> Result<Coordinate, ClientError> {
        if self.config.location_mode == LocationMode::CachedThenLive {
            if let Some(saved) = self.store.as_ref().and_then(|store| store.load()) {
                log::info!("Using saved location {}", saved.coordinate());
                return Ok(saved.coordinate());
            }
        }

        let live = match tokio::time::timeout(
            self.config.location_timeout,
            self.geolocation.current_position(),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ClientError::GeolocationUnavailable(format!(
                "no position within {:?}",
                self.config.location_timeout
            ))),
        };

        match live {
            Ok(position) => {
                log::info!("User's location fetched: {}", position);
                self.remember(position);
                Ok(position)
            }
            Err(e) => match self.config.fallback {
                Some(fallback) => {
                    log::warn!("{}; using fallback location {}", e, fallback);
                    Ok(fallback)
                }
                None => Err(e),
            },
        }
    }

    /// Open the map centered on `center` and place the user marker
    pub async fn initialize_map(&mut self, center: Coordinate) -> Result<(), ClientError> {
        let credential = self.resolve_credential().await?;

        let mut map = match self.surface.open(center, &credential).await {
            Ok(map) => map,
            Err(e) => {
                if e.kind() == ErrorKind::MissingCredential {
                    self.session.forget_credential();
                }
                return Err(e);
            }
        };

        map.add_marker(Marker::user(center));
        self.session.replace_map(map, center);
        log::info!("Map initialized at {} ({})", center, credential.auth_type());
        Ok(())
    }

    /// Exactly one request for services around `center`
    pub async fn fetch_nearby_services(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<ServiceRecord>, ClientError> {
        let services = self
            .source
            .fetch(self.session.credential(), center, radius_m)
            .await?;
        log::info!("Services received: {}", services.len());
        Ok(services)
    }

    /// Sort by distance, then one marker and one list entry per service.
    /// Markers from an earlier render on the same map are replaced.
    pub fn render(&mut self, mut services: Vec<ServiceRecord>) -> usize {
        sort_by_distance(&mut services);
        self.list.clear();

        match self.session.map_mut() {
            Some((map, center)) => {
                if map.marker_count() > 1 {
                    map.clear_markers();
                    map.add_marker(Marker::user(center));
                }
                for service in &services {
                    map.add_marker(Marker::service(service.position(), service.name.clone()));
                }
            }
            None => log::warn!("Rendering {} services without a map", services.len()),
        }

        for (index, service) in services.iter().enumerate() {
            self.list.append(list_entry(index + 1, service));
        }

        log::info!("Services displayed successfully ({})", services.len());
        services.len()
    }

    async fn run_cycle(&mut self, center: Coordinate) -> CycleOutcome {
        if let Err(e) = self.initialize_map(center).await {
            return self.report(e);
        }

        match self
            .fetch_nearby_services(center, self.config.radius_m)
            .await
        {
            Ok(services) => CycleOutcome::Rendered {
                count: self.render(services),
            },
            Err(e) => self.report(e),
        }
    }

    async fn resolve_credential(&mut self) -> Result<MapCredential, ClientError> {
        if let Some(credential) = self.session.credential() {
            return Ok(credential.clone());
        }

        let credential = match &self.config.credential_source {
            CredentialSource::StaticKey(key) => {
                MapCredential::subscription_key(key).ok_or(ClientError::MissingCredential)?
            }
            CredentialSource::BackendToken => {
                MapCredential::Bearer(self.source.fetch_maps_token().await?)
            }
        };

        self.session.cache_credential(credential.clone());
        Ok(credential)
    }

    fn remember(&self, position: Coordinate) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&SavedLocation::now(position)) {
                log::warn!("Could not save location: {}", e);
            }
        }
    }

    /// Turn an error into its single user-facing notice
    fn report(&self, e: ClientError) -> CycleOutcome {
        let notice = e.notice();
        match notice.kind {
            ErrorKind::NoServicesFound => log::warn!("{}", e),
            _ => log::error!("{}", e),
        }
        self.notifier.alert(&notice);

        match notice.kind {
            ErrorKind::NoServicesFound => CycleOutcome::NoServices,
            kind => CycleOutcome::Aborted(kind),
        }
    }
}
