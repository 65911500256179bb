//! Lookup orchestration: geocode a place, then fetch its current conditions
//!
//! The visible lifecycle is an explicit state machine (`LookupState` plus a
//! pure `transition` function) instead of scattered loading/error flags, and
//! overlapping lookups are serialized through monotonic request tokens:
//! only the completion of the most recently started lookup may mutate state,
//! so a slow early request can never overwrite a newer result.

use tracing::{debug, info};

use crate::Result;
use crate::api::WeatherApiClient;
use crate::error::SkycheckError;
use crate::geolocation::GeolocationSource;
use crate::models::{Observation, Place};

/// Display name used when reverse geocoding cannot name the position
const FALLBACK_PLACE_NAME: &str = "Your location";

/// Lookup lifecycle states
///
/// Error and data are mutually exclusive by construction: a failed lookup
/// replaces any previously displayed observation with its message.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LookupState {
    /// No lookup has run yet
    #[default]
    Idle,
    /// A lookup is in flight
    Loading,
    /// The most recent lookup completed with data
    Success(Observation),
    /// The most recent lookup failed with a user-facing message
    Error(String),
}

impl LookupState {
    /// True while a lookup is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, LookupState::Loading)
    }

    /// The displayed observation, if any
    #[must_use]
    pub fn observation(&self) -> Option<&Observation> {
        match self {
            LookupState::Success(observation) => Some(observation),
            _ => None,
        }
    }

    /// The displayed error message, if any
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            LookupState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Events driving the lookup state machine
#[derive(Debug, Clone, PartialEq)]
pub enum LookupEvent {
    Started,
    Completed(Observation),
    Failed(String),
}

/// Pure transition function for the lookup state machine
///
/// Terminal events only land while loading; the token layer in
/// [`LookupSession`] ensures stale terminal events never reach this point.
#[must_use]
pub fn transition(state: &LookupState, event: &LookupEvent) -> LookupState {
    match (state, event) {
        (_, LookupEvent::Started) => LookupState::Loading,
        (LookupState::Loading, LookupEvent::Completed(observation)) => {
            LookupState::Success(observation.clone())
        }
        (LookupState::Loading, LookupEvent::Failed(message)) => {
            LookupState::Error(message.clone())
        }
        (other, _) => other.clone(),
    }
}

/// Token identifying one lookup request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Tracks the visible lookup state across possibly overlapping requests
///
/// `begin` hands out a monotonically increasing token and makes every
/// earlier token stale; `finish` with a stale token is dropped. The result
/// is last-started-wins ordering across rapid resubmissions.
#[derive(Debug, Default)]
pub struct LookupSession {
    state: LookupState,
    latest: u64,
}

impl LookupSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current visible state
    #[must_use]
    pub fn state(&self) -> &LookupState {
        &self.state
    }

    /// Start a new lookup: the state goes to `Loading` and all previously
    /// issued tokens become stale
    pub fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        self.state = transition(&self.state, &LookupEvent::Started);
        RequestToken(self.latest)
    }

    /// Apply the outcome of the lookup identified by `token`
    ///
    /// Returns `false` and leaves the state untouched when the token is
    /// stale. Errors collapse to their user-facing message here, at the
    /// orchestration boundary, so the loading state is always left behind
    /// regardless of which step failed.
    pub fn finish(&mut self, token: RequestToken, outcome: Result<Observation>) -> bool {
        if token.0 != self.latest {
            debug!(
                "Dropping stale lookup completion (token {} < {})",
                token.0, self.latest
            );
            return false;
        }

        let event = match outcome {
            Ok(observation) => LookupEvent::Completed(observation),
            Err(error) => LookupEvent::Failed(error.user_message()),
        };
        self.state = transition(&self.state, &event);
        true
    }
}

/// Orchestrates the two-step lookup: resolve a place, then fetch conditions
pub struct LookupService {
    api: WeatherApiClient,
    geolocation: Option<Box<dyn GeolocationSource>>,
}

impl LookupService {
    #[must_use]
    pub fn new(api: WeatherApiClient, geolocation: Option<Box<dyn GeolocationSource>>) -> Self {
        Self { api, geolocation }
    }

    /// Look up current conditions for a free-text city name
    ///
    /// Geocodes to the single best match, then fetches conditions for its
    /// coordinates. Any failure discards partial data: a resolved place
    /// never survives a failed forecast fetch.
    pub async fn lookup_city(&self, name: &str) -> Result<Observation> {
        info!("Looking up weather for '{}'", name);

        let place = self
            .api
            .geocode_city(name)
            .await?
            .ok_or(SkycheckError::NotFound)?;

        let conditions = self
            .api
            .current_conditions(place.latitude, place.longitude)
            .await?;

        Ok(Observation { place, conditions })
    }

    /// Look up current conditions for raw coordinates
    ///
    /// Reverse geocoding is best-effort and affects only the displayed
    /// name; the given coordinates always drive the conditions fetch.
    pub async fn lookup_coordinates(&self, latitude: f64, longitude: f64) -> Result<Observation> {
        let place = match self.api.reverse_geocode(latitude, longitude).await {
            Ok(Some(named)) => Place::new(named.name, named.country, latitude, longitude),
            Ok(None) => {
                debug!("No reverse geocoding results, using fallback name");
                Place::new(FALLBACK_PLACE_NAME, "", latitude, longitude)
            }
            Err(e) => {
                debug!("Reverse geocoding failed: {}, using fallback name", e);
                Place::new(FALLBACK_PLACE_NAME, "", latitude, longitude)
            }
        };

        let conditions = self.api.current_conditions(latitude, longitude).await?;

        Ok(Observation { place, conditions })
    }

    /// Look up current conditions for the system's position
    ///
    /// Fails with an unsupported error before any network call when no
    /// geolocation capability is configured.
    pub async fn lookup_device(&self) -> Result<Observation> {
        let source = self
            .geolocation
            .as_deref()
            .ok_or(SkycheckError::Unsupported)?;

        let position = source.current_position().await?;
        self.lookup_coordinates(position.latitude, position.longitude).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CurrentConditions;

    fn observation(name: &str) -> Observation {
        Observation {
            place: Place::new(name, "Testland", 1.0, 2.0),
            conditions: CurrentConditions {
                temperature: 18.2,
                weather_code: 0,
                time: "2025-06-01T09:00".to_string(),
            },
        }
    }

    #[test]
    fn test_transition_idle_to_loading() {
        let next = transition(&LookupState::Idle, &LookupEvent::Started);
        assert!(next.is_loading());
    }

    #[test]
    fn test_transition_loading_to_success() {
        let next = transition(
            &LookupState::Loading,
            &LookupEvent::Completed(observation("Atlanta")),
        );
        assert_eq!(next.observation().unwrap().place.name, "Atlanta");
        assert!(!next.is_loading());
    }

    #[test]
    fn test_transition_loading_to_error() {
        let next = transition(
            &LookupState::Loading,
            &LookupEvent::Failed("City not found.".to_string()),
        );
        assert_eq!(next.error_message(), Some("City not found."));
        assert!(next.observation().is_none());
        assert!(!next.is_loading());
    }

    #[test]
    fn test_transition_restart_from_terminal_states() {
        let success = LookupState::Success(observation("Atlanta"));
        assert!(transition(&success, &LookupEvent::Started).is_loading());

        let error = LookupState::Error("City not found.".to_string());
        assert!(transition(&error, &LookupEvent::Started).is_loading());
    }

    #[test]
    fn test_session_clears_previous_data_on_failure() {
        let mut session = LookupSession::new();

        let token = session.begin();
        session.finish(token, Ok(observation("Atlanta")));
        assert!(session.state().observation().is_some());

        let token = session.begin();
        assert!(session.state().is_loading());
        session.finish(token, Err(SkycheckError::NotFound));

        assert_eq!(session.state().error_message(), Some("City not found."));
        assert!(session.state().observation().is_none());
    }

    #[test]
    fn test_session_loading_cleared_on_both_outcomes() {
        let mut session = LookupSession::new();

        let token = session.begin();
        session.finish(token, Ok(observation("Atlanta")));
        assert!(!session.state().is_loading());

        let token = session.begin();
        session.finish(token, Err(SkycheckError::NotFound));
        assert!(!session.state().is_loading());
    }

    #[test]
    fn test_session_drops_stale_completion() {
        let mut session = LookupSession::new();

        let first = session.begin();
        let second = session.begin();

        assert!(session.finish(second, Ok(observation("Boston"))));
        // The earlier-started lookup completes late and must not win
        assert!(!session.finish(first, Ok(observation("Atlanta"))));

        assert_eq!(
            session.state().observation().unwrap().place.name,
            "Boston"
        );
    }

    #[test]
    fn test_session_drops_stale_failure_after_newer_success() {
        let mut session = LookupSession::new();

        let first = session.begin();
        let second = session.begin();

        assert!(session.finish(second, Ok(observation("Boston"))));
        assert!(!session.finish(first, Err(SkycheckError::NotFound)));

        assert!(session.state().error_message().is_none());
        assert!(session.state().observation().is_some());
    }
}
