//! The weather screen: search field, location button and the current-conditions display.
//!
//! All state lives in [`WeatherScreen`] and is only touched from the UI loop.
//! Network and location work runs on spawned tasks that post a [`UiEvent`]
//! back to the loop when done.

use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::{
    client::WeatherClient,
    error::{LocationError, WeatherError},
    location::{Authorization, LocationService, LocationSubscription},
    model::{Coordinate, WeatherModel},
};

pub const EMPTY_SEARCH_PLACEHOLDER: &str = "write some...";

/// Sender half of the UI loop. Cloned into background tasks and input readers.
pub type UiHandle = UnboundedSender<UiEvent>;

#[derive(Debug)]
pub enum UiEvent {
    /// Search text submitted by the user.
    Submit(String),
    /// The "current location" button.
    CurrentLocation,
    Authorization(Authorization),
    /// Result of the location request numbered `request`.
    Locations {
        request: u64,
        result: Result<Vec<Coordinate>, LocationError>,
    },
    Weather(Result<WeatherModel, WeatherError>),
    Quit,
}

/// What a handled event changed, so the caller knows whether to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    Nothing,
    Search,
    Display,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Dispatched,
    Rejected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub icon: &'static str,
    pub temperature: String,
    pub city: String,
    pub description: String,
    pub updated_at: DateTime<Local>,
}

impl From<WeatherModel> for DisplayState {
    fn from(model: WeatherModel) -> Self {
        Self {
            icon: model.condition_name(),
            temperature: model.temperature_string(),
            city: model.city_name,
            description: model.description,
            updated_at: Local::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchField {
    pub text: String,
    pub placeholder: Option<&'static str>,
    pub focused: bool,
}

#[derive(Debug)]
pub struct WeatherScreen {
    client: Arc<dyn WeatherClient>,
    location: Arc<dyn LocationService>,
    ui: UiHandle,
    search: SearchField,
    display: Option<DisplayState>,
    authorization: Option<Authorization>,
    location_task: Option<JoinHandle<()>>,
    location_request: u64,
}

impl WeatherScreen {
    pub fn new(
        client: Arc<dyn WeatherClient>,
        location: Arc<dyn LocationService>,
    ) -> (Self, UnboundedReceiver<UiEvent>) {
        let (ui, events) = mpsc::unbounded_channel();

        let screen = Self {
            client,
            location,
            ui,
            search: SearchField::default(),
            display: None,
            authorization: None,
            location_task: None,
            location_request: 0,
        };

        (screen, events)
    }

    pub fn ui_handle(&self) -> UiHandle {
        self.ui.clone()
    }

    pub fn search(&self) -> &SearchField {
        &self.search
    }

    pub fn display(&self) -> Option<&DisplayState> {
        self.display.as_ref()
    }

    pub fn is_locating(&self) -> bool {
        self.location_task.is_some()
    }

    /// Ask for location access. The answer arrives as [`UiEvent::Authorization`]
    /// and an initial fix is requested once access is granted.
    pub fn load(&mut self) {
        let location = Arc::clone(&self.location);
        let ui = self.ui.clone();

        tokio::spawn(async move {
            let auth = location.request_authorization().await;
            post(&ui, UiEvent::Authorization(auth));
        });
    }

    /// Text-field submission. Empty input keeps focus and never fetches;
    /// anything else starts a lookup and clears the field.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        self.search.text = text.to_string();
        let city = self.search.text.trim();

        if city.is_empty() {
            self.search.text.clear();
            self.search.placeholder = Some(EMPTY_SEARCH_PLACEHOLDER);
            self.search.focused = true;
            return SubmitOutcome::Rejected;
        }

        self.dispatch_city(city.to_string());
        self.search = SearchField::default();
        SubmitOutcome::Dispatched
    }

    /// Start a fresh one-shot location fix, replacing any fix still in flight.
    pub fn request_current_location(&mut self) {
        if self.authorization == Some(Authorization::Denied) {
            warn!("location access denied, ignoring location request");
            return;
        }

        self.stop_location_updates();
        self.location_request += 1;

        let request = self.location_request;
        let subscription = LocationSubscription::start(Arc::clone(&self.location));
        let ui = self.ui.clone();

        self.location_task = Some(tokio::spawn(async move {
            let result = subscription.recv().await;
            post(&ui, UiEvent::Locations { request, result });
        }));
    }

    /// Handle a batch of fixes: stop updating and look up the newest one.
    pub fn on_locations(&mut self, fixes: &[Coordinate]) {
        let Some(&coord) = fixes.last() else {
            debug!("empty location batch");
            return;
        };

        self.stop_location_updates();
        self.dispatch_coordinate(coord);
    }

    pub fn handle(&mut self, event: UiEvent) -> Update {
        match event {
            UiEvent::Submit(text) => {
                self.submit(&text);
                Update::Search
            }
            UiEvent::CurrentLocation => {
                self.request_current_location();
                Update::Nothing
            }
            UiEvent::Authorization(auth) => {
                self.authorization = Some(auth);
                match auth {
                    Authorization::WhenInUse => self.request_current_location(),
                    Authorization::Denied => warn!("location access denied"),
                }
                Update::Nothing
            }
            UiEvent::Locations { request, result } => {
                if request != self.location_request || self.location_task.is_none() {
                    debug!(request, current = self.location_request, "ignoring stale location result");
                    return Update::Nothing;
                }

                match result {
                    Ok(fixes) => self.on_locations(&fixes),
                    Err(e) => {
                        self.location_task = None;
                        error!(error = %e, "location lookup failed");
                    }
                }
                Update::Nothing
            }
            UiEvent::Weather(Ok(model)) => {
                info!(city = %model.city_name, temp = model.temperature, "weather updated");
                self.display = Some(DisplayState::from(model));
                Update::Display
            }
            UiEvent::Weather(Err(e)) => {
                error!(error = %e, "weather lookup failed");
                Update::Nothing
            }
            UiEvent::Quit => Update::Quit,
        }
    }

    /// Drive the screen until [`UiEvent::Quit`].
    ///
    /// `render` runs after each event that changed something visible.
    pub async fn run<R>(mut self, mut events: UnboundedReceiver<UiEvent>, mut render: R)
    where
        R: FnMut(&WeatherScreen, Update),
    {
        self.load();
        render(&self, Update::Display);

        while let Some(event) = events.recv().await {
            match self.handle(event) {
                Update::Quit => break,
                Update::Nothing => {}
                update => render(&self, update),
            }
        }

        self.stop_location_updates();
    }

    fn stop_location_updates(&mut self) {
        if let Some(task) = self.location_task.take() {
            task.abort();
        }
    }

    fn dispatch_city(&self, city: String) {
        let client = Arc::clone(&self.client);
        let ui = self.ui.clone();

        tokio::spawn(async move {
            let result = client.fetch_by_city(&city).await;
            post(&ui, UiEvent::Weather(result));
        });
    }

    fn dispatch_coordinate(&self, coord: Coordinate) {
        let client = Arc::clone(&self.client);
        let ui = self.ui.clone();

        tokio::spawn(async move {
            let result = client.fetch_by_coordinate(coord).await;
            post(&ui, UiEvent::Weather(result));
        });
    }
}

fn post(ui: &UiHandle, event: UiEvent) {
    if ui.send(event).is_err() {
        debug!("ui loop closed, dropping event");
    }
}
