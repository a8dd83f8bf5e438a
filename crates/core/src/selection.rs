//! Cascading country -> city -> server selection.
//!
//! A [`CascadingSelector`] owns the location table, the three choice lists and
//! the current [`SelectionState`]. Front-ends never touch the state directly:
//! every user action becomes a [`SelectionEvent`] handed to
//! [`CascadingSelector::apply`], which repopulates and resets the levels below
//! the one that changed.

use std::fmt::{Display, Formatter};

use log::debug;

use crate::error::{Error, Result};
use crate::locations::LocationTable;

/// One of the three selection levels, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Country,
    City,
    Server,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Country, Level::City, Level::Server];

    /// Column heading shown by the front-ends.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Level::Country => "Country",
            Level::City => "City",
            Level::Server => "Server",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Country => f.write_str("country"),
            Level::City => f.write_str("city"),
            Level::Server => f.write_str("server"),
        }
    }
}

/// An ordered single-choice list.
///
/// At most one item is active at a time; activating an item deactivates the
/// previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceList {
    items: Vec<String>,
    active: Option<usize>,
}

impl ChoiceList {
    fn repopulate<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self.active = None;
    }

    fn clear(&mut self) {
        self.items.clear();
        self.active = None;
    }

    fn activate(&mut self, item: &str) -> bool {
        match self.items.iter().position(|i| i == item) {
            Some(index) => {
                self.active = Some(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn active_item(&self) -> Option<&str> {
        self.active.map(|i| self.items[i].as_str())
    }

    #[must_use]
    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The chosen country, city and server; any of them may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub country: Option<String>,
    pub city: Option<String>,
    pub server: Option<String>,
}

impl SelectionState {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_levels().is_empty()
    }

    /// Unset levels, top to bottom.
    #[must_use]
    pub fn missing_levels(&self) -> Vec<Level> {
        let fields = [&self.country, &self.city, &self.server];

        Level::ALL
            .into_iter()
            .zip(fields)
            .filter_map(|(level, value)| value.is_none().then_some(level))
            .collect()
    }
}

impl Display for SelectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts = [&self.country, &self.city, &self.server];
        let shown: Vec<&str> = parts
            .iter()
            .map(|p| p.as_deref().unwrap_or("-"))
            .collect();
        f.write_str(&shown.join(" / "))
    }
}

/// A single user action on one of the lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    CountrySelected(String),
    CitySelected(String),
    ServerSelected(String),
}

impl SelectionEvent {
    /// Builds the event for picking `item` in the list at `level`.
    #[must_use]
    pub fn for_level(level: Level, item: String) -> Self {
        match level {
            Level::Country => SelectionEvent::CountrySelected(item),
            Level::City => SelectionEvent::CitySelected(item),
            Level::Server => SelectionEvent::ServerSelected(item),
        }
    }

    #[must_use]
    pub fn level(&self) -> Level {
        match self {
            SelectionEvent::CountrySelected(_) => Level::Country,
            SelectionEvent::CitySelected(_) => Level::City,
            SelectionEvent::ServerSelected(_) => Level::Server,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CascadingSelector {
    table: LocationTable,
    countries: ChoiceList,
    cities: ChoiceList,
    servers: ChoiceList,
    state: SelectionState,
}

impl CascadingSelector {
    /// Creates a selector with the country list populated and nothing chosen.
    #[must_use]
    pub fn new(table: LocationTable) -> Self {
        let mut selector = Self {
            table,
            countries: ChoiceList::default(),
            cities: ChoiceList::default(),
            servers: ChoiceList::default(),
            state: SelectionState::default(),
        };
        selector.initialize();
        selector
    }

    /// Repopulates the country list from the table and resets every level.
    pub fn initialize(&mut self) {
        self.countries.repopulate(self.table.countries());
        self.cities.clear();
        self.servers.clear();
        self.state = SelectionState::default();
    }

    /// Routes a user action to the matching selection operation.
    ///
    /// # Errors
    ///
    /// Propagates the error of the operation the event maps to.
    pub fn apply(&mut self, event: SelectionEvent) -> Result<()> {
        match event {
            SelectionEvent::CountrySelected(name) => self.select_country(&name),
            SelectionEvent::CitySelected(name) => self.select_city(&name),
            SelectionEvent::ServerSelected(descriptor) => self.select_server(&descriptor),
        }
    }

    /// Chooses a country, repopulating the cities and clearing city and server.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCountry`] if `name` is not in the table. The
    /// selection is left untouched in that case.
    pub fn select_country(&mut self, name: &str) -> Result<()> {
        let cities = self.table.cities(name)?;
        self.cities.repopulate(cities);
        self.servers.clear();

        self.countries.activate(name);
        self.state = SelectionState {
            country: Some(name.to_string()),
            city: None,
            server: None,
        };

        debug!("Selected country `{name}`, {} cities", self.cities.len());
        Ok(())
    }

    /// Chooses a city of the current country, repopulating the servers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCountrySelected`] if no country is chosen yet, or
    /// [`Error::UnknownCity`] if `name` is not a city of the chosen country.
    pub fn select_city(&mut self, name: &str) -> Result<()> {
        let country = self.state.country.as_deref().ok_or(Error::NoCountrySelected)?;
        let servers = self.table.servers(country, name)?;

        self.servers.repopulate(servers.iter().map(String::as_str));
        self.cities.activate(name);
        self.state.city = Some(name.to_string());
        self.state.server = None;

        debug!("Selected city `{name}`, {} servers", self.servers.len());
        Ok(())
    }

    /// Chooses one of the servers currently listed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCitySelected`] if no city is chosen yet, or
    /// [`Error::UnknownServer`] if `descriptor` is not in the server list.
    pub fn select_server(&mut self, descriptor: &str) -> Result<()> {
        let city = self.state.city.as_deref().ok_or(Error::NoCitySelected)?;

        if !self.servers.activate(descriptor) {
            return Err(Error::UnknownServer(
                city.to_string(),
                descriptor.to_string(),
            ));
        }
        self.state.server = Some(descriptor.to_string());

        debug!("Selected server `{descriptor}`");
        Ok(())
    }

    #[must_use]
    pub fn current_selection(&self) -> &SelectionState {
        &self.state
    }

    #[must_use]
    pub fn list(&self, level: Level) -> &ChoiceList {
        match level {
            Level::Country => &self.countries,
            Level::City => &self.cities,
            Level::Server => &self.servers,
        }
    }

    #[must_use]
    pub fn table(&self) -> &LocationTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_handling::parse_location_table;

    const TEST_LOCATIONS: &str = r#"
Sweden:
  Stockholm:
    - se-sto-001 (Stockholm)
    - se-sto-002 (Stockholm)
  Gothenburg:
    - se-got-001 (Gothenburg)
Germany:
  Berlin:
    - de-ber-001 (Berlin)
  Frankfurt:
    - de-fra-001 (Frankfurt)
    - de-fra-002 (Frankfurt)
USA:
  Berlin:
    - us-ber-001 (Berlin, NH)
"#;

    fn create_test_selector() -> CascadingSelector {
        CascadingSelector::new(parse_location_table(TEST_LOCATIONS, "test").unwrap())
    }

    #[test]
    fn test_initialize_populates_countries_in_order() {
        let selector = create_test_selector();
        assert_eq!(
            selector.list(Level::Country).items(),
            ["Sweden", "Germany", "USA"]
        );
        assert!(selector.list(Level::City).is_empty());
        assert!(selector.list(Level::Server).is_empty());
        assert_eq!(selector.current_selection(), &SelectionState::default());
    }

    #[test]
    fn test_initialize_resets_selection() {
        let mut selector = create_test_selector();
        selector.select_country("Sweden").unwrap();
        selector.select_city("Stockholm").unwrap();

        selector.initialize();

        assert_eq!(selector.current_selection(), &SelectionState::default());
        assert_eq!(selector.list(Level::Country).active_index(), None);
        assert!(selector.list(Level::City).is_empty());
    }

    #[test]
    fn test_every_country_populates_its_cities() {
        let mut selector = create_test_selector();
        let table = selector.table().clone();

        for country in table.countries() {
            selector.select_country(country).unwrap();
            let expected: Vec<&str> = table.cities(country).unwrap().collect();
            assert_eq!(selector.list(Level::City).items(), expected.as_slice());
            assert_eq!(selector.current_selection().city, None);
            assert_eq!(selector.current_selection().server, None);
            assert!(selector.list(Level::Server).is_empty());
        }
    }

    #[test]
    fn test_every_city_populates_its_servers() {
        let mut selector = create_test_selector();
        let table = selector.table().clone();

        for country in table.countries() {
            for city in table.cities(country).unwrap() {
                selector.select_country(country).unwrap();
                selector.select_city(city).unwrap();
                assert_eq!(
                    selector.list(Level::Server).items(),
                    table.servers(country, city).unwrap()
                );
                assert_eq!(selector.current_selection().server, None);
            }
        }
    }

    #[test]
    fn test_select_city_clears_server() {
        let mut selector = create_test_selector();
        selector.select_country("Germany").unwrap();
        selector.select_city("Frankfurt").unwrap();
        selector.select_server("de-fra-002 (Frankfurt)").unwrap();

        selector.select_city("Berlin").unwrap();

        assert_eq!(selector.current_selection().server, None);
        assert_eq!(selector.list(Level::Server).active_index(), None);
        assert_eq!(selector.list(Level::Server).items(), ["de-ber-001 (Berlin)"]);
    }

    #[test]
    fn test_same_list_selection_is_mutually_exclusive() {
        let mut selector = create_test_selector();

        selector.select_country("Sweden").unwrap();
        selector.select_country("Germany").unwrap();
        assert_eq!(selector.list(Level::Country).active_item(), Some("Germany"));
        assert!(!selector.list(Level::Country).is_active(0));

        selector.select_city("Berlin").unwrap();
        selector.select_city("Frankfurt").unwrap();
        assert_eq!(selector.list(Level::City).active_item(), Some("Frankfurt"));

        selector.select_server("de-fra-001 (Frankfurt)").unwrap();
        selector.select_server("de-fra-002 (Frankfurt)").unwrap();
        let servers = selector.list(Level::Server);
        assert_eq!(servers.active_index(), Some(1));
        assert!(!servers.is_active(0));
    }

    #[test]
    fn test_levels_are_independent() {
        let mut selector = create_test_selector();
        selector.select_country("Germany").unwrap();
        selector.select_city("Frankfurt").unwrap();
        selector.select_server("de-fra-001 (Frankfurt)").unwrap();

        assert_eq!(selector.list(Level::Country).active_item(), Some("Germany"));
        assert_eq!(selector.list(Level::City).active_item(), Some("Frankfurt"));
        assert_eq!(
            selector.list(Level::Server).active_item(),
            Some("de-fra-001 (Frankfurt)")
        );
        assert!(selector.current_selection().is_complete());
    }

    #[test]
    fn test_country_change_drops_stale_server_even_with_shared_city_name() {
        let mut selector = create_test_selector();
        selector.select_country("Germany").unwrap();
        selector.select_city("Berlin").unwrap();
        selector.select_server("de-ber-001 (Berlin)").unwrap();

        selector.select_country("USA").unwrap();

        let state = selector.current_selection();
        assert_eq!(state.country.as_deref(), Some("USA"));
        assert_eq!(state.city, None);
        assert_eq!(state.server, None);
        assert_eq!(selector.list(Level::City).active_index(), None);
        assert!(selector.list(Level::Server).is_empty());

        selector.select_city("Berlin").unwrap();
        assert_eq!(
            selector.list(Level::Server).items(),
            ["us-ber-001 (Berlin, NH)"]
        );
        assert!(selector.select_server("de-ber-001 (Berlin)").is_err());
    }

    #[test]
    fn test_reselecting_same_country_resets_downstream() {
        let mut selector = create_test_selector();
        selector.select_country("Sweden").unwrap();
        selector.select_city("Stockholm").unwrap();
        selector.select_server("se-sto-001 (Stockholm)").unwrap();

        selector.select_country("Sweden").unwrap();

        assert_eq!(selector.current_selection().city, None);
        assert_eq!(selector.current_selection().server, None);
    }

    #[test]
    fn test_unknown_country_fails_fast_and_keeps_state() {
        let mut selector = create_test_selector();
        selector.select_country("Sweden").unwrap();
        selector.select_city("Stockholm").unwrap();
        let before = selector.clone();

        let result = selector.select_country("Atlantis");

        assert!(matches!(result, Err(Error::UnknownCountry(_))));
        assert_eq!(selector.current_selection(), before.current_selection());
        assert_eq!(selector.list(Level::City), before.list(Level::City));
    }

    #[test]
    fn test_city_requires_country() {
        let mut selector = create_test_selector();
        let result = selector.select_city("Stockholm");
        assert!(matches!(result, Err(Error::NoCountrySelected)));
    }

    #[test]
    fn test_city_must_belong_to_country() {
        let mut selector = create_test_selector();
        selector.select_country("Sweden").unwrap();
        let result = selector.select_city("Frankfurt");
        assert!(matches!(result, Err(Error::UnknownCity(_, _))));
    }

    #[test]
    fn test_server_requires_city() {
        let mut selector = create_test_selector();
        selector.select_country("Sweden").unwrap();
        let result = selector.select_server("se-sto-001 (Stockholm)");
        assert!(matches!(result, Err(Error::NoCitySelected)));
    }

    #[test]
    fn test_server_must_be_listed() {
        let mut selector = create_test_selector();
        selector.select_country("Sweden").unwrap();
        selector.select_city("Gothenburg").unwrap();
        let result = selector.select_server("se-sto-001 (Stockholm)");
        assert!(matches!(result, Err(Error::UnknownServer(_, _))));
        assert_eq!(selector.current_selection().server, None);
    }

    #[test]
    fn test_apply_routes_events() {
        let mut selector = create_test_selector();
        let events = [
            SelectionEvent::CountrySelected("Sweden".to_string()),
            SelectionEvent::CitySelected("Stockholm".to_string()),
            SelectionEvent::ServerSelected("se-sto-002 (Stockholm)".to_string()),
        ];

        for event in events {
            selector.apply(event).unwrap();
        }

        assert_eq!(
            selector.current_selection(),
            &SelectionState {
                country: Some("Sweden".to_string()),
                city: Some("Stockholm".to_string()),
                server: Some("se-sto-002 (Stockholm)".to_string()),
            }
        );
    }

    #[test]
    fn test_event_for_level() {
        let event = SelectionEvent::for_level(Level::City, "Berlin".to_string());
        assert_eq!(event, SelectionEvent::CitySelected("Berlin".to_string()));
        assert_eq!(event.level(), Level::City);
    }

    #[test]
    fn test_missing_levels() {
        let state = SelectionState {
            country: Some("Sweden".to_string()),
            city: None,
            server: None,
        };
        assert_eq!(state.missing_levels(), [Level::City, Level::Server]);
        assert!(!state.is_complete());
        assert_eq!(SelectionState::default().missing_levels(), Level::ALL);
    }

    #[test]
    fn test_selection_state_display() {
        let state = SelectionState {
            country: Some("Sweden".to_string()),
            city: Some("Stockholm".to_string()),
            server: None,
        };
        assert_eq!(state.to_string(), "Sweden / Stockholm / -");
    }

    #[test]
    fn test_level_display_and_title() {
        assert_eq!(Level::Country.to_string(), "country");
        assert_eq!(Level::Server.title(), "Server");
    }
}
