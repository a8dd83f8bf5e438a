//! The country -> city -> servers table the selector offers choices from.
//!
//! Tables are built from YAML documents shaped as a mapping of mappings of
//! sequences. Source order is kept at every level and the whole table is
//! validated once, when it is built, so later lookups never have to guess
//! what an empty collection means.

use std::collections::HashSet;
use std::fmt::Formatter;
use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::dispatch::server_identifier;
use crate::error::{Error, Result};
use crate::selection::Level;

/// Servers of a single city, in source order.
pub type Servers = Vec<String>;

/// A mapping that keeps source order and rejects repeated keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKeyMap<V>(pub IndexMap<String, V>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for UniqueKeyMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct UniqueKeyVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueKeyVisitor<V> {
            type Value = UniqueKeyMap<V>;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("a mapping with unique keys")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    if entries.contains_key(&key) {
                        return Err(serde::de::Error::custom(format!("duplicate key `{key}`")));
                    }
                    entries.insert(key, value);
                }
                Ok(UniqueKeyMap(entries))
            }
        }

        deserializer.deserialize_map(UniqueKeyVisitor(PhantomData))
    }
}

/// Shape of the location document before validation.
pub type RawLocationTable = UniqueKeyMap<UniqueKeyMap<Servers>>;

/// Validated, immutable location table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationTable {
    countries: IndexMap<String, IndexMap<String, Servers>>,
}

impl LocationTable {
    /// Builds a table from nested entries, validating every level.
    ///
    /// `source` names where the entries came from and only shows up in errors.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - there are no countries
    /// - a country has no cities or a city has no servers
    /// - a country, city or server name is blank
    /// - a server descriptor has no identifier, or its identifier contains
    ///   characters a relay hostname never has
    /// - a server appears twice in the same city
    pub fn from_entries(
        countries: IndexMap<String, IndexMap<String, Servers>>,
        source: &str,
    ) -> Result<Self> {
        if countries.is_empty() {
            return Err(Error::empty_location_table(source.to_string()));
        }

        for (country, cities) in &countries {
            validate_name(country, Level::Country)?;

            if cities.is_empty() {
                return Err(Error::EmptyCountry(country.clone()));
            }

            for (city, servers) in cities {
                validate_name(city, Level::City)?;
                validate_servers(country, city, servers)?;
            }
        }

        Ok(Self { countries })
    }

    pub(crate) fn from_raw(raw: RawLocationTable, source: &str) -> Result<Self> {
        let countries = raw
            .0
            .into_iter()
            .map(|(country, cities)| (country, cities.0))
            .collect();

        Self::from_entries(countries, source)
    }

    /// Country names in table order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    /// City names of `country` in table order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCountry`] if the country is not in the table.
    pub fn cities(&self, country: &str) -> Result<impl Iterator<Item = &str>> {
        let cities = self
            .countries
            .get(country)
            .ok_or_else(|| Error::UnknownCountry(country.to_string()))?;

        Ok(cities.keys().map(String::as_str))
    }

    /// Server descriptors of `city` in `country`, in table order.
    ///
    /// # Errors
    ///
    /// Returns an error if the country or the city is not in the table.
    pub fn servers(&self, country: &str, city: &str) -> Result<&[String]> {
        let cities = self
            .countries
            .get(country)
            .ok_or_else(|| Error::UnknownCountry(country.to_string()))?;

        cities
            .get(city)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnknownCity(country.to_string(), city.to_string()))
    }

    #[must_use]
    pub fn contains_country(&self, country: &str) -> bool {
        self.countries.contains_key(country)
    }

    #[must_use]
    pub fn contains_server(&self, country: &str, city: &str, descriptor: &str) -> bool {
        self.servers(country, city)
            .is_ok_and(|servers| servers.iter().any(|s| s == descriptor))
    }

    #[must_use]
    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    /// Total number of servers across every city.
    #[must_use]
    pub fn server_count(&self) -> usize {
        self.countries
            .values()
            .flat_map(IndexMap::values)
            .map(Vec::len)
            .sum()
    }
}

fn validate_name(name: &str, level: Level) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::EmptyName(level));
    }

    Ok(())
}

fn validate_identifier(identifier: &str) -> Result<()> {
    let is_valid = identifier
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if !is_valid {
        return Err(Error::InvalidIdentifier(identifier.to_string()));
    }

    Ok(())
}

fn validate_servers(country: &str, city: &str, servers: &[String]) -> Result<()> {
    if servers.is_empty() {
        return Err(Error::EmptyCity(country.to_string(), city.to_string()));
    }

    let mut seen = HashSet::new();
    for descriptor in servers {
        validate_name(descriptor, Level::Server)?;
        validate_identifier(server_identifier(descriptor)?)?;

        if !seen.insert(descriptor.as_str()) {
            return Err(Error::DuplicateServer(
                country.to_string(),
                city.to_string(),
                descriptor.clone(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(
        countries: &[(&str, &[(&str, &[&str])])],
    ) -> IndexMap<String, IndexMap<String, Servers>> {
        countries
            .iter()
            .map(|(country, cities)| {
                let cities = cities
                    .iter()
                    .map(|(city, servers)| {
                        let servers = servers.iter().map(ToString::to_string).collect();
                        (city.to_string(), servers)
                    })
                    .collect();
                (country.to_string(), cities)
            })
            .collect()
    }

    fn create_test_table() -> LocationTable {
        LocationTable::from_entries(
            entries(&[
                (
                    "Sweden",
                    &[
                        ("Stockholm", &["se-sto-001 (Stockholm)", "se-sto-002 (Stockholm)"]),
                        ("Malmö", &["se-mma-001 (Malmö)"]),
                    ],
                ),
                ("Germany", &[("Berlin", &["de-ber-001 (Berlin)"])]),
            ]),
            "test",
        )
        .unwrap()
    }

    #[test]
    fn test_countries_keep_table_order() {
        let table = create_test_table();
        assert_eq!(table.countries().collect::<Vec<_>>(), ["Sweden", "Germany"]);
    }

    #[test]
    fn test_cities_keep_table_order() {
        let table = create_test_table();
        let cities: Vec<_> = table.cities("Sweden").unwrap().collect();
        assert_eq!(cities, ["Stockholm", "Malmö"]);
    }

    #[test]
    fn test_cities_unknown_country() {
        let table = create_test_table();
        let result = table.cities("Atlantis").map(Iterator::count);
        assert!(matches!(result, Err(Error::UnknownCountry(_))));
    }

    #[test]
    fn test_servers_lookup() {
        let table = create_test_table();
        assert_eq!(
            table.servers("Sweden", "Stockholm").unwrap(),
            ["se-sto-001 (Stockholm)", "se-sto-002 (Stockholm)"]
        );
        assert!(matches!(
            table.servers("Sweden", "Berlin"),
            Err(Error::UnknownCity(_, _))
        ));
        assert!(matches!(
            table.servers("Norway", "Oslo"),
            Err(Error::UnknownCountry(_))
        ));
    }

    #[test]
    fn test_contains_server() {
        let table = create_test_table();
        assert!(table.contains_server("Germany", "Berlin", "de-ber-001 (Berlin)"));
        assert!(!table.contains_server("Germany", "Berlin", "se-sto-001 (Stockholm)"));
        assert!(!table.contains_server("Germany", "Hamburg", "de-ber-001 (Berlin)"));
    }

    #[test]
    fn test_counts() {
        let table = create_test_table();
        assert_eq!(table.country_count(), 2);
        assert_eq!(table.server_count(), 4);
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let result = LocationTable::from_entries(IndexMap::new(), "empty.yml");
        assert!(matches!(result, Err(Error::EmptyLocationTable { .. })));
    }

    #[test]
    fn test_country_without_cities_is_rejected() {
        let result = LocationTable::from_entries(entries(&[("Sweden", &[])]), "test");
        assert!(matches!(result, Err(Error::EmptyCountry(_))));
    }

    #[test]
    fn test_city_without_servers_is_rejected() {
        let result =
            LocationTable::from_entries(entries(&[("Sweden", &[("Stockholm", &[])])]), "test");
        assert!(matches!(result, Err(Error::EmptyCity(_, _))));
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let result = LocationTable::from_entries(
            entries(&[(" ", &[("Stockholm", &["se-sto-001"])])]),
            "test",
        );
        assert!(matches!(result, Err(Error::EmptyName(Level::Country))));

        let result =
            LocationTable::from_entries(entries(&[("Sweden", &[("", &["se-sto-001"])])]), "test");
        assert!(matches!(result, Err(Error::EmptyName(Level::City))));

        let result =
            LocationTable::from_entries(entries(&[("Sweden", &[("Stockholm", &["  "])])]), "test");
        assert!(matches!(result, Err(Error::EmptyName(Level::Server))));
    }

    #[test]
    fn test_identifier_with_shell_characters_is_rejected() {
        let result = LocationTable::from_entries(
            entries(&[("Sweden", &[("Stockholm", &["se-sto-001;reboot (Stockholm)"])])]),
            "test",
        );
        assert!(matches!(result, Err(Error::InvalidIdentifier(_))));
    }

    #[test]
    fn test_duplicate_server_is_rejected() {
        let result = LocationTable::from_entries(
            entries(&[(
                "Sweden",
                &[("Stockholm", &["se-sto-001 (Stockholm)", "se-sto-001 (Stockholm)"])],
            )]),
            "test",
        );
        assert!(matches!(result, Err(Error::DuplicateServer(_, _, _))));
    }

    #[test]
    fn test_unique_key_map_rejects_duplicates() {
        let yaml = "a: 1\nb: 2\na: 3\n";
        let result: serde_yaml::Result<UniqueKeyMap<u8>> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_unique_key_map_keeps_order() {
        let yaml = "zulu: 1\nalpha: 2\nmike: 3\n";
        let map: UniqueKeyMap<u8> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(map.0.keys().collect::<Vec<_>>(), ["zulu", "alpha", "mike"]);
    }
}
