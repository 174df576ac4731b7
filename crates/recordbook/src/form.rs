//! Conversion of raw text input into typed records.
//!
//! Raw input is a map from on-disk field names (`"Zip Code"`, `"Date/Time"`)
//! to strings, as collected by a form or by `Key=Value` arguments on the
//! command line. Conversion fails early on unknown keys, missing required
//! fields and non-numeric identifiers; format and uniqueness rules are left
//! to the stores.

use std::collections::BTreeMap;

use crate::airline::{Airline, AirlineUpdate};
use crate::client::{Client, ClientUpdate};
use crate::error::{Error, Result};
use crate::flight::{Flight, FlightUpdate};
use crate::record::Record;

/// Raw field values keyed by on-disk field name.
pub type RawFields = BTreeMap<String, String>;

/// Convert a raw identifier, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if `raw` is blank or not a
/// non-negative integer.
pub fn parse_id(field: &str, raw: &str) -> Result<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::malformed(field, "cannot be empty"));
    }
    raw.parse()
        .map_err(|_| Error::malformed(field, "must be numeric"))
}

/// Collect `Key=Value` pairs into raw fields. Later keys win.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] for a pair without `=`.
pub fn parse_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<RawFields> {
    pairs
        .iter()
        .map(|pair| {
            let pair = pair.as_ref();
            pair.split_once('=')
                .map(|(key, value)| (key.trim().to_string(), value.to_string()))
                .ok_or_else(|| Error::malformed(pair, "is not in Key=Value form"))
        })
        .collect()
}

/// A converter from raw fields to one record type.
pub trait Form {
    /// The record type produced.
    type Record: Record;

    /// Every accepted key, in display order.
    const FIELDS: &'static [&'static str];

    /// Build a record for create. Its identifier is left at 0.
    ///
    /// # Errors
    ///
    /// Returns an input error for unknown keys, missing required fields or
    /// malformed values.
    fn draft(fields: &RawFields) -> Result<Self::Record>;

    /// Build a partial update holding only the supplied keys.
    ///
    /// # Errors
    ///
    /// Returns an input error for unknown keys or malformed values.
    fn update(fields: &RawFields) -> Result<<Self::Record as Record>::Update>;
}

fn reject_unknown(fields: &RawFields, known: &[&str]) -> Result<()> {
    match fields.keys().find(|k| !known.contains(&k.as_str())) {
        Some(field) => Err(Error::UnknownField {
            field: field.clone(),
        }),
        None => Ok(()),
    }
}

fn required<'a>(fields: &'a RawFields, field: &'static str) -> Result<&'a str> {
    fields
        .get(field)
        .map(String::as_str)
        .ok_or(Error::MissingField { field })
}

fn text(fields: &RawFields, field: &str) -> Option<String> {
    fields.get(field).cloned()
}

fn number(fields: &RawFields, field: &str) -> Result<Option<u64>> {
    fields.get(field).map(|raw| parse_id(field, raw)).transpose()
}

fn company_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::malformed(AirlineForm::COMPANY_NAME, "cannot be empty"));
    }
    Ok(name.to_string())
}

/// Raw input for clients.
#[derive(Debug, Clone, Copy)]
pub struct ClientForm;

impl Form for ClientForm {
    type Record = Client;

    const FIELDS: &'static [&'static str] = &[
        "Name",
        "Address Line 1",
        "Address Line 2",
        "Address Line 3",
        "City",
        "State",
        "Zip Code",
        "Country",
        "Phone Number",
    ];

    fn draft(fields: &RawFields) -> Result<Client> {
        reject_unknown(fields, Self::FIELDS)?;
        let name = required(fields, "Name")?.to_string();
        let phone = required(fields, "Phone Number")?.to_string();
        let update = Self::update(fields)?;

        let mut client = Client {
            name,
            phone,
            ..Client::default()
        };
        client.apply(&update);
        Ok(client)
    }

    fn update(fields: &RawFields) -> Result<ClientUpdate> {
        reject_unknown(fields, Self::FIELDS)?;
        Ok(ClientUpdate {
            name: text(fields, "Name"),
            address_line1: text(fields, "Address Line 1"),
            address_line2: text(fields, "Address Line 2"),
            address_line3: text(fields, "Address Line 3"),
            city: text(fields, "City"),
            state: text(fields, "State"),
            zip_code: text(fields, "Zip Code"),
            country: text(fields, "Country"),
            phone: text(fields, "Phone Number"),
        })
    }
}

/// Raw input for airlines.
#[derive(Debug, Clone, Copy)]
pub struct AirlineForm;

impl AirlineForm {
    const COMPANY_NAME: &'static str = "Company Name";
}

impl Form for AirlineForm {
    type Record = Airline;

    const FIELDS: &'static [&'static str] = &[Self::COMPANY_NAME];

    fn draft(fields: &RawFields) -> Result<Airline> {
        reject_unknown(fields, Self::FIELDS)?;
        let name = company_name(required(fields, Self::COMPANY_NAME)?)?;
        Ok(Airline::new(0, name))
    }

    fn update(fields: &RawFields) -> Result<AirlineUpdate> {
        reject_unknown(fields, Self::FIELDS)?;
        Ok(AirlineUpdate {
            company_name: fields
                .get(Self::COMPANY_NAME)
                .map(|raw| company_name(raw))
                .transpose()?,
        })
    }
}

/// Raw input for flights.
#[derive(Debug, Clone, Copy)]
pub struct FlightForm;

impl Form for FlightForm {
    type Record = Flight;

    const FIELDS: &'static [&'static str] = &[
        "Client_ID",
        "Airline_ID",
        "Date/Time",
        "Start City",
        "End City",
    ];

    fn draft(fields: &RawFields) -> Result<Flight> {
        reject_unknown(fields, Self::FIELDS)?;
        let client_id = parse_id("Client_ID", required(fields, "Client_ID")?)?;
        let airline_id = parse_id("Airline_ID", required(fields, "Airline_ID")?)?;
        let date_time = required(fields, "Date/Time")?.trim().to_string();

        Ok(Flight {
            flight_id: 0,
            client_id,
            airline_id,
            date_time,
            start_city: text(fields, "Start City").unwrap_or_default(),
            end_city: text(fields, "End City").unwrap_or_default(),
        })
    }

    fn update(fields: &RawFields) -> Result<FlightUpdate> {
        reject_unknown(fields, Self::FIELDS)?;
        Ok(FlightUpdate {
            client_id: number(fields, "Client_ID")?,
            airline_id: number(fields, "Airline_ID")?,
            date_time: fields.get("Date/Time").map(|raw| raw.trim().to_string()),
            start_city: text(fields, "Start City"),
            end_city: text(fields, "End City"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawFields {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("ID", " 42 ").unwrap(), 42);

        let err = parse_id("ID", "abc").unwrap_err();
        assert!(err.is_input_error());
        assert_eq!(err.to_string(), "ID must be numeric");

        let err = parse_id("ID", "  ").unwrap_err();
        assert_eq!(err.to_string(), "ID cannot be empty");

        assert!(parse_id("ID", "-1").is_err());
    }

    #[test]
    fn test_parse_pairs() {
        let fields = parse_pairs(&["Name=John Doe", "Zip Code=60601", "Note=a=b"]).unwrap();
        assert_eq!(fields["Name"], "John Doe");
        assert_eq!(fields["Zip Code"], "60601");
        assert_eq!(fields["Note"], "a=b");

        let err = parse_pairs(&["Name"]).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }

    #[test]
    fn test_client_draft() {
        let fields = raw(&[
            ("Name", "John Doe"),
            ("City", "Chicago"),
            ("Phone Number", "1-773-5435432"),
        ]);
        let client = ClientForm::draft(&fields).unwrap();
        assert_eq!(client.id, 0);
        assert_eq!(client.name, "John Doe");
        assert_eq!(client.city, "Chicago");
        assert_eq!(client.address_line2, "");
        assert_eq!(client.phone, "1-773-5435432");
    }

    #[test]
    fn test_client_draft_requires_phone() {
        let err = ClientForm::draft(&raw(&[("Name", "John Doe")])).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                field: "Phone Number"
            }
        ));
    }

    #[test]
    fn test_client_update_only_supplied_keys() {
        let update = ClientForm::update(&raw(&[("City", "X")])).unwrap();
        assert_eq!(
            update,
            ClientUpdate {
                city: Some("X".to_string()),
                ..ClientUpdate::default()
            }
        );
    }

    #[test]
    fn test_unknown_field() {
        let err = ClientForm::update(&raw(&[("Zip", "60601")])).unwrap_err();
        assert!(matches!(err, Error::UnknownField { ref field } if field == "Zip"));
    }

    #[test]
    fn test_airline_name_is_trimmed() {
        let airline = AirlineForm::draft(&raw(&[("Company Name", "  Delta ")])).unwrap();
        assert_eq!(airline.company_name, "Delta");

        let err = AirlineForm::update(&raw(&[("Company Name", "   ")])).unwrap_err();
        assert_eq!(err.to_string(), "Company Name cannot be empty");

        let update = AirlineForm::update(&RawFields::new()).unwrap();
        assert_eq!(update, AirlineUpdate::default());
    }

    #[test]
    fn test_flight_draft() {
        let fields = raw(&[
            ("Client_ID", "101"),
            ("Airline_ID", "201"),
            ("Date/Time", "2023-12-15 12:00"),
            ("Start City", "New York"),
        ]);
        let flight = FlightForm::draft(&fields).unwrap();
        assert_eq!(flight.client_id, 101);
        assert_eq!(flight.airline_id, 201);
        assert_eq!(flight.start_city, "New York");
        assert_eq!(flight.end_city, "");
    }

    #[test]
    fn test_flight_non_numeric_ids() {
        let fields = raw(&[
            ("Client_ID", "abc"),
            ("Airline_ID", "201"),
            ("Date/Time", "2023-12-15 12:00"),
        ]);
        let err = FlightForm::draft(&fields).unwrap_err();
        assert_eq!(err.to_string(), "Client_ID must be numeric");

        let err = FlightForm::update(&raw(&[("Airline_ID", "x")])).unwrap_err();
        assert_eq!(err.to_string(), "Airline_ID must be numeric");
    }

    #[test]
    fn test_flight_update() {
        let update = FlightForm::update(&raw(&[("Date/Time", "2024-01-01 08:00")])).unwrap();
        assert_eq!(update.date_time.as_deref(), Some("2024-01-01 08:00"));
        assert!(update.client_id.is_none());
    }
}
