//! `recbook` - CLI for recordbook
//!
//! This binary adds, shows, updates, deletes and lists client, airline and
//! flight records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;

use recordbook::cli::{AirlineCommand, Cli, Command, ConfigCommand, ListCommand, RecordCommand};
use recordbook::form::{self, AirlineForm, ClientForm, FlightForm, Form};
use recordbook::registry::{StoreState, StoreStats};
use recordbook::{
    init_logging, Airline, AirlineStore, Client, ClientStore, Config, Flight, FlightStore, Record,
    Registry, UpdateOutcome,
};

type Rec<S> = <<S as Entity>::Form as Form>::Record;
type Upd<S> = <Rec<S> as Record>::Update;

/// One record store as seen by the command handlers.
trait Entity: Sized {
    type Form: Form;

    /// Capitalised record name for messages.
    const LABEL: &'static str;

    /// Name of the identifier field.
    const ID_FIELD: &'static str;

    fn add(&self, record: Rec<Self>) -> recordbook::Result<Rec<Self>>;
    fn search(&self, id: u64) -> recordbook::Result<Option<Rec<Self>>>;
    fn update(&self, id: u64, update: &Upd<Self>) -> recordbook::Result<UpdateOutcome>;
    fn delete(&self, id: u64) -> recordbook::Result<bool>;
    fn load_all(&self) -> recordbook::Result<Vec<Rec<Self>>>;

    /// One-line description for listings.
    fn summary(record: &Rec<Self>) -> String;
}

fn found(found: bool) -> UpdateOutcome {
    if found {
        UpdateOutcome::Updated
    } else {
        UpdateOutcome::NotFound
    }
}

impl Entity for ClientStore {
    type Form = ClientForm;
    const LABEL: &'static str = "Client";
    const ID_FIELD: &'static str = "ID";

    fn add(&self, record: Client) -> recordbook::Result<Client> {
        ClientStore::add(self, record)
    }

    fn search(&self, id: u64) -> recordbook::Result<Option<Client>> {
        ClientStore::search(self, id)
    }

    fn update(
        &self,
        id: u64,
        update: &recordbook::ClientUpdate,
    ) -> recordbook::Result<UpdateOutcome> {
        ClientStore::update(self, id, update).map(found)
    }

    fn delete(&self, id: u64) -> recordbook::Result<bool> {
        ClientStore::delete(self, id)
    }

    fn load_all(&self) -> recordbook::Result<Vec<Client>> {
        ClientStore::load_all(self)
    }

    fn summary(client: &Client) -> String {
        format!("{} ({})", client.name, client.phone)
    }
}

impl Entity for AirlineStore {
    type Form = AirlineForm;
    const LABEL: &'static str = "Airline";
    const ID_FIELD: &'static str = "ID";

    fn add(&self, record: Airline) -> recordbook::Result<Airline> {
        AirlineStore::add(self, record)
    }

    fn search(&self, id: u64) -> recordbook::Result<Option<Airline>> {
        AirlineStore::search(self, id)
    }

    fn update(
        &self,
        id: u64,
        update: &recordbook::AirlineUpdate,
    ) -> recordbook::Result<UpdateOutcome> {
        AirlineStore::update(self, id, update)
    }

    fn delete(&self, id: u64) -> recordbook::Result<bool> {
        AirlineStore::delete(self, id)
    }

    fn load_all(&self) -> recordbook::Result<Vec<Airline>> {
        AirlineStore::load_all(self)
    }

    fn summary(airline: &Airline) -> String {
        airline.company_name.clone()
    }
}

impl Entity for FlightStore {
    type Form = FlightForm;
    const LABEL: &'static str = "Flight";
    const ID_FIELD: &'static str = "Flight_ID";

    fn add(&self, record: Flight) -> recordbook::Result<Flight> {
        FlightStore::add(self, record)
    }

    fn search(&self, id: u64) -> recordbook::Result<Option<Flight>> {
        FlightStore::search(self, id)
    }

    fn update(
        &self,
        id: u64,
        update: &recordbook::FlightUpdate,
    ) -> recordbook::Result<UpdateOutcome> {
        FlightStore::update(self, id, update).map(found)
    }

    fn delete(&self, id: u64) -> recordbook::Result<bool> {
        FlightStore::delete(self, id)
    }

    fn load_all(&self) -> recordbook::Result<Vec<Flight>> {
        FlightStore::load_all(self)
    }

    fn summary(flight: &Flight) -> String {
        format!(
            "client {} with airline {} at {}, {} -> {}",
            flight.client_id,
            flight.airline_id,
            flight.date_time,
            flight.start_city,
            flight.end_city
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    // These work even when the active configuration does not load
    match &cli.command {
        Command::Config(ConfigCommand::Path) => {
            println!("{}", Config::default_config_path().display());
            return Ok(ExitCode::SUCCESS);
        }
        Command::Config(ConfigCommand::Validate { file }) => {
            return Ok(handle_validate(file.clone().or(cli.config)));
        }
        _ => {}
    }

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    let registry = Registry::open(&config);

    match cli.command {
        Command::Client(cmd) => handle_record(&registry.clients, cmd),
        Command::Airline(AirlineCommand::Record(cmd)) => handle_record(&registry.airlines, cmd),
        Command::Airline(AirlineCommand::Find { name }) => handle_find(&registry.airlines, &name),
        Command::Flight(cmd) => handle_record(&registry.flights, cmd),
        Command::Status(status_cmd) => handle_status(&config, &registry, status_cmd.json),
        Command::Config(ConfigCommand::Show { json }) => handle_config_show(&config, json),
        Command::Config(ConfigCommand::Path | ConfigCommand::Validate { .. }) => {
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn not_found<S: Entity>() -> ExitCode {
    eprintln!("No {} found with the given ID.", S::LABEL.to_lowercase());
    ExitCode::FAILURE
}

fn handle_record<S: Entity>(store: &S, cmd: RecordCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        RecordCommand::Add { fields } => {
            let draft = <S::Form as Form>::draft(&form::parse_pairs(&fields)?)?;
            let record = store.add(draft)?;
            println!("{} record created with ID {}.", S::LABEL, record.id());
        }
        RecordCommand::Show { id, json } => {
            let id = form::parse_id(S::ID_FIELD, &id)?;
            let Some(record) = store.search(id)? else {
                return Ok(not_found::<S>());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_record::<S>(&record)?;
            }
        }
        RecordCommand::Update { id, fields } => {
            let id = form::parse_id(S::ID_FIELD, &id)?;
            let update = <S::Form as Form>::update(&form::parse_pairs(&fields)?)?;
            match store.update(id, &update)? {
                UpdateOutcome::Updated => println!("{} record updated.", S::LABEL),
                UpdateOutcome::Unchanged => println!("No changes detected."),
                UpdateOutcome::NotFound => return Ok(not_found::<S>()),
            }
        }
        RecordCommand::Delete { id } => {
            let id = form::parse_id(S::ID_FIELD, &id)?;
            if !store.delete(id)? {
                return Ok(not_found::<S>());
            }
            println!("{} record deleted.", S::LABEL);
        }
        RecordCommand::List(ListCommand { json }) => {
            let records = store.load_all()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No {} records.", S::LABEL.to_lowercase());
            } else {
                for record in &records {
                    println!("{:>5}  {}", record.id(), S::summary(record));
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_find(store: &AirlineStore, name: &str) -> anyhow::Result<ExitCode> {
    match store.search_by_name(name)? {
        Some(airline) => {
            print_record::<AirlineStore>(&airline)?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No airline found with the given company name.");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Print the identifier and then each form field in order.
fn print_record<S: Entity>(record: &Rec<S>) -> anyhow::Result<()> {
    let value = serde_json::to_value(record)?;
    println!("{:<15} {}", format!("{}:", S::ID_FIELD), record.id());
    for field in <S::Form as Form>::FIELDS {
        let text = match value.get(*field) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        println!("{:<15} {text}", format!("{field}:"));
    }
    Ok(())
}

fn print_store(label: &str, stats: &StoreStats) {
    let state = match stats.state {
        StoreState::Missing => "not created yet",
        StoreState::Ok => "ok",
        StoreState::Corrupt => "CORRUPT",
    };
    println!(
        "{label:<10} {} records, {} bytes, {state} ({})",
        stats.records,
        stats.size_bytes,
        stats.path.display()
    );
}

fn handle_status(config: &Config, registry: &Registry, json: bool) -> anyhow::Result<ExitCode> {
    let stats = registry.stats()?;
    if json {
        let status = serde_json::json!({
            "data_dir": config.data_dir(),
            "load_policy": config.storage.load_policy,
            "stores": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("recbook status");
        println!("--------------");
        println!("Data dir:  {}", config.data_dir().display());
        println!("Policy:    {:?}", config.storage.load_policy);
        println!();
        print_store("Clients:", &stats.clients);
        print_store("Airlines:", &stats.airlines);
        print_store("Flights:", &stats.flights);
        println!();
        println!("Total:     {} records", stats.total_records());
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config_show(config: &Config, json: bool) -> anyhow::Result<ExitCode> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("Current Configuration");
        println!("=====================");
        println!();
        println!("[Storage]");
        println!("  Data dir:                {}", config.data_dir().display());
        println!("  Clients:                 {}", config.clients_path().display());
        println!("  Airlines:                {}", config.airlines_path().display());
        println!("  Flights:                 {}", config.flights_path().display());
        println!("  Load policy:             {:?}", config.storage.load_policy);
        println!();
        println!("[Validation]");
        println!(
            "  Unique phone on update:  {}",
            config.validation.unique_phone_on_update
        );
        println!(
            "  Unique flight on update: {}",
            config.validation.unique_flight_on_update
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_validate(file: Option<std::path::PathBuf>) -> ExitCode {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => {
            println!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Configuration error: {e}");
            ExitCode::FAILURE
        }
    }
}
