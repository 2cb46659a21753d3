//! A helper program to create the `texts` and `recordings` tables.

use std::env;

use movine::Movine;
use postgres::{Client, NoTls};

use log::{debug, initialize_logger};

fn main() {
    dotenv::dotenv().ok();

    let logger = initialize_logger();
    let connection_string = env::var("VOICEBANK_DB_CONNECTION_STRING")
        .expect("could not read VOICEBANK_DB_CONNECTION_STRING");
    let migration_dir =
        env::var("VOICEBANK_MIGRATIONS_PATH").unwrap_or_else(|_| "./migrations".to_owned());

    debug!(logger, "Connecting to database..."; "migrations" => &migration_dir);

    let mut client =
        Client::connect(&connection_string, NoTls).expect("could not connect to database");

    let mut movine = Movine::new(&mut client);
    movine.set_migration_dir(&migration_dir);
    movine.set_strict(true);

    if movine.status().is_err() {
        debug!(logger, "Initializing movine...");
        movine.initialize().expect("failed to initialize movine")
    }

    debug!(logger, "Running migrations...");
    movine.up().expect("failed to run migrations");

    debug!(logger, "Completed initialization.");
}
