use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use dotenv::dotenv;
use log::{debug, info, initialize_logger};
use structopt::StructOpt;

use voicebank::assignment::AssignmentService;
use voicebank::config::get_variable;
use voicebank::db::PgDb;
use voicebank::io::parse_text_rows;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "import-texts",
    about = "Import prompt texts from CSV files, one text per row"
)]
struct Opt {
    /// The CSV files to import; only the first column of each row is read
    #[structopt(parse(from_os_str), required = true)]
    files: Vec<PathBuf>,

    /// Parse the files and report what would be imported without writing anything
    #[structopt(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let opt = Opt::from_args();

    let logger = Arc::new(initialize_logger());

    let mut texts = vec![];

    for path in &opt.files {
        let raw = fs::read(path)?;
        let rows = parse_text_rows(&raw)?;

        debug!(logger, "Parsed file"; "path" => %path.display(), "rows" => rows.len());
        texts.extend(rows);
    }

    if opt.dry_run {
        info!(logger, "Would import {} texts", texts.len());
        return Ok(());
    }

    let connection_string = get_variable("VOICEBANK_DB_CONNECTION_STRING");
    let pool = sqlx::Pool::connect(&connection_string)
        .await
        .expect("create database pool from VOICEBANK_DB_CONNECTION_STRING");
    let assignments = AssignmentService::new(logger.clone(), Arc::new(PgDb::new(pool)));

    info!(logger, "Importing {} texts...", texts.len());
    let imported = assignments.bulk_import(texts).await?;
    info!(logger, "Imported {} texts", imported);

    Ok(())
}
