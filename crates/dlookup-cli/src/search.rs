//! One-shot `dlookup search`.

use dlookup_client::LookupClient;
use dlookup_common::models::{self, DirectoryUser};

use crate::cli::{OutputFormat, SearchArgs};
use crate::render;

pub async fn run(client: &LookupClient, args: SearchArgs) -> anyhow::Result<()> {
    let query = args.query_text();
    let response = client.lookup(&query).await?;

    let year = args.year.unwrap_or_else(dlookup_client::session::current_class_year);
    let users: Vec<&DirectoryUser> = models::visible(&response.users, args.filter_kind(), year);

    match args.format {
        OutputFormat::Table if users.is_empty() => println!("No results"),
        OutputFormat::Table => print!("{}", render::table(&users)),
        OutputFormat::Json => println!("{}", render::json(&users)?),
        OutputFormat::Vcard => print!("{}", render::vcards(&users)),
    }

    if response.truncated {
        eprintln!("{}", render::truncation_warning(response.users.len()));
    }
    Ok(())
}
