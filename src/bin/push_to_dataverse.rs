//! Publish the DVC pipeline in the current directory to Dataverse.
//!
//! Takes no arguments. Settings are read from the environment:
//! `DATAVERSE_URL`, `DATAVERSE_API_TOKEN`, and optionally
//! `DATAVERSE_COLLECTION`, `DVC_SCHEMA_URL`, `DATAVERSE_AUTHOR`,
//! `DATAVERSE_CONTACT_EMAIL`. Log verbosity follows `RUST_LOG`.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dvc_dataverse::export::{
    Citation, DataModelSchema, DataverseClient, DataverseDataset, LinkingTemplate, Subject,
};
use dvc_dataverse::{parse_dvc_repo, ExportConfig};

const TITLE: &str = "ML-Session Gradient Boosting Example";
const DESCRIPTION: &str = "This is an example";
const DEFAULT_AUTHOR: &str = "DVC Pipeline Maintainer";
const DEFAULT_CONTACT_EMAIL: &str = "maintainer@example.org";

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    run(&ExportConfig::from_env())
}

fn run(config: &ExportConfig) -> Result<()> {
    let root = config.repo_root();

    let doc = parse_dvc_repo(root).context("failed to parse DVC repository")?;

    let schema = DataModelSchema::local();
    schema.validate(&doc)?;
    if let Some(url) = config.schema_url() {
        let remote = DataModelSchema::fetch(url)
            .with_context(|| format!("failed to fetch data model contract from {url}"))?;
        schema.check_contract(&remote)?;
    }

    let template = LinkingTemplate::load_or_default(config.linking_template())
        .context("failed to load linking template")?;
    template.validate_against(&schema)?;

    let mut dataset = DataverseDataset::from_document(&doc, &template);

    let author = config.author().unwrap_or(DEFAULT_AUTHOR);
    let citation = Citation::new(TITLE)
        .description(DESCRIPTION)
        .subject(Subject::ComputerAndInformationScience)
        .author(author)
        .contact(author, config.contact_email().unwrap_or(DEFAULT_CONTACT_EMAIL));
    dataset.add_citation(&citation)?;

    dataset
        .add_directory(root)
        .context("failed to snapshot repository files")?;

    let client = DataverseClient::from_config(config)?;
    let receipt = dataset
        .upload(&client, config.collection())
        .with_context(|| format!("upload to collection '{}' failed", config.collection()))?;

    info!(
        persistent_id = %receipt.dataset.persistent_id,
        files = receipt.files_uploaded,
        "published pipeline metadata"
    );
    Ok(())
}
