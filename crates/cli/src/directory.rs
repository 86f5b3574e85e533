use std::{fs, path::Path};

use anyhow::Context;
use colored::Colorize;
use perpsv2_sdk::directory::{self, Deployment};
use tabled::{Table, settings::Style};

pub(crate) async fn render(file: &str, offline: bool, json: bool) -> anyhow::Result<()> {
    let deployment = if offline {
        let document =
            fs::read_to_string(file).with_context(|| format!("reading directory file {file}"))?;
        Deployment::from_json(&document)?
    } else {
        let document = directory::fetch_document(directory::DEPLOYMENT_URL)
            .await
            .context("fetching deployment document")?;
        if let Some(parent) = Path::new(file).parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory for {file}"))?;
        }
        fs::write(file, &document).with_context(|| format!("writing directory file {file}"))?;
        Deployment::from_json(&document)?
    };

    let proxies: Vec<_> = deployment.perps_v2_proxies().collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&proxies)?);
        return Ok(());
    }

    println!(
        "{}\n",
        format!("{:#^100}", format!(" Perps V2 Market Proxies ({}) ", proxies.len()))
            .bold()
            .purple()
    );
    let mut table = Table::new(proxies);
    table.with(Style::sharp());
    println!("{table}");
    if !offline {
        println!("\nDeployment document saved to {file}");
    }
    Ok(())
}
