//! `page` command handler: aggregate emissions over a traffic manifest.

use std::io::Read;
use std::path::Path;

use tabled::Tabled;
use tracing::{debug, info};

use carbonly_api::{GreencheckClient, TransportConfig};
use carbonly_core::{
    ContentTypeEmissions, DomainEmissions, GreenDomainSet, PageReport, PartyEmissions,
    ResourceEmissions, TrafficManifest,
};

use crate::cli::{PageArgs, PageView};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DomainRow {
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Hosting")]
    hosting: String,
    #[tabled(rename = "Bytes")]
    bytes: u64,
    #[tabled(rename = "CO2 (g)")]
    co2: String,
}

#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "Type")]
    content_type: String,
    #[tabled(rename = "Bytes")]
    bytes: u64,
    #[tabled(rename = "CO2 (g)")]
    co2: String,
}

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Bytes")]
    bytes: u64,
    #[tabled(rename = "CO2 (g)")]
    co2: String,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: &PageArgs, ctx: &Context) -> Result<(), CliError> {
    let manifest = read_manifest(&args.manifest)?;
    let green = green_domains(args, ctx, &manifest).await?;
    let co2 = ctx.co2()?;
    let color = ctx.color;
    debug!(
        domains = manifest.domains.len(),
        assets = manifest.assets.len(),
        green = green.len(),
        "manifest loaded"
    );

    let out = match args.by {
        PageView::Summary => {
            let report = co2.summarize(&manifest, &green)?;
            output::render_single(
                ctx.output,
                &report,
                |r| summary_detail(r, color),
                |r| r.total.to_string(),
            )
        }
        PageView::Domains => {
            let rows = co2.per_domain(&manifest, &green)?;
            output::render_list(
                ctx.output,
                &rows,
                |d: &DomainEmissions| DomainRow {
                    domain: d.domain.clone(),
                    hosting: output::hosting_label(green.check(&d.domain), color),
                    bytes: d.transfer_size,
                    co2: format!("{:.6}", d.co2),
                },
                |d| format!("{}\t{}", d.domain, d.co2),
            )
        }
        PageView::Types => {
            let rows = co2.per_content_type(&manifest, &green)?;
            output::render_list(
                ctx.output,
                &rows,
                |t: &ContentTypeEmissions| TypeRow {
                    content_type: t.content_type.clone(),
                    bytes: t.transfer_size,
                    co2: format!("{:.6}", t.co2),
                },
                |t| format!("{}\t{}", t.content_type, t.co2),
            )
        }
        PageView::Resources => {
            let rows = co2.dirtiest_resources(&manifest, &green)?;
            output::render_list(
                ctx.output,
                &rows,
                |r: &ResourceEmissions| ResourceRow {
                    url: r.url.clone(),
                    bytes: r.transfer_size,
                    co2: format!("{:.6}", r.co2),
                },
                |r| r.url.clone(),
            )
        }
        PageView::Party => {
            let split = co2.per_party(&manifest, &green)?;
            output::render_single(
                ctx.output,
                &split,
                |p| party_detail(p, color),
                |p| format!("{}\n{}", p.first_party, p.third_party),
            )
        }
    };

    output::print_output(&out, ctx.quiet);
    Ok(())
}

// ── Inputs ──────────────────────────────────────────────────────────

fn read_manifest(path: &Path) -> Result<TrafficManifest, CliError> {
    let display = path.display().to_string();
    let json = if display == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| CliError::Manifest {
            path: display.clone(),
            source: Box::new(e),
        })?
    };

    TrafficManifest::from_json(&json).map_err(|e| CliError::Manifest {
        path: display,
        source: Box::new(e),
    })
}

/// Merge green domains from config, flags, a file and optionally the API.
async fn green_domains(
    args: &PageArgs,
    ctx: &Context,
    manifest: &TrafficManifest,
) -> Result<GreenDomainSet, CliError> {
    let mut green = ctx.config.hosting.green_set();
    green.extend(args.green_domains.iter().map(String::as_str));

    if let Some(path) = &args.green_file {
        let contents = std::fs::read_to_string(path)?;
        let listed: Vec<String> = serde_json::from_str(&contents)?;
        green.extend(listed);
    }

    if args.check_hosting {
        let hosting = &ctx.config.hosting;
        let endpoint = hosting.endpoint_url()?;
        let transport = TransportConfig::default().with_timeout(hosting.timeout());
        let client = GreencheckClient::new(endpoint.clone(), &transport)
            .map_err(|e| CliError::from_api(e, endpoint.as_str()))?;

        let domains: Vec<String> = manifest.domains.keys().cloned().collect();
        let found = client
            .check_many(&domains)
            .await
            .map_err(|e| CliError::from_api(e, endpoint.as_str()))?;
        info!(checked = domains.len(), green = found.len(), "greencheck complete");
        green.extend(found);
    }

    Ok(green)
}

// ── Detail views ────────────────────────────────────────────────────

fn summary_detail(report: &PageReport, color: bool) -> String {
    let mut lines = vec![
        format!("Total:        {}", output::grams(report.total, color)),
        format!("First party:  {:.6} g", report.per_party.first_party),
        format!("Third party:  {:.6} g", report.per_party.third_party),
        format!("Domains:      {}", report.per_domain.len()),
    ];
    if let Some(top) = report.per_domain.first() {
        lines.push(format!("Heaviest:     {} ({:.6} g)", top.domain, top.co2));
    }
    if let Some(top) = report.per_content_type.first() {
        lines.push(format!("Top type:     {} ({:.6} g)", top.content_type, top.co2));
    }
    lines.join("\n")
}

fn party_detail(split: &PartyEmissions, color: bool) -> String {
    [
        format!("First party:  {}", output::grams(split.first_party, color)),
        format!("Third party:  {}", output::grams(split.third_party, color)),
    ]
    .join("\n")
}
