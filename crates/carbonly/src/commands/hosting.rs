//! `hosting` command handlers.

use std::time::Duration;

use serde::Serialize;
use tabled::Tabled;

use carbonly_api::{GreencheckClient, TransportConfig};

use crate::cli::{HostingArgs, HostingCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct HostingStatus {
    domain: String,
    green: bool,
}

#[derive(Tabled)]
struct HostingRow {
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Hosting")]
    hosting: String,
}

pub async fn handle(args: &HostingArgs, ctx: &Context) -> Result<(), CliError> {
    match &args.command {
        HostingCommand::Check {
            domains,
            endpoint,
            timeout,
        } => {
            let hosting = &ctx.config.hosting;
            let endpoint = match endpoint {
                Some(url) => url.parse().map_err(|_| CliError::Validation {
                    field: "endpoint".into(),
                    reason: format!("invalid URL: {url}"),
                })?,
                None => hosting.endpoint_url()?,
            };
            let timeout = timeout.map_or_else(|| hosting.timeout(), Duration::from_secs);
            let transport = TransportConfig::default().with_timeout(timeout);
            let client = GreencheckClient::new(endpoint.clone(), &transport)
                .map_err(|e| CliError::from_api(e, endpoint.as_str()))?;

            let green = if let [domain] = domains.as_slice() {
                let is_green = client
                    .check(domain)
                    .await
                    .map_err(|e| CliError::from_api(e, endpoint.as_str()))?;
                if is_green { vec![domain.clone()] } else { Vec::new() }
            } else {
                client
                    .check_many(domains)
                    .await
                    .map_err(|e| CliError::from_api(e, endpoint.as_str()))?
            };

            let statuses: Vec<HostingStatus> = domains
                .iter()
                .map(|d| HostingStatus {
                    domain: d.clone(),
                    green: green.contains(d),
                })
                .collect();

            let color = ctx.color;
            let out = output::render_list(
                ctx.output,
                &statuses,
                |s| HostingRow {
                    domain: s.domain.clone(),
                    hosting: output::hosting_label(s.green, color),
                },
                |s| format!("{}\t{}", s.domain, s.green),
            );
            output::print_output(&out, ctx.quiet);
            Ok(())
        }
    }
}
