//! `bytes` and `visit` command handlers.

use tabled::Tabled;

use carbonly_core::{Breakdown, EmissionsByComponent, Estimate, EstimateTrace};

use crate::cli::EstimateArgs;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Clone, Copy)]
enum Kind {
    Transfer,
    Visit,
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "CO2 (g)")]
    co2: String,
}

#[derive(Tabled)]
struct VisitRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "First visit (g)")]
    first: String,
    #[tabled(rename = "Return visit (g)")]
    returning: String,
}

#[derive(Tabled)]
struct IntensityRow {
    #[tabled(rename = "Component")]
    component: &'static str,
    #[tabled(rename = "g CO2/kWh")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn handle_bytes(args: &EstimateArgs, ctx: &Context) -> Result<(), CliError> {
    handle(args, ctx, Kind::Transfer)
}

pub fn handle_visit(args: &EstimateArgs, ctx: &Context) -> Result<(), CliError> {
    handle(args, ctx, Kind::Visit)
}

fn handle(args: &EstimateArgs, ctx: &Context, kind: Kind) -> Result<(), CliError> {
    let co2 = ctx.co2()?;
    let color = ctx.color;

    let out = if args.trace {
        let trace = match kind {
            Kind::Transfer => co2.per_byte_trace(args.bytes, args.green, None)?,
            Kind::Visit => co2.per_visit_trace(args.bytes, args.green, None)?,
        };
        output::render_single(
            ctx.output,
            &trace,
            |t| trace_detail(t, color),
            |t| t.co2.total.to_string(),
        )
    } else {
        let estimate = match kind {
            Kind::Transfer => co2.per_byte(args.bytes, args.green)?,
            Kind::Visit => co2.per_visit(args.bytes, args.green)?,
        };
        output::render_single(
            ctx.output,
            &estimate,
            |e| estimate_detail(e, args.bytes, args.green, color),
            |e| e.total.to_string(),
        )
    };

    output::print_output(&out, ctx.quiet);
    Ok(())
}

// ── Detail views ────────────────────────────────────────────────────

fn estimate_detail(estimate: &Estimate, bytes: u64, green: bool, color: bool) -> String {
    let mut lines = vec![
        format!("Bytes:    {bytes}"),
        format!("Hosting:  {}", output::hosting_label(green, color)),
        format!("Total:    {}", output::grams(estimate.total, color)),
    ];
    if let Some(breakdown) = &estimate.breakdown {
        lines.push(String::new());
        lines.push(breakdown_table(breakdown));
    }
    lines.join("\n")
}

fn breakdown_table(breakdown: &Breakdown) -> String {
    match breakdown {
        Breakdown::Components(co2) => {
            let rows: Vec<ComponentRow> = co2
                .iter()
                .map(|(c, v)| ComponentRow {
                    component: c.to_string(),
                    co2: format!("{v:.6}"),
                })
                .collect();
            output::render_table(&rows)
        }
        Breakdown::Visit {
            first_visit,
            return_visit,
        } => output::render_table(&visit_rows(first_visit, return_visit)),
    }
}

fn visit_rows(first: &EmissionsByComponent, returning: &EmissionsByComponent) -> Vec<VisitRow> {
    first
        .iter()
        .zip(returning.iter())
        .map(|((c, f), (_, r))| VisitRow {
            component: c.to_string(),
            first: format!("{f:.6}"),
            returning: format!("{r:.6}"),
        })
        .collect()
}

fn trace_detail(trace: &EstimateTrace, color: bool) -> String {
    let vars = &trace.variables;
    let mut lines = vec![
        format!("Model:    {}", vars.model),
        estimate_detail(&trace.co2, vars.bytes, trace.green, color),
    ];

    if let Some(grid) = &vars.grid_intensity {
        let rows = [
            ("consumerDevice", grid.device),
            ("network", grid.network),
            ("dataCenter", grid.data_center),
            ("production", grid.production),
        ]
        .into_iter()
        .map(|(component, r)| IntensityRow {
            component,
            value: format!("{:.2}", r.value),
            source: r.source.to_string(),
        })
        .collect::<Vec<_>>();
        lines.push(String::new());
        lines.push(output::render_table(&rows));
    }

    if let Some(visit) = &vars.visit {
        lines.push(String::new());
        lines.push(format!("First visits:    {}", visit.first_visit_percentage));
        lines.push(format!("Return visits:   {}", visit.return_visit_percentage));
        lines.push(format!("Reload ratio:    {}", visit.data_reload_ratio));
    }

    lines.join("\n")
}
