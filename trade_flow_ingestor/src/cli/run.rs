use std::{io::Write, path::PathBuf};

use tracing::{error, info};

use crate::{
    aggregate::aggregate_horizon,
    cli::commands::{Commands, OutputArgs},
    config::IngestorConfig,
    errors::Error,
    io::{CsvSink, DataSink},
    models::{category::TradeCategory, request_params::CollectParams, table::Table},
    providers::{ProviderId, TradeFlowProvider, build_provider, smoney::SmoneyProvider},
};

/// What one category produced.
#[derive(Debug)]
pub struct CategoryReport {
    pub category: TradeCategory,
    pub rows: usize,
    pub path: Option<PathBuf>,
}

/// Result for the categories one step covered. A shared page fetch that
/// fails covers every category it was meant to serve.
#[derive(Debug)]
pub struct Outcome {
    pub categories: Vec<TradeCategory>,
    pub result: Result<CategoryReport, Error>,
}

impl Outcome {
    fn single(category: TradeCategory, result: Result<CategoryReport, Error>) -> Self {
        Self {
            categories: vec![category],
            result,
        }
    }

    /// Category labels joined with `+`, e.g. `foreign+self`.
    pub fn label(&self) -> String {
        self.categories
            .iter()
            .map(TradeCategory::label)
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Outcomes of one command, in request order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<Outcome>,
}

impl RunSummary {
    /// Number of categories that failed.
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.categories.len())
            .sum()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    fn push(&mut self, provider: &str, outcome: Outcome) {
        match &outcome.result {
            Ok(report) => info!(provider, category = %report.category, rows = report.rows, "category done"),
            Err(e) => error!(provider, category = %outcome.label(), kind = ?e.kind(), "category failed: {e}"),
        }
        self.outcomes.push(outcome);
    }
}

/// Runs a command against the configured provider, printing previews and
/// output paths to `out`. A failing category does not stop the others.
pub fn run_command(
    command: &Commands,
    config: &IngestorConfig,
    out: &mut impl Write,
) -> Result<RunSummary, Error> {
    let args = command.output();
    let categories = args.category.categories();

    match command {
        Commands::Smoney { .. } if categories.len() > 1 => {
            let provider = SmoneyProvider::new(config)?;
            Ok(run_smoney_page(&provider, &categories, args, out))
        }
        _ => {
            let id = match command {
                Commands::Cafef { .. } => ProviderId::Cafef,
                Commands::Smoney { .. } => ProviderId::Smoney,
            };
            let provider = build_provider(id, config)?;
            let mut summary = RunSummary::default();
            for category in categories {
                let params = collect_params(command, provider.as_ref(), category);
                let result = provider
                    .fetch_table(category, &params)
                    .map_err(Error::from)
                    .and_then(|table| emit_table(provider.as_ref(), category, &params.symbol, table, args, out));
                summary.push(provider.name(), Outcome::single(category, result));
            }
            Ok(summary)
        }
    }
}

/// Serves every requested category from one download of the stock page.
fn run_smoney_page(
    provider: &SmoneyProvider,
    categories: &[TradeCategory],
    args: &OutputArgs,
    out: &mut impl Write,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let (foreign, own) = match provider.fetch_both(&args.symbol) {
        Ok(sets) => sets,
        Err(e) => {
            let outcome = Outcome {
                categories: categories.to_vec(),
                result: Err(e.into()),
            };
            summary.push(provider.name(), outcome);
            return summary;
        }
    };

    for set in [foreign, own] {
        if !categories.contains(&set.category) {
            continue;
        }
        let table = provider.table_for(&set);
        let result = emit_table(provider, set.category, &args.symbol, table, args, out);
        summary.push(provider.name(), Outcome::single(set.category, result));
    }
    summary
}

fn collect_params(
    command: &Commands,
    provider: &(dyn TradeFlowProvider + Send + Sync),
    category: TradeCategory,
) -> CollectParams {
    let params = provider.default_params(category, &command.output().symbol);
    match command {
        Commands::Cafef {
            start,
            end,
            page_size,
            ..
        } => {
            let params = params.with_range(*start, *end);
            match page_size {
                Some(size) => params.with_page_size(*size),
                None => params,
            }
        }
        Commands::Smoney { .. } => params,
    }
}

/// Aggregates, previews and optionally writes one category's table.
fn emit_table(
    provider: &(dyn TradeFlowProvider + Send + Sync),
    category: TradeCategory,
    symbol: &str,
    table: Table,
    args: &OutputArgs,
    out: &mut impl Write,
) -> Result<CategoryReport, Error> {
    let table = match args.horizon {
        Some(horizon) => aggregate_horizon(&table, horizon)?,
        None => table,
    };

    writeln!(out, "== {} {} ({}) ==", symbol, category, provider.name())?;
    writeln!(out, "{}", table.preview(args.preview))?;

    let path = match &args.out {
        Some(dir) => {
            let name = format!("{}_{}_{}", provider.name(), symbol, category);
            let path = CsvSink::new(dir).write(&name, &table)?;
            writeln!(out, "{}", path.display())?;
            Some(path)
        }
        None => None,
    };

    Ok(CategoryReport {
        category,
        rows: table.len(),
        path,
    })
}
