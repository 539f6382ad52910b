use std::{env, fs, io};

use anyhow::{Context, Result};

use super::super::{
    args::AnalyzeCommand,
    exit_status::ExitStatus,
    report::{
        print_error, print_lookup_summary, print_missed_to, print_records_to, print_report,
        print_success_to, print_warning,
    },
};
use super::cache::open_store;
use crate::{
    config::load_config,
    core::{GenderLookup, GenderReport, ResolutionOrchestrator, Stats, extract_records},
    export,
    gender_api::{ApiSettings, GenderApiClient},
};

pub fn analyze(cmd: AnalyzeCommand) -> Result<ExitStatus> {
    let mut config = load_config(&env::current_dir()?)?.config;
    if let Some(threshold) = cmd.threshold {
        config.confidence_threshold = threshold;
    }
    if let Some(url) = &cmd.api_url {
        config.api_url = url.clone();
    }
    config.validate()?;

    let text = fs::read_to_string(&cmd.bib_file)
        .with_context(|| format!("Failed to read bibliography: {}", cmd.bib_file.display()))?;

    let extraction = extract_records(&text);
    if cmd.strict
        && let Err(err) = extraction.ensure_aligned()
    {
        print_error(&err.to_string());
        return Ok(ExitStatus::Failure);
    }

    let store = open_store(&cmd.common, &config)?;

    let api_key = cmd.api_key.as_deref().filter(|key| !key.trim().is_empty());
    let client = match api_key {
        Some(key) if !cmd.offline => {
            let mut settings = ApiSettings::new(config.api_url.as_str(), key);
            settings.timeout = config.timeout();
            settings.max_retries = config.max_retries;
            Some(GenderApiClient::new(settings)?)
        }
        _ => None,
    };

    let run = ResolutionOrchestrator::new(&store)
        .with_lookup(client.as_ref().map(|c| c as &dyn GenderLookup))
        .with_confidence_threshold(config.confidence_threshold)
        .offline(cmd.offline)
        .run(&extraction.bib_records())?;

    let report = GenderReport::from_records(&run.records);
    let stats = report.stats();

    if let Some(summary) = &run.lookup {
        print_lookup_summary(summary);
    }
    if stats == Stats::NoData {
        print_warning("no records found; category ratios are undefined");
    }

    if cmd.common.verbose {
        let mut stdout = io::stdout().lock();
        print_records_to(&run.records, &mut stdout);
        print_missed_to(&run.missed, &mut stdout);
    }
    print_report(&report, &stats);
    print_success_to(run.records.len(), run.missed.len(), &mut io::stdout().lock());

    if let Some(path) = &cmd.missed_query_file {
        export::write_file(path, |w| export::write_missed(&run.missed, w))?;
    }
    if let Some(path) = &cmd.resolved_query_file {
        export::write_file(path, |w| export::write_resolved(&run.records, w))?;
    }
    if let Some(path) = &cmd.gender_report_file {
        export::write_file(path, |w| export::write_gender_report(&report, w))?;
    }
    if let Some(path) = &cmd.stats_report_file {
        export::write_file(path, |w| export::write_stats(&stats, w))?;
    }

    Ok(ExitStatus::Success)
}
