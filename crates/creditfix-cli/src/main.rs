// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use creditfix_app::{
    AssembledReport, CountPolicy, CreditReport, ReportView, SectionSummary, SectionViewState,
    parse_report_date,
};
use creditfix_tui::TuiOptions;
use logging::{LogTarget, TracingSink};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::{Date, OffsetDateTime};
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    logging::init(if options.check_only || options.summary_only {
        LogTarget::Stderr
    } else {
        LogTarget::StateFile
    })?;

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `creditfix --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let reference_date = options
        .reference_date
        .or_else(|| config.reference_date())
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());

    let report = if options.demo {
        creditfix_testkit::demo_report(reference_date)?
    } else {
        let path = options
            .report_path
            .clone()
            .or_else(|| config.report_path())
            .ok_or_else(|| {
                anyhow!(
                    "no report to open; pass --report <path>, set [report].path in {}, or use --demo",
                    options.config_path.display()
                )
            })?;
        load_report(&path)?
    };

    let policy =
        CountPolicy::new(reference_date).with_window_months(config.recent_window_months());
    let tick = config.tick()?;

    let assembled = AssembledReport::from_report(&report);
    info!(
        negative_accounts = assembled.negative_accounts().len(),
        public_records = assembled.public_records().len(),
        inquiries = assembled.inquiries().len(),
        reference_date = %reference_date,
        "report loaded"
    );
    if options.check_only {
        return Ok(());
    }

    let mut view = ReportView::with_sink(assembled, policy, TracingSink);
    if config.start_expanded() {
        view = view.with_initial_view(&SectionViewState {
            collapsed: false,
            expanded: true,
            ..SectionViewState::default()
        });
    }

    if options.summary_only {
        print!("{}", render_summaries(&view.summaries()));
        return Ok(());
    }

    creditfix_tui::run_app(&mut view, TuiOptions { tick })
}

fn load_report(path: &Path) -> Result<CreditReport> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read report {}", path.display()))?;
    CreditReport::from_json_str(&raw)
        .with_context(|| format!("parse report JSON {}", path.display()))
}

fn render_summaries(summaries: &[SectionSummary]) -> String {
    summaries
        .iter()
        .filter(|summary| summary.visible)
        .map(|summary| {
            format!(
                "{} ({}): {} [{}]\n",
                summary.section.title(),
                summary.badge,
                summary.status_text,
                summary.count_label
            )
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    report_path: Option<PathBuf>,
    reference_date: Option<Date>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    summary_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        report_path: None,
        reference_date: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        summary_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--report" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--report requires a file path"))?;
                options.report_path = Some(PathBuf::from(value.as_ref()));
            }
            "--reference-date" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--reference-date requires a YYYY-MM-DD date"))?;
                let raw = value.as_ref();
                let Some(date) = parse_report_date(raw) else {
                    bail!("invalid --reference-date {raw:?}; expected YYYY-MM-DD");
                };
                options.reference_date = Some(date);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--summary" => {
                options.summary_only = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("creditfix: review negative items on a credit report");
    println!("  --config <path>           Use a specific config path");
    println!("  --report <path>           Open this report JSON instead of [report].path");
    println!("  --reference-date <date>   Count recent inquiries as of YYYY-MM-DD");
    println!("  --print-config-path       Print resolved config path");
    println!("  --print-example-config    Print a v1 config template");
    println!("  --demo                    Launch with a generated demo report");
    println!("  --summary                 Print section summaries and exit");
    println!("  --check                   Validate config and report, then exit");
    println!("  --help                    Show this help");
}
