//! `docidx` - CLI for docindex
//!
//! This binary provides the command-line interface for checking, converting
//! and searching documentation search indexes.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use docindex::cli::{
    CheckCommand, Cli, Command, ConfigCommand, ConvertCommand, OutputFormat, SearchCommand,
};
use docindex::index::validate::{error_count, validate};
use docindex::index::writer::{render, write_path};
use docindex::{init_logging, Config, Error, Hit, LoadReport, SearchIndex, Searcher};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match &cli.command {
        Command::Check(cmd) => handle_check(&cli, &config, cmd),
        Command::Search(cmd) => handle_search(&cli, &config, cmd),
        Command::Show(cmd) => {
            let (index, _) = load_index(&cli, &config)?;
            handle_show(&index, &cmd.location, cmd.json)
        }
        Command::Pages(cmd) => {
            let (index, _) = load_index(&cli, &config)?;
            handle_pages(&index, cmd.json)
        }
        Command::Stats(cmd) => {
            let (index, report) = load_index(&cli, &config)?;
            handle_stats(&index, &report, cmd.json)
        }
        Command::Convert(cmd) => handle_convert(&cli, &config, cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Load the index named by `--index` or the configuration.
fn load_index(cli: &Cli, config: &Config) -> anyhow::Result<(SearchIndex, LoadReport)> {
    let path = config.index_path(cli.index.clone())?;

    let mut config = config.clone();
    if let Some(policy) = cli.policy_override() {
        config.index.policy = policy;
    }

    let loader = config.loader()?;
    loader
        .load_path(&path)
        .with_context(|| format!("could not load search index from {}", path.display()))
}

fn handle_check(cli: &Cli, config: &Config, cmd: &CheckCommand) -> anyhow::Result<()> {
    let (index, report) = load_index(cli, config)?;
    let issues = validate(&index);
    let errors = error_count(&issues, &report);

    if cmd.json {
        let out = serde_json::json!({
            "valid": errors == 0,
            "report": report,
            "issues": issues,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "{} records loaded ({} format)",
            report.accepted, report.format
        );
        if report.excluded > 0 {
            println!("{} records excluded by configuration", report.excluded);
        }
        for skipped in &report.skipped {
            println!(
                "error [record {}]: skipped: {}",
                skipped.index, skipped.reason
            );
        }
        for issue in &issues {
            println!("{issue}");
        }
        if errors == 0 {
            println!("Index is valid.");
        }
    }

    if errors > 0 {
        return Err(Error::ValidationFailed { errors }.into());
    }
    Ok(())
}

fn handle_search(cli: &Cli, config: &Config, cmd: &SearchCommand) -> anyhow::Result<()> {
    let (index, _) = load_index(cli, config)?;
    let searcher = Searcher::new(&index, &config.search);

    let mut query = searcher.query(cmd.query.clone());
    if let Some(mode) = cmd.mode {
        query = query.mode(mode.into());
    }
    if let Some(order) = cmd.order {
        query = query.order(order.into());
    }
    if let Some(limit) = cmd.limit {
        query = query.limit(limit);
    }
    if let Some(category) = cmd.category {
        query = query.category(category.into());
    }
    if let Some(page) = &cmd.page {
        query = query.page(page.clone());
    }

    let hits = searcher.search(&query)?;
    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&hits)?),
        OutputFormat::Table => print_hits_table(&hits),
        OutputFormat::Plain => print_hits_plain(&hits),
    }
    Ok(())
}

fn print_hits_plain(hits: &[Hit<'_>]) {
    if hits.is_empty() {
        println!("No matches.");
        return;
    }
    for hit in hits {
        let doc = hit.fragment;
        println!(
            "{}  [{}] {} > {}  (score {})",
            doc.location, doc.category, doc.page, doc.title, hit.score
        );
        if let Some(snippet) = &hit.snippet {
            println!("    {snippet}");
        }
    }
}

fn print_hits_table(hits: &[Hit<'_>]) {
    let header = ["SCORE", "CATEGORY", "PAGE", "TITLE", "LOCATION"];
    let rows: Vec<[String; 5]> = hits
        .iter()
        .map(|hit| {
            let doc = hit.fragment;
            [
                hit.score.to_string(),
                doc.category.to_string(),
                doc.page.clone(),
                doc.title.clone(),
                doc.location.clone(),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 5]| {
        let mut out = String::new();
        for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            out.push_str(&format!("{cell:<width$}"));
        }
        println!("{}", out.trim_end());
    };

    line(header);
    for row in &rows {
        line([&row[0], &row[1], &row[2], &row[3], &row[4]].map(String::as_str));
    }
}

fn handle_show(index: &SearchIndex, location: &str, json: bool) -> anyhow::Result<()> {
    let doc = index.find(location).ok_or_else(|| Error::FragmentNotFound {
        location: location.to_string(),
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(doc)?);
    } else {
        println!("Location:  {}", doc.location);
        println!("Page:      {}", doc.page);
        println!("Title:     {}", doc.title);
        println!("Category:  {}", doc.category);
        if let Some(slug) = doc.location().slug() {
            println!("Anchor:    {slug}");
        }
        println!();
        if doc.has_text() {
            println!("{}", doc.text);
        } else {
            println!("(no text)");
        }
    }
    Ok(())
}

fn handle_pages(index: &SearchIndex, json: bool) -> anyhow::Result<()> {
    let pages: Vec<_> = index
        .pages()
        .into_iter()
        .map(|page| {
            let location = index
                .page_fragments(page)
                .find(|d| d.is_page())
                .map(|d| d.location.as_str());
            (page, location, index.sections_of(page).count())
        })
        .collect();

    if json {
        let out: Vec<_> = pages
            .iter()
            .map(|(page, location, sections)| {
                serde_json::json!({
                    "page": page,
                    "location": location,
                    "sections": sections,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (page, location, sections) in pages {
            println!(
                "{page:<24} {:<28} {sections} section(s)",
                location.unwrap_or("-")
            );
        }
    }
    Ok(())
}

fn handle_stats(index: &SearchIndex, report: &LoadReport, json: bool) -> anyhow::Result<()> {
    let stats = index.stats();
    if json {
        let out = serde_json::json!({
            "format": report.format,
            "stats": stats,
            "skipped": report.skipped.len(),
            "excluded": report.excluded,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Index statistics");
        println!("----------------");
        println!("Format:        {}", report.format);
        println!("Records:       {}", stats.total);
        println!("  Pages:       {}", stats.pages);
        println!("  Sections:    {}", stats.sections);
        println!("  Empty text:  {}", stats.empty_text);
        println!("Page names:    {}", stats.distinct_pages);
        println!("Text bytes:    {}", stats.text_bytes);
        println!("Skipped:       {}", report.skipped.len());
        println!("Excluded:      {}", report.excluded);
        println!("Fingerprint:   {}", stats.fingerprint);
    }
    Ok(())
}

fn handle_convert(cli: &Cli, config: &Config, cmd: &ConvertCommand) -> anyhow::Result<()> {
    let (index, _) = load_index(cli, config)?;
    match &cmd.output {
        Some(path) => write_path(&index, path, cmd.to.into(), cmd.pretty)?,
        None => {
            let rendered = render(&index, cmd.to.into(), cmd.pretty)?;
            print!("{rendered}");
            if !rendered.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Index]");
                println!(
                    "  Path:               {}",
                    config
                        .index
                        .path
                        .as_ref()
                        .map_or_else(|| "(not set)".to_string(), |p| p.display().to_string())
                );
                println!("  Policy:             {:?}", config.index.policy);
                println!(
                    "  Excluded patterns:  {}",
                    config.index.exclude_locations.len()
                );
                println!();
                println!("[Search]");
                println!("  Mode:               {}", config.search.mode);
                println!("  Order:              {:?}", config.search.order);
                println!("  Limit:              {}", config.search.limit);
                println!("  Min token length:   {}", config.search.min_token_length);
                println!("  Case sensitive:     {}", config.search.case_sensitive);
                println!(
                    "  Weights:            title {} / text {} / page bonus {}",
                    config.search.title_weight,
                    config.search.text_weight,
                    config.search.page_bonus
                );
                println!("  Snippet chars:      {}", config.search.snippet_chars);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.clone().unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
