//! `fcdiff` - CLI for fcsettings
//!
//! This binary parses firmware CLI dumps, derives PID gains, and prints
//! side-by-side comparisons of two builds' flight controller settings.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tracing::info;

use fcsettings::cli::{
    Cli, Command, CompareCommand, ConfigCommand, DepsCommand, ParseCommand, PidsCommand,
    UploadCommand,
};
use fcsettings::config::OutputFormat;
use fcsettings::report::format_value;
use fcsettings::upload::read_text;
use fcsettings::{
    derive_pids, dump, init_logging, Comparison, ComparisonReport, Config, DependencySpec,
    PartSelection, PidEncoding, SettingsUpload,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    // Execute the command
    match cli.command {
        Command::Parse(cmd) => handle_parse(&cmd),
        Command::Pids(cmd) => handle_pids(&config, &cmd),
        Command::Compare(cmd) => handle_compare(&config, &cmd),
        Command::Deps(cmd) => handle_deps(&cmd),
        Command::Upload(cmd) => handle_upload(&cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_parse(cmd: &ParseCommand) -> anyhow::Result<()> {
    let raw = dump::parse(&read_text(&cmd.dump)?);
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    if raw.is_empty() {
        println!("No numeric settings found in {}", cmd.dump.display());
        return Ok(());
    }
    for (field, value) in raw.iter() {
        println!("{field} = {value}");
    }
    Ok(())
}

fn handle_pids(config: &Config, cmd: &PidsCommand) -> anyhow::Result<()> {
    let raw = dump::parse(&read_text(&cmd.dump)?);
    let encoding = PidEncoding::detect(&raw);
    let pids = derive_pids(&raw);

    if cmd.json {
        let output = serde_json::json!({
            "encoding": encoding,
            "pids": pids,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Encoding: {encoding}");
    let unknown = &config.display.unknown_placeholder;
    for (label, value) in [
        ("pRoll", pids.p_roll),
        ("iRoll", pids.i_roll),
        ("dRoll", pids.d_roll),
        ("pPitch", pids.p_pitch),
        ("iPitch", pids.i_pitch),
        ("dPitch", pids.d_pitch),
        ("pYaw", pids.p_yaw),
        ("iYaw", pids.i_yaw),
        ("dYaw", pids.d_yaw),
    ] {
        println!("  {label:<8} {}", format_value(value, None, unknown));
    }
    Ok(())
}

fn handle_compare(config: &Config, cmd: &CompareCommand) -> anyhow::Result<()> {
    let primary = dump::parse(&read_text(&cmd.primary)?);
    let secondary = cmd
        .secondary
        .as_deref()
        .map(read_text)
        .transpose()?
        .map(|text| dump::parse(&text));

    let primary_parts = parts_arg(&cmd.primary_parts).context("invalid --primary-part")?;
    let secondary_parts = parts_arg(&cmd.secondary_parts).context("invalid --secondary-part")?;

    let comparison = Comparison {
        primary_raw: &primary,
        secondary_raw: secondary.as_ref(),
        primary_parts: primary_parts.as_ref(),
        secondary_parts: secondary_parts.as_ref(),
        spec: DependencySpec::builtin(),
    };
    let report = ComparisonReport::build(&comparison, &config.display);
    info!(
        primary = primary.len(),
        secondary = secondary.as_ref().map_or(0, fcsettings::RawSettings::len),
        "Built comparison report"
    );

    let format = cmd.format.map_or(config.output.format, OutputFormat::from);
    match format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Plain => print!("{}", report.to_text(&config.display.unknown_placeholder)),
    }
    Ok(())
}

/// Part selections are only attached when at least one was given.
fn parts_arg(pairs: &[String]) -> fcsettings::Result<Option<PartSelection>> {
    if pairs.is_empty() {
        return Ok(None);
    }
    PartSelection::from_pairs(pairs).map(Some)
}

fn handle_deps(cmd: &DepsCommand) -> anyhow::Result<()> {
    let spec = DependencySpec::builtin();
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&spec)?);
        return Ok(());
    }

    for (field, dep) in spec.iter() {
        let mut needs = Vec::new();
        if !dep.settings_deps.is_empty() {
            needs.push(format!("settings [{}]", dep.settings_deps.join(", ")));
        }
        if !dep.part_deps.is_empty() {
            needs.push(format!("parts [{}]", dep.part_deps.join(", ")));
        }
        println!("{field:<20} {}", needs.join(" + "));
    }
    Ok(())
}

fn handle_upload(cmd: &UploadCommand) -> anyhow::Result<()> {
    let upload = SettingsUpload::read(cmd.gui_backup.as_deref(), cmd.cli_dump.as_deref())?;
    if upload.is_empty() {
        println!("Nothing to upload.");
        return Ok(());
    }

    let raw = upload.raw_settings().unwrap_or_default();
    if raw.is_empty() {
        println!("Warning: the CLI dump contains no numeric settings.");
    }
    println!("Upload is valid.");
    println!("  Settings:  {}", raw.len());
    println!("  Encoding:  {}", PidEncoding::detect(&raw));
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Display]");
                println!(
                    "  Unknown placeholder: {}",
                    config.display.unknown_placeholder
                );
                println!("  P precision:         {}", config.display.pid_p_precision);
                println!("  I precision:         {}", config.display.pid_i_precision);
                println!("  Rate divisor:        {}", config.display.rate_divisor);
                println!();
                println!("[Output]");
                println!("  Format:              {:?}", config.output.format);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
