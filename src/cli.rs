//! Command-line glue: every command decodes a template file, calls into the
//! library and prints or re-encodes the result.

use anyhow::{bail, Context, Result};
use cfn_template::{GenericResource, Registry, Template};
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Inspect, validate and rewrite CloudFormation templates
#[derive(Parser, Debug)]
#[command(name = "cfn-template", version)]
pub struct Cli {
    /// Log decode progress (same as CFN_TEMPLATE_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log filter directives
    #[arg(long, env = "CFN_TEMPLATE_LOG", default_value = "warn", global = true)]
    pub log: String,

    /// Output format; defaults to the input file's format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<Format>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a template and report the first error
    Validate(InputArgs),
    /// Re-encode a template in canonical form
    Fmt(OutputArgs),
    /// List resources with their type
    List(InputArgs),
    /// List resource types with a built-in schema
    Types,
    /// Show which logical names each resource references
    Refs(RefsArgs),
    /// Rename resources and rewrite every reference to them
    Rename(RenameArgs),
    /// Remove resources by logical name
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Template file (.json, .yaml or .yml)
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Template file (.json, .yaml or .yml)
    pub file: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RefsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only show references to names that are neither resources nor parameters
    #[arg(long)]
    pub dangling: bool,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    #[command(flatten)]
    pub io: OutputArgs,

    /// Renames as OLD=NEW
    #[arg(required = true, value_parser = parse_rename)]
    pub renames: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub io: OutputArgs,

    /// Logical names to remove
    #[arg(required = true)]
    pub names: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// `.yaml` and `.yml` are YAML, anything else JSON.
    fn detect(path: &Path) -> Format {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Format::Yaml
            }
            _ => Format::Json,
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let registry = Registry::default();
    let format = cli.format;
    match cli.command {
        Command::Validate(args) => validate(&registry, &args.file),
        Command::Fmt(args) => {
            let (template, input_format) = load(&registry, &args.file)?;
            write(&template, format.unwrap_or(input_format), args.output.as_deref())
        }
        Command::List(args) => list(&registry, &args.file),
        Command::Types => {
            for resource_type in registry.types() {
                println!("{}", resource_type);
            }
            Ok(())
        }
        Command::Refs(args) => refs(&registry, &args.input.file, args.dangling),
        Command::Rename(args) => rename(&registry, args, format),
        Command::Remove(args) => remove(&registry, args, format),
    }
}

fn load(registry: &Registry, path: &Path) -> Result<(Template, Format)> {
    let format = Format::detect(path);
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let template = match format {
        Format::Json => Template::decode(source.as_bytes(), registry),
        Format::Yaml => Template::from_yaml(&source, registry),
    }
    .with_context(|| format!("{} is not a valid template", path.display()))?;
    Ok((template, format))
}

fn write(template: &Template, format: Format, output: Option<&Path>) -> Result<()> {
    let text = match format {
        Format::Json => format!("{}\n", template.to_string_pretty()),
        Format::Yaml => template.to_yaml()?,
    };
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::debug!("Wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn validate(registry: &Registry, path: &Path) -> Result<()> {
    let (template, _) = load(registry, path)?;
    let generic = template
        .resources()
        .filter(|(_, resource)| resource.is::<GenericResource>())
        .count();
    println!(
        "{} {}: {} resources ({} without a schema)",
        style("✔").green(),
        path.display(),
        template.resource_count(),
        generic
    );
    warn_dangling(&template);
    Ok(())
}

fn list(registry: &Registry, path: &Path) -> Result<()> {
    let (template, _) = load(registry, path)?;
    for name in template.resource_names() {
        let Some(resource) = template.get_resource(name) else {
            continue;
        };
        let marker = if resource.is::<GenericResource>() {
            style("generic").dim()
        } else {
            style("typed").green()
        };
        println!("{}\t{}\t{}", style(name).bold(), resource.resource_type(), marker);
    }
    Ok(())
}

fn refs(registry: &Registry, path: &Path, dangling_only: bool) -> Result<()> {
    let (template, _) = load(registry, path)?;
    if dangling_only {
        let dangling = template.dangling_references();
        for (referrer, name) in &dangling {
            println!("{} -> {}", referrer, style(name).red());
        }
        if !dangling.is_empty() {
            bail!("{} dangling references", dangling.len());
        }
        return Ok(());
    }

    let mut references: Vec<(String, Vec<String>)> = template
        .references()
        .into_iter()
        .map(|(referrer, names)| {
            let mut names: Vec<String> = names.into_iter().collect();
            names.sort();
            (referrer, names)
        })
        .collect();
    references.sort();
    for (referrer, names) in references {
        println!("{} -> {}", style(referrer).bold(), names.join(", "));
    }
    Ok(())
}

fn rename(registry: &Registry, args: RenameArgs, format: Option<Format>) -> Result<()> {
    let (template, input_format) = load(registry, &args.io.file)?;
    let id_mapping: HashMap<String, String> = args.renames.into_iter().collect();
    let renamed = template.rename_resources(registry, &id_mapping)?;
    for (old_id, new_id) in &id_mapping {
        eprintln!("{} {} -> {}", style("✔").green(), old_id, new_id);
    }
    write(&renamed, format.unwrap_or(input_format), args.io.output.as_deref())
}

fn remove(registry: &Registry, args: RemoveArgs, format: Option<Format>) -> Result<()> {
    let (mut template, input_format) = load(registry, &args.io.file)?;
    for name in &args.names {
        match template.remove_resource(name) {
            Some(resource) => eprintln!(
                "{} removed {} ({})",
                style("✔").green(),
                name,
                resource.resource_type()
            ),
            None => eprintln!("{} {} not found", style("!").yellow(), name),
        }
    }
    warn_dangling(&template);
    write(&template, format.unwrap_or(input_format), args.io.output.as_deref())
}

fn warn_dangling(template: &Template) {
    for (referrer, name) in template.dangling_references() {
        eprintln!(
            "{} {} references {}, which is not defined",
            style("!").yellow(),
            referrer,
            name
        );
    }
}

fn parse_rename(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((old, new)) if !old.is_empty() && !new.is_empty() => {
            Ok((old.to_string(), new.to_string()))
        }
        _ => Err(format!("expected OLD=NEW, got `{}`", s)),
    }
}
