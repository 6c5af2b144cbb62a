use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use wohngeld_forms::config::{AppConfig, FormsConfig};
use wohngeld_forms::error::AppError;
use wohngeld_forms::forms::{ApplicationData, FormFillService};
use wohngeld_forms::telemetry;

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct TemplateArgs {
    /// Form template (.json field tree or .csv field listing). Defaults to the
    /// configured template, then the bundled one.
    #[arg(long)]
    pub(crate) template: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct FillArgs {
    /// Application data as JSON. The built-in sample is used when omitted.
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) template: TemplateArgs,
    /// Directory receiving the filled document
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Classify fields instead of using the form's direct field table
    #[arg(long)]
    pub(crate) heuristic: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Application data used for the recommended mapping (defaults to the sample)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) template: TemplateArgs,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct FieldsArgs {
    #[command(flatten)]
    pub(crate) template: TemplateArgs,
}

pub(crate) fn run_fill(args: FillArgs) -> Result<(), AppError> {
    let mut forms = batch_config()?;
    if let Some(output_dir) = args.output_dir {
        forms.output_dir = output_dir;
    }
    let service = FormFillService::new(forms);
    let data = load_data(args.data.as_deref())?;
    let template = args.template.template.as_deref();

    let summary = if args.heuristic {
        service.fill_heuristic(&data, template)?
    } else {
        service.fill(&data, template)?
    };

    println!("Filled form ({} strategy)", summary.strategy);
    println!(
        "- {} of {} fields filled",
        summary.fields_filled, summary.fields_found
    );
    println!("- written to {}", summary.output_path.display());
    Ok(())
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let service = FormFillService::new(batch_config()?);
    let data = args.data.as_deref().map(read_data).transpose()?;
    let report = service.analyze(args.template.template.as_deref(), data.as_ref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

pub(crate) fn run_fields(args: FieldsArgs) -> Result<(), AppError> {
    let service = FormFillService::new(batch_config()?);
    let names = service.field_names(args.template.template.as_deref())?;
    for name in &names {
        println!("{name}");
    }
    println!("{} fields", names.len());
    Ok(())
}

fn batch_config() -> Result<FormsConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config.forms)
}

fn load_data(path: Option<&Path>) -> Result<ApplicationData, AppError> {
    match path {
        Some(path) => read_data(path),
        None => Ok(ApplicationData::sample()),
    }
}

fn read_data(path: &Path) -> Result<ApplicationData, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
