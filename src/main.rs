use std::path::{Path, PathBuf};
use std::process::ExitCode;

use atena_label::{
    Error, FontConfig, FontFamily, ManualEntry, MappingDraft, PrintJob, SenderData, csv_source,
    templates,
};
use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Print address labels onto label sheet templates as PDF")]
struct Cli {
    /// CSV file with one address per row
    #[arg(long, conflicts_with = "manual")]
    csv: Option<PathBuf>,

    /// JSON field mapping (recipient_fields / address_fields) for --csv
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// JSON array of manually entered addresses
    #[arg(long)]
    manual: Option<PathBuf>,

    /// Label sheet product code
    #[arg(long, default_value = "28382")]
    template: String,

    /// 1-based label position to start printing at
    #[arg(long, default_value_t = 1)]
    start: usize,

    /// Horizontal print correction in mm
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset_x: f32,

    /// Vertical print correction in mm
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset_y: f32,

    /// mincho or gothic
    #[arg(long, default_value = "gothic")]
    font: FontFamily,

    /// Use this font file instead of searching / downloading
    #[arg(long)]
    font_file: Option<PathBuf>,

    #[arg(long)]
    sender_postal: Option<String>,

    #[arg(long)]
    sender_address: Option<String>,

    /// Print a sender block on every label
    #[arg(long)]
    sender_name: Option<String>,

    /// Output path (default: atena_label_<YYYYMMDD>.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List the built-in label templates and exit
    #[arg(long)]
    list_templates: bool,

    /// Print the columns detected in --csv and an empty mapping, then exit
    #[arg(long, requires = "csv")]
    print_columns: bool,
}

fn list_templates() {
    for t in templates::list_templates() {
        println!(
            "{:<6} {}  {}x{} labels, {:.1}x{:.1}mm",
            t.code, t.name, t.cols, t.rows, t.label_width, t.label_height
        );
    }
}

fn print_columns(path: &Path) -> Result<(), Error> {
    let text = std::fs::read_to_string(path)?;
    let table = csv_source::load_table(&text)?;
    for col in &table.columns {
        println!("{:>3}  {:<20} {}", col.index, col.name, col.sample);
    }
    let draft = MappingDraft::new(table.columns);
    let json = serde_json::to_string_pretty(&draft).map_err(|e| Error::Mapping(e.to_string()))?;
    println!("{json}");
    Ok(())
}

fn run(cli: Cli) -> Result<(), Error> {
    let template = *templates::find_template(&cli.template)
        .ok_or_else(|| Error::Input(format!("unknown template '{}'", cli.template)))?;

    let sender = cli.sender_name.map(|name| SenderData {
        postal_code: cli.sender_postal.unwrap_or_default(),
        address: cli.sender_address.unwrap_or_default(),
        name,
    });
    let settings = PrintJob {
        start_position: cli.start,
        offset_x: cli.offset_x,
        offset_y: cli.offset_y,
        include_sender: sender.is_some(),
        sender,
        font_family: cli.font,
        ..PrintJob::new(template, Vec::new())
    };

    let mut config = FontConfig::from_env();
    config.font_path = cli.font_file;

    let output = cli.output.unwrap_or_else(|| {
        PathBuf::from(atena_label::output_file_name(
            chrono::Local::now().date_naive(),
        ))
    });

    if let Some(csv_path) = cli.csv {
        let text = std::fs::read_to_string(&csv_path)?;
        let mapping_path = cli
            .mapping
            .ok_or_else(|| Error::Input("--csv needs --mapping".into()))?;
        let draft: MappingDraft = serde_json::from_str(&std::fs::read_to_string(&mapping_path)?)
            .map_err(|e| Error::Mapping(format!("{}: {e}", mapping_path.display())))?;
        atena_label::convert_csv_to_pdf(&text, &draft, settings, &config, &output)?;
    } else if let Some(manual_path) = cli.manual {
        let entries: Vec<ManualEntry> =
            serde_json::from_str(&std::fs::read_to_string(&manual_path)?)
                .map_err(|e| Error::Input(format!("{}: {e}", manual_path.display())))?;
        atena_label::convert_entries_to_pdf(&entries, settings, &config, &output)?;
    } else {
        return Err(Error::Input("pass --csv with --mapping, or --manual".into()));
    }

    println!("{}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.list_templates {
        list_templates();
        return ExitCode::SUCCESS;
    }

    let result = if cli.print_columns {
        match &cli.csv {
            Some(path) => print_columns(path),
            None => Err(Error::Input("--print-columns needs --csv".into())),
        }
    } else {
        run(cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
