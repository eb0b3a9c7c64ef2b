mod commands;
mod output;

use clap::{Parser, Subcommand};
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "elablecrop",
    version,
    about = "Crop a region of the first page of a PDF into a PNG image"
)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory PNG files are written to (overrides the config file)
    #[arg(long = "out-dir", global = true, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crop the preset region (190,28)-(407,382) and write it as PNG
    Auto {
        /// Path to PDF file
        input_file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
    /// Crop a region given in PDF points and show its size
    Manual {
        /// Path to PDF file
        input_file: PathBuf,

        /// Top-left X
        #[arg(long, allow_hyphen_values = true, default_value = "")]
        tlx: String,

        /// Top-left Y
        #[arg(long, allow_hyphen_values = true, default_value = "")]
        tly: String,

        /// Bottom-right X
        #[arg(long, allow_hyphen_values = true, default_value = "")]
        brx: String,

        /// Bottom-right Y
        #[arg(long, allow_hyphen_values = true, default_value = "")]
        bry: String,

        /// Also write the cropped region as PNG
        #[arg(long)]
        save: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
    /// Interactive session driven by commands on stdin
    Session {
        /// PDF file to select at startup
        input_file: Option<PathBuf>,
    },
    /// Check that the poppler tools are installed
    Check,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = commands::load_config(cli.config.as_deref(), cli.out_dir).and_then(|config| {
        match cli.command {
            Commands::Auto { input_file, output } => {
                commands::auto::run(&config, input_file, output)
            }
            Commands::Manual {
                input_file,
                tlx,
                tly,
                brx,
                bry,
                save,
                output,
            } => commands::manual::run(&config, input_file, [tlx, tly, brx, bry], save, output),
            Commands::Session { input_file } => commands::session::run(&config, input_file),
            Commands::Check => commands::check::run(&config),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_values() {
        let cli = Cli::try_parse_from(["elablecrop", "auto", "label.pdf", "-o", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Auto {
                output: OutputFormat::Json,
                ..
            }
        ));

        let cli = Cli::try_parse_from(["elablecrop", "manual", "label.pdf", "--brx", "-5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Manual {
                output: OutputFormat::Text,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_output_format_is_rejected() {
        assert!(Cli::try_parse_from(["elablecrop", "auto", "label.pdf", "-o", "yaml"]).is_err());
        assert!(Cli::try_parse_from(["elablecrop", "manual", "label.pdf", "-o", "table"]).is_err());
    }
}
