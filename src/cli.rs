use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "gzpack")]
#[command(version)]
#[command(about = "Pack files and folders into a single gzip archive", long_about = None)]
#[command(after_help = "Examples:\n  \
  gzpack compress notes.txt            create notes.gzip next to notes.txt\n  \
  gzpack compress photos -o backup     pack every file in photos into backup.gzip\n  \
  gzpack extract backup.gzip           unpack into a new folder named backup\n  \
  gzpack extract -l backup.gzip        list entries without extracting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Log every entry
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pack a file, or the files directly inside a folder
    Compress {
        /// File or folder to pack
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Archive name (.gzip is appended when missing)
        #[arg(short = 'o', value_name = "NAME")]
        output_name: Option<String>,

        /// Create the archive in DIR instead of next to the source
        #[arg(short = 'd', value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Compression level, 0 (store) to 9 (best)
        #[arg(long, value_name = "N", default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=9))]
        level: u32,
    },

    /// Unpack an archive into a new folder named after it
    Extract {
        /// Archive to unpack
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// Create the destination folder inside DIR
        #[arg(short = 'd', value_name = "DIR")]
        dest_dir: Option<PathBuf>,

        /// List entries (name and size) instead of extracting
        #[arg(short = 'l')]
        list: bool,

        /// Write entry contents to stdout, no messages
        #[arg(short = 'p')]
        pipe: bool,
    },
}

impl Cli {
    pub fn is_pipe(&self) -> bool {
        matches!(self.command, Command::Extract { pipe: true, .. })
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.is_pipe()
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Most detailed level the log subscriber should emit
    pub fn log_level(&self) -> Level {
        if self.is_very_quiet() {
            Level::ERROR
        } else if self.is_quiet() {
            Level::WARN
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compress() {
        let cli = Cli::parse_from(["gzpack", "compress", "photos", "-o", "backup", "--level", "9"]);
        match cli.command {
            Command::Compress {
                path,
                output_name,
                output_dir,
                level,
            } => {
                assert_eq!(path, PathBuf::from("photos"));
                assert_eq!(output_name.as_deref(), Some("backup"));
                assert!(output_dir.is_none());
                assert_eq!(level, 9);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_level() {
        assert!(Cli::try_parse_from(["gzpack", "compress", "x", "--level", "10"]).is_err());
    }

    #[test]
    fn pipe_implies_quiet() {
        let cli = Cli::parse_from(["gzpack", "extract", "-p", "a.gzip"]);
        assert!(cli.is_pipe());
        assert!(cli.is_quiet());
        assert_eq!(cli.log_level(), Level::WARN);

        let cli = Cli::parse_from(["gzpack", "-qq", "extract", "a.gzip"]);
        assert_eq!(cli.log_level(), Level::ERROR);

        let cli = Cli::parse_from(["gzpack", "compress", "a", "-v"]);
        assert_eq!(cli.log_level(), Level::DEBUG);
    }
}
