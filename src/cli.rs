use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::language::Language;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate a piece of text
    Translate {
        /// Source language (code or name)
        #[arg(short, long, default_value = "en")]
        from: Language,

        /// Target language (code or name)
        #[arg(short, long, default_value = "hi")]
        to: Language,

        /// Save the translation as speech
        #[arg(short, long)]
        speak: bool,

        /// Text to translate
        text: Vec<String>,
    },

    /// Translate lines read from standard input until EOF
    Interactive {
        /// Source language (code or name)
        #[arg(short, long, default_value = "en")]
        from: Language,

        /// Target language (code or name)
        #[arg(short, long, default_value = "hi")]
        to: Language,

        /// Save each translation as speech
        #[arg(short, long)]
        speak: bool,
    },

    /// List supported language pairs and their models
    Pairs,

    /// List translation models and their download status
    Models {
        /// Download all missing model artifacts
        #[arg(long)]
        download: bool,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_arguments() {
        let args = Args::parse_from(["parley", "translate", "--from", "French", "--to", "en", "Bonjour", "le", "monde"]);
        match args.command {
            Commands::Translate { from, to, speak, text } => {
                assert_eq!(from, Language::French);
                assert_eq!(to, Language::English);
                assert!(!speak);
                assert_eq!(text.join(" "), "Bonjour le monde");
            }
            _ => panic!("expected translate command"),
        }
    }

    #[test]
    fn test_defaults_to_english_hindi() {
        let args = Args::parse_from(["parley", "-v", "interactive", "--speak"]);
        assert!(args.verbose);
        match args.command {
            Commands::Interactive { from, to, speak } => {
                assert_eq!(from, Language::English);
                assert_eq!(to, Language::Hindi);
                assert!(speak);
            }
            _ => panic!("expected interactive command"),
        }
    }

    #[test]
    fn test_unknown_language_rejected() {
        let result = Args::try_parse_from(["parley", "translate", "--from", "de", "Hallo"]);
        assert!(result.is_err());
    }
}
