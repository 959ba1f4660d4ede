//! Command-line argument definition and dispatch.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// tomeo-i18n - Inspect and try out Tomeo's translation catalogs
#[derive(Parser, Debug)]
#[command(name = "tomeo-i18n")]
#[command(version)]
#[command(about = "Inspect and try out Tomeo's translation catalogs", long_about = None)]
pub struct Args {
    /// Directory to search for catalogs (repeatable; replaces configured search paths)
    #[arg(long = "catalog-dir", global = true)]
    pub catalog_dirs: Vec<PathBuf>,

    /// Engine configuration file (default: config/i18n.yml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate one message
    Translate {
        /// Locale to translate into (e.g., zh_CN)
        #[arg(long)]
        locale: String,
        /// Message context (usually the widget class)
        #[arg(long)]
        context: String,
        /// Disambiguation comment
        #[arg(long)]
        disambiguation: Option<String>,
        /// Plural count for numerus messages (%n)
        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,
        /// Positional argument for %1, %2, ... (repeatable)
        #[arg(long = "arg")]
        args: Vec<String>,
        /// Source text of the message
        source: String,
    },
    /// Render a relative time label ("5m ago")
    Ago {
        /// Locale to render in
        #[arg(long)]
        locale: String,
        /// Context holding the relative time messages
        #[arg(long, default_value = tomeo_i18n::i18n::relative_time::VIDEO_POST_CARD)]
        context: String,
        /// Event time (RFC 3339) measured against now
        #[arg(long, conflicts_with = "seconds")]
        since: Option<String>,
        /// Elapsed seconds
        #[arg(allow_negative_numbers = true, required_unless_present = "since")]
        seconds: Option<i64>,
    },
    /// Validate catalog files and print statistics
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Catalog files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the languages offered by Tomeo and whether a catalog is found
    Languages,
}

/// What: Run the selected subcommand.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Process exit code.
pub async fn run(args: &Args) -> ExitCode {
    use crate::args::{ago, check, languages, translate};

    match &args.command {
        Command::Translate {
            locale,
            context,
            disambiguation,
            count,
            args: params,
            source,
        } => translate::handle_translate(
            args,
            &translate::TranslateRequest {
                locale,
                context,
                disambiguation: disambiguation.as_deref(),
                count: *count,
                params,
                source,
            },
        ),
        Command::Ago {
            locale,
            context,
            since,
            seconds,
        } => ago::handle_ago(args, locale, context, since.as_deref(), *seconds),
        Command::Check { json, files } => check::handle_check(files, *json),
        Command::Languages => languages::handle_languages(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_translate_with_globals() {
        let args = Args::try_parse_from([
            "tomeo-i18n",
            "--catalog-dir",
            "a",
            "--catalog-dir",
            "b",
            "translate",
            "--locale",
            "zh_CN",
            "--context",
            "VideoPostCard",
            "--arg",
            "5",
            "%1m ago",
        ])
        .expect("valid arguments");
        assert_eq!(args.catalog_dirs, [PathBuf::from("a"), PathBuf::from("b")]);
        let Command::Translate {
            locale,
            args: params,
            source,
            count,
            ..
        } = args.command
        else {
            panic!("expected translate");
        };
        assert_eq!(locale, "zh_CN");
        assert_eq!(params, ["5"]);
        assert_eq!(source, "%1m ago");
        assert_eq!(count, None);
    }

    #[test]
    fn test_parse_ago_requires_seconds_or_since() {
        assert!(Args::try_parse_from(["tomeo-i18n", "ago", "--locale", "es_ES"]).is_err());
        let args = Args::try_parse_from(["tomeo-i18n", "ago", "--locale", "es_ES", "-5"])
            .expect("negative seconds accepted");
        assert!(matches!(
            args.command,
            Command::Ago {
                seconds: Some(-5),
                ..
            }
        ));
        assert!(
            Args::try_parse_from([
                "tomeo-i18n",
                "ago",
                "--locale",
                "es_ES",
                "--since",
                "2024-01-01T00:00:00Z",
            ])
            .is_ok()
        );
    }

    #[test]
    fn test_parse_check_needs_files() {
        assert!(Args::try_parse_from(["tomeo-i18n", "check"]).is_err());
        let args = Args::try_parse_from(["tomeo-i18n", "check", "--json", "x.ts"])
            .expect("valid arguments");
        assert!(matches!(args.command, Command::Check { json: true, .. }));
    }
}
