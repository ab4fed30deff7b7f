use std::path::PathBuf;

use clap::Parser;

use crate::error::CrawlError;

/// Download xkcd comics with their titles and captions.
///
/// With one page number, downloads pages 1 to END. With two, downloads
/// START to END inclusive. Pages already in the record are skipped.
#[derive(Debug, Parser)]
#[command(
    name = "xkcd-fetch",
    version,
    override_usage = "xkcd-fetch [OPTIONS] [START] <END>",
    after_help = "Examples:\n  xkcd-fetch 100 125    downloads pages 100 to 125\n  xkcd-fetch 30         downloads pages 1 to 30"
)]
pub struct Cli {
    /// START when END follows, otherwise END
    #[arg(value_name = "START", value_parser = clap::value_parser!(u32).range(1..))]
    pub first: u32,

    #[arg(value_name = "END", value_parser = clap::value_parser!(u32).range(1..))]
    pub second: Option<u32>,

    /// Number of concurrent workers
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,

    /// Directory for images and the record file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The inclusive page range asked for.
    pub fn range(&self) -> Result<(u32, u32), CrawlError> {
        let (start, end) = match self.second {
            Some(end) => (self.first, end),
            None => (1, self.first),
        };
        if start > end {
            return Err(CrawlError::Usage(format!(
                "start page {} is after end page {}",
                start, end
            )));
        }
        Ok((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("xkcd-fetch").chain(args.iter().copied()))
    }

    #[test]
    fn one_argument_means_from_first_page() {
        assert_eq!(parse(&["50"]).unwrap().range().unwrap(), (1, 50));
    }

    #[test]
    fn two_arguments_are_inclusive_range() {
        assert_eq!(parse(&["100", "102"]).unwrap().range().unwrap(), (100, 102));
        assert_eq!(parse(&["7", "7"]).unwrap().range().unwrap(), (7, 7));
    }

    #[test]
    fn reversed_range_is_usage_error() {
        let err = parse(&["10", "2"]).unwrap().range().unwrap_err();
        assert_eq!(err.kind(), "usage");
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["abc"]).is_err());
        assert!(parse(&["0"]).is_err());
        assert!(parse(&["-3"]).is_err());
        assert!(parse(&["1", "2", "3"]).is_err());
    }

    #[test]
    fn zero_threads_is_rejected() {
        let err = parse(&["--threads", "0", "5"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn options_are_parsed() {
        let cli = parse(&["--threads", "8", "-o", "comics", "5"]).unwrap();
        assert_eq!(cli.threads, Some(8));
        assert_eq!(cli.output, Some(PathBuf::from("comics")));
        assert_eq!(cli.range().unwrap(), (1, 5));
    }
}
