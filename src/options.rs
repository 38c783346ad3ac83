use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use zxlife::rules::RuleSet;

const USAGE: &str = "usage: zxlife [options]";

/// Delay between frames when rendering and no `--sleep` was given
const DEFAULT_FRAME_SLEEP: Duration = Duration::from_millis(20);

pub struct Args {
    matches: getopts::Matches,
}

impl Args {
    fn options() -> getopts::Options {
        let mut opts = getopts::Options::new();
        opts.optflag("h", "help", "print this help menu");
        opts.optflag("", "headless", "run without drawing to the terminal");
        opts.optopt("i", "rle", "seed the region from an RLE pattern", "FILE");
        opts.optopt("r", "rule", "override the rule, e.g. B3/S23", "RULE");
        opts.optopt(
            "s",
            "sleep",
            "the amount of time to sleep between generations",
            "MILLIS",
        );
        opts
    }

    /// Returns `None` if only help was asked for.
    fn new<T: AsRef<str>>(args: &[T]) -> anyhow::Result<Option<Self>> {
        let opts = Self::options();
        let matches = opts
            .parse(args.iter().map(T::as_ref))
            .context("Invalid arguments")?;

        if matches.opt_present("help") {
            println!("{}", opts.usage(USAGE));
            return Ok(None);
        }

        Ok(Some(Self { matches }))
    }

    pub fn from_env() -> anyhow::Result<Option<Self>> {
        let env = std::env::args().skip(1).collect::<Vec<_>>();
        Self::new(&env)
    }

    pub fn headless(&self) -> bool {
        self.matches.opt_present("headless")
    }

    pub fn rle_file(&self) -> Option<PathBuf> {
        self.matches.opt_str("rle").map(PathBuf::from)
    }

    pub fn rule(&self) -> anyhow::Result<Option<RuleSet>> {
        self.matches
            .opt_str("rule")
            .map(|s| s.parse::<RuleSet>().with_context(|| format!("Invalid rule \"{s}\"")))
            .transpose()
    }

    pub fn sleep(&self) -> anyhow::Result<Option<Duration>> {
        let millis: Option<u64> = self
            .matches
            .opt_get("sleep")
            .context("--sleep expects a number of milliseconds")?;

        Ok(match millis {
            Some(millis) => Some(Duration::from_millis(millis)),
            None if !self.headless() => Some(DEFAULT_FRAME_SLEEP),
            None => None,
        })
    }
}
