use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about)]
pub struct Arguments {
    #[arg(short = 'v', long = None, env = "STOPWATCH_VERBOSITY", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Never erase echoed input with terminal escape sequences.
    #[arg(short, long, env = "STOPWATCH_PLAIN")]
    pub plain: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_to_no_flags() {
        let arguments = Arguments::try_parse_from(["stopwatch"]).unwrap();

        assert_eq!(arguments.verbosity, 0);
        assert!(!arguments.plain);
    }

    #[test]
    fn counts_verbosity() {
        let arguments = Arguments::try_parse_from(["stopwatch", "-vvv", "--plain"]).unwrap();

        assert_eq!(arguments.verbosity, 3);
        assert!(arguments.plain);
    }
}
