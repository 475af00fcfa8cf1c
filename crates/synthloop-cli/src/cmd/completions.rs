use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `synthloop completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Generate a shell completion script for `synthloop` on stdout.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let mut out = std::io::stdout().lock();
    generate(shell, command, "synthloop", &mut out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    #[command(name = "synthloop")]
    struct Wrapper {
        #[command(flatten)]
        args: CompletionsArgs,
    }

    #[test]
    fn parses_known_shells() {
        let w = Wrapper::parse_from(["synthloop", "zsh"]);
        assert_eq!(w.args.shell, Shell::Zsh);
        assert!(Wrapper::try_parse_from(["synthloop", "tcsh"]).is_err());
    }

    #[test]
    fn bash_script_names_the_binary() {
        use clap::CommandFactory;

        let mut buf = Vec::new();
        generate(Shell::Bash, &mut Wrapper::command(), "synthloop", &mut buf);
        let script = String::from_utf8(buf).expect("utf8");
        assert!(script.contains("_synthloop"));
    }
}
