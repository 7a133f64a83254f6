//! Shell completions generation.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::PomoError;

/// Generate a completion script, or installation instructions when
/// `install` is set.
///
/// # Errors
///
/// Returns an error if the generated script is not valid UTF-8.
pub fn completions(shell: Shell, install: bool) -> Result<String, PomoError> {
    if install {
        return Ok(install_instructions(shell));
    }

    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "pomo", &mut buf);
    String::from_utf8(buf)
        .map_err(|e| PomoError::InvalidInput(format!("Completion script is not UTF-8: {e}")))
}

fn install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => r"# Add to ~/.bashrc:
source <(pomo completions bash)"
            .to_string(),

        Shell::Zsh => r"# Save to your fpath:
pomo completions zsh > ~/.zsh/completions/_pomo
# Then add to ~/.zshrc:
fpath=(~/.zsh/completions $fpath)
autoload -Uz compinit && compinit"
            .to_string(),

        Shell::Fish => r"# Save to fish completions directory:
pomo completions fish > ~/.config/fish/completions/pomo.fish"
            .to_string(),

        Shell::PowerShell => r"# Add to your PowerShell profile ($PROFILE):
pomo completions powershell | Out-String | Invoke-Expression"
            .to_string(),

        Shell::Elvish => r"# Save to elvish lib directory:
pomo completions elvish > ~/.elvish/lib/pomo.elv
# Then add to ~/.elvish/rc.elv:
use pomo"
            .to_string(),

        _ => format!("# Write the script somewhere {shell} loads completions from:\npomo completions {shell}"),
    }
}
