//! `generate` subcommand: shell completions and man pages.
use anyhow::{Context, Result};
use clap::Command;
use clap_complete::Shell;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes a completion script for `shell` to `out`.
pub fn write_completions<W: Write>(cmd: &mut Command, shell: Shell, out: &mut W) {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, out);
}

/// Renders a man page for `cmd` and one for every nested subcommand into
/// `output_dir` (the current directory when `None`). Subcommand pages are
/// named `<parent>-<sub>.1`. Returns the written paths.
///
/// # Errors
///
/// Returns an error if the directory or a page cannot be written.
pub fn write_man_pages(cmd: &Command, output_dir: Option<PathBuf>) -> Result<Vec<PathBuf>> {
    let output_dir = match output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Opening current directory")?,
    };
    std::fs::create_dir_all(&output_dir).context("create man page directory")?;

    let mut written = vec![];
    let mut pending = vec![(cmd.get_name().to_string(), cmd.clone())];
    while let Some((page_name, page_cmd)) = pending.pop() {
        for sub in page_cmd.get_subcommands() {
            pending.push((format!("{page_name}-{}", sub.get_name()), sub.clone()));
        }
        // clap_mangen takes the page title from the command name
        let title: &'static str = Box::leak(page_name.clone().into_boxed_str());
        let path = render_page(page_cmd.name(title), &output_dir, &page_name)?;
        log::info!("Generated {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn render_page(cmd: Command, output_dir: &Path, page_name: &str) -> Result<PathBuf> {
    let path = output_dir.join(format!("{page_name}.1"));
    let mut file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    clap_mangen::Man::new(cmd)
        .render(&mut file)
        .with_context(|| format!("failed to render {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Command {
        Command::new("tool").subcommand(
            Command::new("gen").subcommand(Command::new("man")),
        )
    }

    #[test]
    fn man_pages_for_every_subcommand() {
        let dir = tempfile::tempdir().unwrap();
        let mut written = write_man_pages(&sample(), Some(dir.path().to_path_buf())).unwrap();
        written.sort();
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["tool-gen-man.1", "tool-gen.1", "tool.1"]);
    }

    #[test]
    fn completions_mention_command() {
        let mut out = vec![];
        write_completions(&mut sample(), Shell::Bash, &mut out);
        assert!(String::from_utf8(out).unwrap().contains("tool"));
    }
}
