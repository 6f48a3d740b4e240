//! Command-line arguments.
//!
//! Every release option can come from the configuration file or a flag; a
//! flag that is given wins over the file.

use clap::{Args, Parser, Subcommand};

use crate::config::ReleaseConfig;

#[derive(Debug, Parser)]
#[command(
    name = "git-release",
    version,
    about = "Bump versions, write the changelog and tag releases from conventional commits"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub options: ReleaseArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the version the next release would get, without changing anything
    GetVersion,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct ReleaseArgs {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[arg(
        short = 'C',
        long,
        global = true,
        help = "Directory version files and scripts are resolved against"
    )]
    pub working_dir: Option<String>,

    #[arg(long, global = true, help = "Commit message, {version} is replaced by the tag")]
    pub git_message: Option<String>,

    #[arg(long, global = true, help = "Name of the release commit author")]
    pub git_user_name: Option<String>,

    #[arg(long, global = true, help = "Email of the release commit author")]
    pub git_user_email: Option<String>,

    #[arg(long, global = true, help = "Prefix of release tags")]
    pub tag_prefix: Option<String>,

    #[arg(long, global = true, help = "Changelog file, \"false\" to skip writing it")]
    pub output_file: Option<String>,

    #[arg(long, global = true, help = "Comma-separated version files, or \"git\"")]
    pub version_file: Option<String>,

    #[arg(long, global = true, help = "Path of the version inside the version files")]
    pub version_path: Option<String>,

    #[arg(long, global = true, help = "Version used when none can be found")]
    pub fallback_version: Option<String>,

    #[arg(long, global = true, help = "Only count commits touching this path")]
    pub commit_path: Option<String>,

    #[arg(long, global = true, help = "Remote to push the release to")]
    pub remote: Option<String>,

    #[arg(long, global = true, help = "Script run before the release commit")]
    pub pre_commit: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Script that may replace the version and the tag"
    )]
    pub pre_changelog_generation: Option<String>,

    #[arg(long, global = true, help = "Take the version from tags, not version files")]
    pub skip_version_file: bool,

    #[arg(long, global = true, help = "Do not create a release commit")]
    pub skip_commit: bool,

    #[arg(long, global = true, help = "Do nothing when there is nothing to release")]
    pub skip_on_empty: bool,

    #[arg(long, global = true, help = "Create the release locally without pushing")]
    pub skip_push: bool,

    #[arg(long, global = true, help = "Preview what would happen without making changes")]
    pub dry_run: bool,

    #[arg(short, long, global = true, help = "Show debug logs")]
    pub verbose: bool,
}

impl ReleaseArgs {
    /// Override `config` with every flag that was given
    pub fn apply(&self, config: &mut ReleaseConfig) {
        let strings = [
            (&self.git_message, &mut config.git_message),
            (&self.git_user_name, &mut config.git_user_name),
            (&self.git_user_email, &mut config.git_user_email),
            (&self.tag_prefix, &mut config.tag_prefix),
            (&self.output_file, &mut config.output_file),
            (&self.version_file, &mut config.version_file),
            (&self.version_path, &mut config.version_path),
            (&self.fallback_version, &mut config.fallback_version),
            (&self.commit_path, &mut config.commit_path),
            (&self.remote, &mut config.remote),
        ];
        for (flag, field) in strings {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }

        if self.pre_commit.is_some() {
            config.pre_commit = self.pre_commit.clone();
        }
        if self.pre_changelog_generation.is_some() {
            config.pre_changelog_generation = self.pre_changelog_generation.clone();
        }

        config.skip_version_file |= self.skip_version_file;
        config.skip_commit |= self.skip_commit;
        config.skip_on_empty |= self.skip_on_empty;
        config.skip_push |= self.skip_push;
    }
}
