//! CLI for the V-Class portal bot.

mod console;
mod menu;

use std::io::{BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use vclass_core::config::{self, Credentials};
use vclass_core::http::{HttpClient, Session, SessionOptions};
use vclass_core::portal::Portal;
use vclass_core::retry::Sleeper;

use console::Console;
use menu::Controller;

/// Top-level CLI for the V-Class portal bot.
#[derive(Debug, Parser)]
#[command(name = "vclass")]
#[command(about = "V-Class bot: log in, list courses, course details and recent activity", long_about = None)]
pub struct Cli {
    /// Portal base URL, overriding `base_url` from config.toml.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// What to do after logging in (default: interactive menu).
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Interactive menu.
    Menu,

    /// Print enrolled courses and exit.
    Courses {
        /// Only courses whose title contains this text (case-insensitive).
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,
    },

    /// Print the description of one course page.
    Detail {
        /// Course link as printed by `courses`.
        link: String,
    },

    /// Print recent activities and deadlines.
    Timeline,

    /// Calendar placeholder.
    Calendar,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        Cli::parse().run()
    }

    pub fn run(self) -> Result<()> {
        let mut cfg = config::load_or_init()?;
        if let Some(base_url) = self.base_url {
            cfg.base_url = base_url;
        }
        tracing::debug!("loaded config: {:?}", cfg);

        let command = self.command.unwrap_or(CliCommand::Menu);
        let portal = Portal::from_config(&cfg)?;
        let session = Session::new(SessionOptions::from(&cfg))?;
        let mut controller = Controller::new(portal, session, Console::stdio());
        dispatch(&mut controller, command, Credentials::from_env)
    }
}

/// Log in (except for `calendar`) and run `command`. A failed login has
/// already been reported on the console and ends the run normally.
pub(crate) fn dispatch<C, S, R, W>(
    controller: &mut Controller<C, S, R, W>,
    command: CliCommand,
    credentials: impl FnOnce() -> Result<Credentials>,
) -> Result<()>
where
    C: HttpClient,
    S: Sleeper,
    R: BufRead,
    W: Write,
{
    if command == CliCommand::Calendar {
        return controller.show_calendar();
    }

    let creds = credentials()?;
    if !controller.login(&creds)? {
        tracing::info!("login failed, exiting");
        return Ok(());
    }

    match command {
        CliCommand::Menu => controller.run()?,
        CliCommand::Courses { filter } => {
            controller.show_courses(filter.as_deref())?;
        }
        CliCommand::Detail { link } => controller.show_course_detail(&link)?,
        CliCommand::Timeline => {
            controller.show_timeline()?;
        }
        CliCommand::Calendar => controller.show_calendar()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
