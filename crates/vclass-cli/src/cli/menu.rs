//! Interactive controller: login once, then loop over the main menu.

use std::io::{BufRead, Write};

use anyhow::Result;
use vclass_core::auth::LoginOutcome;
use vclass_core::config::Credentials;
use vclass_core::http::HttpClient;
use vclass_core::portal::Portal;
use vclass_core::retry::Sleeper;
use vclass_core::scrape::{Activity, Course};

use super::console::Console;

/// Main menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ListCourses,
    FilterCourses,
    Timeline,
    Calendar,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::ListCourses),
            "2" => Some(MenuChoice::FilterCourses),
            "3" => Some(MenuChoice::Timeline),
            "4" => Some(MenuChoice::Calendar),
            "5" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Answer to "pick a course by number".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Back,
    /// Zero-based index into the listed courses.
    Course(usize),
    OutOfRange,
    NotANumber,
}

impl Selection {
    pub fn parse(input: &str, count: usize) -> Self {
        match input.trim().parse::<usize>() {
            Ok(0) => Selection::Back,
            Ok(n) if n <= count => Selection::Course(n - 1),
            Ok(_) => Selection::OutOfRange,
            Err(_) => Selection::NotANumber,
        }
    }
}

const MENU: &[&str] = &[
    "",
    "===== Main Menu =====",
    "1. Courses (list all enrolled courses)",
    "2. Courses by lecturer (filter by name)",
    "3. Recent activity",
    "4. Calendar",
    "5. Exit",
];

pub struct Controller<C, S, R, W> {
    portal: Portal<S>,
    client: C,
    console: Console<R, W>,
}

impl<C, S, R, W> Controller<C, S, R, W>
where
    C: HttpClient,
    S: Sleeper,
    R: BufRead,
    W: Write,
{
    pub fn new(portal: Portal<S>, client: C, console: Console<R, W>) -> Self {
        Self {
            portal,
            client,
            console,
        }
    }

    pub fn console(&self) -> &Console<R, W> {
        &self.console
    }

    /// Log in, printing the outcome. Returns whether the menu may start.
    pub fn login(&mut self, creds: &Credentials) -> Result<bool> {
        self.console.say("Logging in to V-Class...")?;
        let outcome = self
            .portal
            .login(&mut self.client, creds, &mut self.console);
        match outcome {
            LoginOutcome::Authenticated => {
                self.console.say("Login successful. Welcome to V-Class!")?;
                Ok(true)
            }
            LoginOutcome::Rejected => {
                self.console
                    .say("Login failed: check your username and password.")?;
                Ok(false)
            }
            LoginOutcome::LoginPageUnavailable => {
                self.console
                    .say("Could not reach the login page. Please try again later.")?;
                Ok(false)
            }
            LoginOutcome::SubmitFailed(e) => {
                self.console.say(format!("Error while logging in: {}", e))?;
                Ok(false)
            }
        }
    }

    /// Run the main menu until Exit or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            for line in MENU {
                self.console.say(line)?;
            }
            let Some(input) = self.console.prompt("Choose an option (1/2/3/4/5): ")? else {
                break;
            };
            match MenuChoice::parse(&input) {
                Some(MenuChoice::ListCourses) => {
                    let courses = self.show_courses(None)?;
                    if !self.pick_courses(&courses)? {
                        break;
                    }
                }
                Some(MenuChoice::FilterCourses) => {
                    let Some(filter) = self
                        .console
                        .prompt("Lecturer name to filter by (empty for all): ")?
                    else {
                        break;
                    };
                    let courses = self.show_courses(Some(&filter))?;
                    if !self.pick_courses(&courses)? {
                        break;
                    }
                }
                Some(MenuChoice::Timeline) => {
                    self.show_timeline()?;
                }
                Some(MenuChoice::Calendar) => self.show_calendar()?,
                Some(MenuChoice::Exit) => {
                    self.console.say("Thanks for using the V-Class bot. Bye!")?;
                    break;
                }
                None => self.console.say("Invalid choice, pick one of the listed options.")?,
            }
        }
        Ok(())
    }

    /// Fetch and print the course list. A failed fetch prints a message and yields no courses.
    pub fn show_courses(&mut self, filter: Option<&str>) -> Result<Vec<Course>> {
        let courses = match self.portal.courses(&mut self.client, filter) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "course list unavailable");
                self.console.say("Failed to fetch the course list.")?;
                return Ok(Vec::new());
            }
        };
        self.console.say("")?;
        self.console.say("Available courses")?;
        if courses.is_empty() {
            self.console.say("  (none)")?;
        }
        for (i, course) in courses.iter().enumerate() {
            self.console
                .say(format!("  {}. {} -> {}", i + 1, course.title, course.link))?;
        }
        Ok(courses)
    }

    /// Course-detail loop. Returns false when input ended.
    fn pick_courses(&mut self, courses: &[Course]) -> Result<bool> {
        if courses.is_empty() {
            return Ok(true);
        }
        loop {
            let Some(input) = self
                .console
                .prompt("Pick a course to see its details (number, or 0 to go back): ")?
            else {
                return Ok(false);
            };
            match Selection::parse(&input, courses.len()) {
                Selection::Back => return Ok(true),
                Selection::Course(i) => self.show_course_detail(&courses[i].link)?,
                Selection::OutOfRange => self
                    .console
                    .say("Invalid course number. Pick one from the list.")?,
                Selection::NotANumber => self
                    .console
                    .say("Invalid input. Enter the number of a course.")?,
            }
        }
    }

    pub fn show_course_detail(&mut self, link: &str) -> Result<()> {
        match self.portal.course_detail(&mut self.client, link) {
            Ok(Some(description)) => {
                self.console.say("")?;
                self.console.say("Course details:")?;
                self.console.say(description)?;
            }
            Ok(None) => self.console.say("Course details not found.")?,
            Err(e) => {
                tracing::warn!(error = %e, "course detail unavailable");
                self.console.say("Failed to fetch the course details.")?;
            }
        }
        Ok(())
    }

    pub fn show_timeline(&mut self) -> Result<Vec<Activity>> {
        let activities = match self.portal.timeline(&mut self.client) {
            Ok(a) => a,
            Err(e) => {
                tracing::warn!(error = %e, "timeline unavailable");
                self.console.say("Failed to fetch recent activity.")?;
                return Ok(Vec::new());
            }
        };
        if activities.is_empty() {
            self.console.say("")?;
            self.console
                .say("Nothing due and no recent activity today. Enjoy your free time!")?;
            return Ok(activities);
        }
        self.console.say("")?;
        self.console.say("Recent activity")?;
        for a in &activities {
            self.console.say(format_activity(a))?;
        }
        Ok(activities)
    }

    /// Calendar is not scraped; the entry only reports that.
    pub fn show_calendar(&mut self) -> Result<()> {
        self.console.say("")?;
        self.console.say("Calendar not available")?;
        self.console.say("No events or dates found.")?;
        Ok(())
    }
}

pub fn format_activity(a: &Activity) -> String {
    let course = if a.course_name.is_empty() {
        "unknown course"
    } else {
        a.course_name.as_str()
    };
    match &a.deadline {
        Some(d) => format!("  - {} - {} (Deadline: {}) -> {}", a.title, course, d, a.link),
        None => format!("  - {} - {} -> {}", a.title, course, a.link),
    }
}
