//! A terminal front end for the election portal. It drives the same page
//! controllers as the browser and keeps its session in a JSON file.

use std::io::{self, BufRead, Write};
use std::path::Path;

use clap::{Arg, ArgAction, ArgMatches, Command};
use thiserror::Error;

use election_portal::config::{ClientConfig, ConfigError};
use election_portal::model::otp::{RegistrationNumber, RegistrationNumberError};
use election_portal::model::report::{ExportFormat, ExportKind, UnknownExport};
use election_portal::model::Role;
use election_portal::pages::{
    self, admin::AdminDashboard, candidate::CandidateDashboard, deactivated::DeactivatedPage,
    login::LoginPage, officer::OfficerDashboard, otp::OtpPage, vote::VotePage, AppContext,
};
use election_portal::router::{Location, NavState, Route};
use election_portal::storage::{FileStorage, StorageError};

const PROGRAM_NAME: &str = "ballot-cli";

const ABOUT_TEXT: &str = "Take part in an election from the terminal.

The backend is found via ELECTION_API_URL (default http://localhost:5000/api).

EXIT CODES:
     0: Success.
     1: Error.
     2: Not logged in, or not allowed.";

const DEFAULT_STORAGE: &str = ".election-portal.json";

const STORAGE: &str = "STORAGE";
const EMAIL: &str = "EMAIL";
const PASSWORD: &str = "PASSWORD";
const REG_NO: &str = "REGISTRATION_NUMBER";
const CODE: &str = "CODE";
const KIND: &str = "KIND";
const FORMAT: &str = "FORMAT";
const DIR: &str = "DIR";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    let reg_no = Arg::new(REG_NO)
        .help("Voter registration number, e.g. REG/2024/001")
        .action(ArgAction::Set)
        .required(true);

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .subcommand_required(true)
        .arg(
            Arg::new(STORAGE)
                .long("storage")
                .help("Where to keep the session between invocations")
                .action(ArgAction::Set)
                .default_value(DEFAULT_STORAGE)
                .global(true),
        )
        .subcommand(
            Command::new("login")
                .about("Log in as an administrator, officer or candidate")
                .arg(Arg::new(EMAIL).action(ArgAction::Set).required(true))
                .arg(
                    Arg::new(PASSWORD)
                        .long("password")
                        .action(ArgAction::Set)
                        .required(true),
                ),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(Command::new("whoami").about("Show the logged-in user"))
        .subcommand(
            Command::new("request-otp")
                .about("Send a one-time code to a voter")
                .arg(reg_no.clone()),
        )
        .subcommand(
            Command::new("verify-otp")
                .about("Confirm a one-time code and receive a ballot")
                .arg(reg_no)
                .arg(
                    Arg::new(CODE)
                        .help("The 6-digit code")
                        .action(ArgAction::Set)
                        .required(true),
                ),
        )
        .subcommand(Command::new("vote").about("Fill in and cast the ballot"))
        .subcommand(Command::new("dashboard").about("Show the dashboard for the logged-in role"))
        .subcommand(
            Command::new("export")
                .about("Download a report")
                .arg(
                    Arg::new(KIND)
                        .help("results, turnout, voters or audit-log")
                        .action(ArgAction::Set)
                        .required(true),
                )
                .arg(
                    Arg::new(FORMAT)
                        .long("format")
                        .help("csv or pdf")
                        .action(ArgAction::Set)
                        .default_value("csv"),
                )
                .arg(
                    Arg::new(DIR)
                        .long("dir")
                        .help("Directory to save into")
                        .action(ArgAction::Set)
                        .default_value("."),
                ),
        )
}

/// Errors that this program may produce.
#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Page(#[from] pages::Error),
    #[error(transparent)]
    Export(#[from] UnknownExport),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0}")]
    Denied(String),
}

impl Error {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Denied(_) => 2,
            _ => 1,
        }
    }
}

/// Send the visitor through the route guard; refuse unless they land on `route`.
fn enter(ctx: &AppContext, route: Route) -> Result<(), Error> {
    match ctx.open(route) {
        opened if opened == route => Ok(()),
        Route::Login => Err(Error::Denied("Not logged in.".into())),
        Route::AccountDeactivated => Err(Error::Denied(DeactivatedPage::open(ctx).message())),
        other => Err(Error::Denied(format!("Not allowed here; try the {other} page."))),
    }
}

fn arg<'a>(args: &'a ArgMatches, id: &str) -> &'a str {
    // Required or defaulted arguments are guaranteed to be present.
    args.get_one::<String>(id).map(String::as_str).unwrap_or_default()
}

/// Read a line, or `None` at end of input.
fn prompt(input: &mut impl BufRead, out: &mut impl Write, question: &str) -> io::Result<Option<String>> {
    write!(out, "{question} ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Parse a 1-based menu choice.
fn parse_choice(answer: &str, options: usize) -> Option<usize> {
    answer
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=options).contains(n))
        .map(|n| n - 1)
}

/// Walk the voter through the ballot. Returns whether the ballot was cast.
async fn vote(ctx: AppContext, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool, Error> {
    let Some(mut page) = VotePage::open(ctx).await? else {
        return Err(Error::Denied(
            "No usable ballot; verify your one-time code first.".into(),
        ));
    };
    if let Some(name) = &page.wizard.ballot().voter_name {
        writeln!(out, "Ballot for {name}")?;
    }

    loop {
        let Some(position) = page.wizard.current_position().cloned() else {
            break;
        };
        writeln!(out, "\n{} ({}% complete)", position.title, page.wizard.progress())?;
        for (i, candidate) in position.candidates.iter().enumerate() {
            let marker = if page.wizard.selection(&position.id) == Some(&candidate.id) {
                "*"
            } else {
                " "
            };
            writeln!(out, " {marker}{}. {}", i + 1, candidate.name)?;
        }
        let Some(answer) = prompt(input, out, "Choose a number, 'b' to go back:")? else {
            return Ok(false);
        };
        if answer == "b" {
            page.wizard.previous();
            continue;
        }
        match parse_choice(&answer, position.candidates.len()) {
            Some(i) => {
                page.wizard.toggle(&position.candidates[i].id);
            }
            None => {
                writeln!(out, "Please choose one of the listed candidates.")?;
                continue;
            }
        }
        if page.wizard.is_last() && page.wizard.can_submit() {
            break;
        }
        page.wizard.next();
    }

    let Some(review) = page.wizard.review() else {
        return Ok(false);
    };
    writeln!(out, "\nYour ballot:")?;
    for line in review.lines() {
        writeln!(out, "  {}: {}", line.position, line.candidate)?;
    }
    let answer = prompt(input, out, "Cast this ballot? [y/N]")?.unwrap_or_default();
    if !answer.eq_ignore_ascii_case("y") {
        writeln!(out, "Ballot not cast.")?;
        return Ok(false);
    }
    page.cast(review.confirm()).await?;
    writeln!(out, "Your vote has been recorded. Thank you.")?;
    Ok(true)
}

async fn dashboard(ctx: &AppContext, out: &mut impl Write) -> Result<(), Error> {
    let Some(user) = ctx.session().user() else {
        return Err(Error::Denied("Not logged in.".into()));
    };
    enter(ctx, Route::dashboard(user.role))?;
    let now = chrono::Utc::now();

    match user.role {
        Role::Admin => {
            let page = AdminDashboard::mount(ctx.clone()).await?;
            if let Some(banner) = page.banner(now) {
                writeln!(out, "{banner}")?;
            }
            let s = &page.summary;
            writeln!(
                out,
                "Positions: {}  Candidates: {}  Voters: {}  Votes: {}",
                s.positions, s.candidates, s.voters, s.votes
            )?;
            for position in &page.positions {
                writeln!(out, "  [{}] {}", position.id, position.title)?;
            }
            for officer in &page.officers {
                writeln!(out, "  officer {} <{}> {:?}", officer.name, officer.email, officer.status)?;
            }
        }
        Role::Officer => {
            let page = OfficerDashboard::mount(ctx.clone()).await?;
            if let Some(banner) = page.banner(now) {
                writeln!(out, "{banner}")?;
            }
            writeln!(out, "{} nominations:", page.filter())?;
            for nomination in &page.nominations {
                writeln!(
                    out,
                    "  [{}] {} for {}",
                    nomination.id,
                    nomination.candidate_name,
                    nomination.position_title.as_deref().unwrap_or("?")
                )?;
            }
            let voted = page.voters.iter().filter(|v| v.has_voted).count();
            writeln!(out, "Voters: {} ({voted} voted)", page.voters.len())?;
        }
        Role::Candidate => {
            let page = CandidateDashboard::mount(ctx.clone()).await?;
            if let Some(banner) = page.banner(now) {
                writeln!(out, "{banner}")?;
            }
            for nomination in &page.nominations {
                write!(
                    out,
                    "  {}: {}",
                    nomination.position_title.as_deref().unwrap_or("?"),
                    nomination.status
                )?;
                match &nomination.rejection_reason {
                    Some(reason) => writeln!(out, " ({reason})")?,
                    None => writeln!(out)?,
                }
            }
            for position in page.open_positions(now) {
                writeln!(out, "  open: [{}] {}", position.id, position.title)?;
            }
        }
    }
    Ok(())
}

async fn run(args: &ArgMatches) -> Result<(), Error> {
    let storage = FileStorage::open(arg(args, STORAGE))?;
    let ctx = AppContext::from_config(&ClientConfig::from_env()?, storage)?;
    let mut out = io::stdout();

    match args.subcommand() {
        Some(("login", sub)) => {
            let mut page = LoginPage::new(ctx.clone());
            page.form.email = arg(sub, EMAIL).to_string();
            page.form.password = arg(sub, PASSWORD).to_string();
            page.submit().await?;
            if let Some(user) = ctx.session().user() {
                writeln!(out, "Logged in as {} ({})", user.name, user.role)?;
            }
        }
        Some(("logout", _)) => {
            ctx.logout()?;
            writeln!(out, "Logged out.")?;
        }
        Some(("whoami", _)) => match ctx.session().user() {
            Some(user) => writeln!(out, "{} <{}>, {}", user.name, user.email, user.role)?,
            None => return Err(Error::Denied("Not logged in.".into())),
        },
        Some(("request-otp", sub)) => {
            let mut page = LoginPage::new(ctx.clone());
            page.form.registration_number = arg(sub, REG_NO).to_string();
            page.submit().await?;
            writeln!(out, "A one-time code has been sent.")?;
        }
        Some(("verify-otp", sub)) => {
            let reg_no: RegistrationNumber = arg(sub, REG_NO)
                .parse()
                .map_err(|e: RegistrationNumberError| {
                    pages::Error::invalid("registration_number", e.to_string())
                })?;
            ctx.navigator().push(Location::with_state(
                Route::LoginOtp,
                NavState::RegistrationNumber(reg_no),
            ));
            let Some(mut page) = OtpPage::open(ctx.clone()) else {
                return Err(Error::Denied("A registration number is required.".into()));
            };
            page.code = arg(sub, CODE).to_string();
            page.submit().await?;
            writeln!(out, "Verified. Run `{PROGRAM_NAME} vote` to cast your ballot.")?;
        }
        Some(("vote", _)) => {
            // A `StdinLock` cannot be held across the awaits in `vote`.
            let mut input = io::BufReader::new(io::stdin());
            vote(ctx.clone(), &mut input, &mut out).await?;
        }
        Some(("dashboard", _)) => dashboard(&ctx, &mut out).await?,
        Some(("export", sub)) => {
            let kind: ExportKind = arg(sub, KIND).parse()?;
            let format: ExportFormat = arg(sub, FORMAT).parse()?;
            enter(&ctx, Route::Reports)?;
            let path = pages::reports::ReportsPage::mount(ctx.clone())
                .await?
                .export(kind, format, Path::new(arg(sub, DIR)))
                .await?;
            writeln!(out, "Saved {}", path.display())?;
        }
        _ => unreachable!("clap requires a subcommand"),
    }

    for toast in ctx.toasts().drain() {
        eprintln!("{toast}");
    }
    Ok(())
}

/// Print an error the way a form would show it.
fn report(err: &Error) {
    match err {
        Error::Page(pages::Error::Validation(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("{field}: {message}");
            }
        }
        _ => eprintln!("Error: {err}"),
    }
}

#[rocket::main]
async fn main() {
    let args = cli().get_matches();
    let exit_code = match run(&args).await {
        Ok(()) => 0,
        Err(err) => {
            report(&err);
            err.exit_code()
        }
    };
    std::process::exit(exit_code.into())
}
