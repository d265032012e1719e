use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    calendar::{MonthView, WeekStart},
    drafts::Draft,
    execute, load_settings, Credentials, DashboardOutcome, DashboardRequest, FacilitatorApi,
    HttpFacilitatorApi, Session,
};
use shared::{
    domain::{EventId, Role, UserId},
    protocol::{Event, NewEvent, NewParent, NewVolunteer, PLACEHOLDER_PASSWORD, SCHOOL_OPTIONS},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Facilitator dashboard from the command line")]
struct Args {
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long, env = "FACILITATOR_TOKEN", hide_env_values = true)]
    token: String,
    #[arg(long, env = "FACILITATOR_USER_ID")]
    user_id: i64,
    #[arg(long, env = "FACILITATOR_ROLE", default_value = "volunteer")]
    role: Role,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the facilitator's profile.
    Profile,
    /// List every event.
    Events,
    /// Print a month grid with event dates starred.
    Calendar {
        /// Month as YYYY-MM; defaults to the current month.
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        monday_first: bool,
    },
    AddEvent(EventFields),
    UpdateEvent {
        id: i64,
        #[command(flatten)]
        fields: EventPatch,
    },
    DeleteEvent { id: i64 },
    AddParent(ParentFields),
    AddVolunteer(VolunteerFields),
}

#[derive(ClapArgs, Debug)]
struct EventFields {
    #[arg(long)]
    title: String,
    #[arg(long = "type")]
    kind: String,
    #[arg(long)]
    start_location: String,
    #[arg(long)]
    end_location: String,
    #[arg(long)]
    date: String,
    #[arg(long)]
    start_time: String,
    #[arg(long)]
    end_time: String,
}

#[derive(ClapArgs, Debug)]
struct EventPatch {
    #[arg(long)]
    title: Option<String>,
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    start_location: Option<String>,
    #[arg(long)]
    end_location: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    start_time: Option<String>,
    #[arg(long)]
    end_time: Option<String>,
}

impl EventPatch {
    fn apply(self, event: Event) -> Event {
        Event {
            title: self.title.unwrap_or(event.title),
            kind: self.kind.unwrap_or(event.kind),
            start_location: self.start_location.unwrap_or(event.start_location),
            end_location: self.end_location.unwrap_or(event.end_location),
            date: self.date.unwrap_or(event.date),
            start_time: self.start_time.unwrap_or(event.start_time),
            end_time: self.end_time.unwrap_or(event.end_time),
            id: event.id,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct ParentFields {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
}

#[derive(ClapArgs, Debug)]
struct VolunteerFields {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    birthdate: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    interest: String,
    #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(SCHOOL_OPTIONS))]
    preferred_school: String,
}

fn require_complete<D: Draft>(draft: &D) -> Result<()> {
    if let Some(problem) = draft.submit_problem() {
        bail!(problem);
    }
    Ok(())
}

async fn run(api: &dyn FacilitatorApi, creds: &Credentials, request: DashboardRequest) -> Result<DashboardOutcome> {
    match execute(api, creds, request).await {
        DashboardOutcome::Rejected {
            operation, status, ..
        } => Err(anyhow!("{} rejected with status {status}", operation.name())),
        DashboardOutcome::Failed { operation, message } => {
            Err(anyhow!("{} failed: {message}", operation.name()))
        }
        DashboardOutcome::Skipped { operation } => {
            Err(anyhow!("{} skipped: nothing was sent", operation.name()))
        }
        outcome => Ok(outcome),
    }
}

fn print_event(event: &Event) {
    println!(
        "#{:<5} {:<28} {:<12} {} {}-{}  {} -> {}",
        event.id,
        event.title,
        event.kind,
        event
            .calendar_date()
            .map(|date| date.to_string())
            .unwrap_or_else(|_| event.date.clone()),
        event.start_time,
        event.end_time,
        event.start_location,
        event.end_location,
    );
}

fn print_calendar(month: MonthView, week_start: WeekStart, events: &[Event]) {
    println!("{}", month.title());
    println!(
        "{}",
        week_start
            .header()
            .iter()
            .map(|day| format!("{day:>4}"))
            .collect::<String>()
    );
    for week in month.cells(week_start, events).chunks(7) {
        let line: String = week
            .iter()
            .map(|cell| {
                if !cell.in_month {
                    "    ".to_string()
                } else if cell.marked {
                    format!("{:>3}*", cell.date.format("%-d"))
                } else {
                    format!("{:>3} ", cell.date.format("%-d"))
                }
            })
            .collect();
        println!("{}", line.trim_end());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings()?;
    if let Some(api_url) = &args.api_url {
        settings = settings.with_api_url(api_url.as_str())?;
    }
    let session = Session {
        token: Some(args.token.clone()),
        user_id: Some(UserId(args.user_id)),
        role: Some(args.role),
        is_facilitator: true,
    };
    let creds = session
        .facilitator_credentials()
        .context("session is not a facilitator session")?;
    let api = HttpFacilitatorApi::new(&settings)?;
    tracing::debug!(api_url = api.api_url(), command = ?args.command, "running command");

    match args.command {
        Command::Profile => {
            let profile = api.fetch_profile(&creds).await?;
            println!("{} <{}>", profile.display_name(), profile.email);
            if let Some(school_id) = profile.school_id {
                println!("school: {school_id}");
            }
            if let Some(phone) = profile.phone {
                println!("phone: {phone}");
            }
        }
        Command::Events => {
            let events = api.list_events(&creds).await?;
            if events.is_empty() {
                println!("No events");
            }
            events.iter().for_each(print_event);
        }
        Command::Calendar {
            month,
            monday_first,
        } => {
            let month = match month {
                Some(raw) => MonthView::parse(&raw).with_context(|| format!("invalid month '{raw}'"))?,
                None => MonthView::containing(Local::now().date_naive())
                    .context("current month is outside the supported date range")?,
            };
            let week_start = if monday_first {
                WeekStart::Monday
            } else {
                WeekStart::Sunday
            };
            let events = api.list_events(&creds).await?;
            print_calendar(month, week_start, &events);
        }
        Command::AddEvent(fields) => {
            let draft = NewEvent {
                title: fields.title,
                kind: fields.kind,
                start_location: fields.start_location,
                end_location: fields.end_location,
                date: fields.date,
                start_time: fields.start_time,
                end_time: fields.end_time,
            };
            require_complete(&draft)?;
            if let DashboardOutcome::EventCreated(event) =
                run(&api, &creds, DashboardRequest::CreateEvent(draft)).await?
            {
                println!("Event created!");
                print_event(&event);
            }
        }
        Command::UpdateEvent { id, fields } => {
            let events = api.list_events(&creds).await?;
            let current = events
                .into_iter()
                .find(|event| event.id == EventId(id))
                .with_context(|| format!("no event with id {id}"))?;
            if let DashboardOutcome::EventUpdated(event) =
                run(&api, &creds, DashboardRequest::UpdateEvent(fields.apply(current))).await?
            {
                println!("Event updated!");
                print_event(&event);
            }
        }
        Command::DeleteEvent { id } => {
            run(&api, &creds, DashboardRequest::DeleteEvent(EventId(id))).await?;
            println!("Event deleted");
        }
        Command::AddParent(fields) => {
            let draft = NewParent {
                first_name: fields.first_name,
                last_name: fields.last_name,
                email: fields.email,
                phone: fields.phone,
                address: fields.address,
                ..NewParent::default()
            };
            require_complete(&draft)?;
            run(&api, &creds, DashboardRequest::CreateParent(draft)).await?;
            println!("Parent created! (Password auto-set to '{PLACEHOLDER_PASSWORD}')");
        }
        Command::AddVolunteer(fields) => {
            let draft = NewVolunteer {
                first_name: fields.first_name,
                last_name: fields.last_name,
                birthdate: fields.birthdate,
                email: fields.email,
                phone: fields.phone,
                interest: fields.interest,
                preferred_school: fields.preferred_school,
            };
            require_complete(&draft)?;
            let profile = api.fetch_profile(&creds).await?;
            run(
                &api,
                &creds,
                DashboardRequest::CreateVolunteer {
                    draft,
                    school_id: profile.school_id,
                },
            )
            .await?;
            println!("Volunteer created! (Password auto-set to '{PLACEHOLDER_PASSWORD}')");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Event {
        Event {
            id: EventId(5),
            title: "Ride".into(),
            kind: "ride".into(),
            start_location: "School".into(),
            end_location: "Park".into(),
            date: "2024-05-10".into(),
            start_time: "09:00".into(),
            end_time: "10:00".into(),
        }
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let args = Args::try_parse_from([
            "desktop",
            "--token",
            "tok",
            "--user-id",
            "7",
            "update-event",
            "5",
            "--title",
            "Long ride",
        ])
        .expect("args");
        let Command::UpdateEvent { id, fields } = args.command else {
            panic!("expected update-event");
        };
        assert_eq!(id, 5);
        let patched = fields.apply(event());
        assert_eq!(patched.title, "Long ride");
        assert_eq!(patched.end_location, "Park");
        assert_eq!(patched.id, EventId(5));
    }

    #[test]
    fn volunteer_school_must_be_a_known_option() {
        let parsed = Args::try_parse_from([
            "desktop",
            "--token",
            "tok",
            "--user-id",
            "7",
            "add-volunteer",
            "--first-name",
            "Val",
            "--last-name",
            "Ortiz",
            "--birthdate",
            "2001-02-03",
            "--email",
            "val@example.org",
            "--phone",
            "555",
            "--interest",
            "repair",
            "--preferred-school",
            "Nowhere High",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn blank_fields_are_reported() {
        let draft = NewEvent {
            title: "Ride".into(),
            ..NewEvent::default()
        };
        let err = require_complete(&draft).expect_err("incomplete");
        assert!(err.to_string().contains("Start Location"));
    }

    #[test]
    fn malformed_email_is_not_reported_as_blank() {
        let draft = NewVolunteer {
            first_name: "Val".into(),
            last_name: "Ortiz".into(),
            birthdate: "2001-02-03".into(),
            email: "val.example.org".into(),
            phone: "555".into(),
            interest: "repair".into(),
            preferred_school: SCHOOL_OPTIONS[0].into(),
        };
        let err = require_complete(&draft).expect_err("malformed");
        assert_eq!(err.to_string(), "Email must contain '@'.");
    }
}
