mod persistence;
mod render;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use helpdesk_models::{EmailAddress, ProfileUpdate, SignupRequest, TicketId};
use helpdesk_sdk::{
    reveal_or_empty, BackendClient, CrmAdapter, EmptyReason, Enricher, ExposeSecret, SdkConfig,
    SdkError, Session, TicketView, TicketingAdapter, ViewState,
};
use tracing_subscriber::EnvFilter;

use crate::persistence::SessionStore;

#[derive(Parser, Debug)]
#[command(name = "helpdesk")]
#[command(author, version, about = "Helpdesk tickets with CRM context", long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides HELPDESK_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "HELPDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account with Freshdesk settings
    Signup(SignupArgs),
    /// Forget the stored session
    Logout,
    /// Show or edit the profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Freshdesk tickets
    #[command(subcommand)]
    Tickets(TicketCommand),
    /// HubSpot contacts
    #[command(subcommand)]
    Contacts(ContactCommand),
}

#[derive(Args, Debug)]
pub struct SignupArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "HELPDESK_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    /// Freshdesk subdomain (the `acme` in acme.freshdesk.com)
    #[arg(long)]
    pub freshdesk_domain: String,
    /// Freshdesk API key; the backend stores it sealed
    #[arg(long, env = "FRESHDESK_API_KEY", hide_env_values = true)]
    pub freshdesk_api_key: String,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Print the profile with the API key masked
    Show,
    /// Change profile fields
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub freshdesk_domain: Option<String>,
    #[arg(long)]
    pub freshdesk_api_key: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TicketCommand {
    /// List tickets with status and priority
    List,
    /// Show one ticket with its CRM contact and conversation
    Show { id: TicketId },
}

#[derive(Subcommand, Debug)]
pub enum ContactCommand {
    /// Whether HubSpot is linked
    Status,
    /// List all contacts
    List,
    /// Look up a contact by email
    Find { email: EmailAddress },
    /// Print the URL that links HubSpot to this account
    ConnectUrl,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = SdkConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url);
    }
    let client = BackendClient::new(&config).context("failed to build HTTP client")?;
    let store = SessionStore::default_location().context("could not determine config directory")?;

    match cli.command {
        Commands::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            store.save(&session).context("failed to store session")?;
            println!("Logged in as {}", session.user.display_name());
        }
        Commands::Signup(args) => {
            let request = SignupRequest {
                first_name: args.first_name,
                last_name: args.last_name,
                email: args.email,
                password: args.password,
                freshdesk_domain: args.freshdesk_domain,
                freshdesk_api_key: args.freshdesk_api_key,
            };
            let session = client.signup(&request).await?;
            store.save(&session).context("failed to store session")?;
            println!("Account created for {}", session.user.display_name());
        }
        Commands::Logout => {
            if store.clear().context("failed to remove session")? {
                println!("Logged out");
            } else {
                println!("Not logged in");
            }
        }
        Commands::Profile(command) => {
            let session = require_session(&store)?;
            let api = client.authenticated(&session);
            match command {
                ProfileCommand::Show => {
                    let cipher = config.cipher().context("invalid cipher passphrase")?;
                    let profile = api.profile().await?;
                    let key = reveal_or_empty(&cipher, profile.freshdesk_api_key.as_ref());
                    print!("{}", render::profile(&profile, &render::mask(key.expose_secret())));
                }
                ProfileCommand::Update(args) => {
                    let update = ProfileUpdate {
                        first_name: args.first_name,
                        last_name: args.last_name,
                        freshdesk_domain: args.freshdesk_domain,
                        freshdesk_api_key: args.freshdesk_api_key,
                    };
                    if update.is_empty() {
                        bail!("nothing to update; pass at least one field");
                    }
                    api.update_profile(&session.user.id, &update).await?;
                    let mut session = session;
                    if update.freshdesk_api_key.is_some() {
                        // Only the backend holds the sealed form of a new key.
                        session.user = api.profile().await?;
                    } else {
                        session.user.apply(&update);
                    }
                    store.save(&session).context("failed to store session")?;
                    println!("Profile updated");
                }
            }
        }
        Commands::Tickets(command) => {
            let session = require_session(&store)?;
            let api = client.authenticated(&session);
            match command {
                TicketCommand::List => {
                    if let Some(tickets) = or_setup_prompt(api.freshdesk().list_tickets().await)? {
                        if tickets.is_empty() {
                            println!("No tickets");
                        }
                        for ticket in &tickets {
                            println!("{}", render::ticket_row(ticket));
                        }
                    }
                }
                TicketCommand::Show { id } => {
                    let view = TicketView::new(Enricher::new(api.freshdesk(), api.hubspot()));
                    match view.open(Some(id)).await {
                        ViewState::Ready(ticket) => print!("{}", render::ticket_detail(&ticket)),
                        ViewState::Empty {
                            reason: EmptyReason::NotConfigured(integration),
                            ..
                        } => println!("{}", integration.setup_hint()),
                        ViewState::Empty {
                            reason: EmptyReason::Failed(message),
                            ..
                        } => bail!("could not load ticket {id}: {message}"),
                        other => bail!("ticket {id} is unavailable ({other:?})"),
                    }
                }
            }
        }
        Commands::Contacts(command) => {
            let session = require_session(&store)?;
            let api = client.authenticated(&session);
            let hubspot = api.hubspot();
            match command {
                ContactCommand::Status => {
                    if let Some(status) = or_setup_prompt(hubspot.get_status().await)? {
                        if status.connected {
                            println!("HubSpot connected");
                        } else {
                            println!("HubSpot not connected; run `helpdesk contacts connect-url`");
                        }
                    }
                }
                ContactCommand::List => {
                    if let Some(contacts) = or_setup_prompt(hubspot.list_contacts().await)? {
                        if contacts.is_empty() {
                            println!("No contacts");
                        }
                        for contact in &contacts {
                            println!("{}", render::contact_row(contact));
                        }
                    }
                }
                ContactCommand::Find { email } => {
                    if let Some(found) = or_setup_prompt(hubspot.find_contact_by_email(&email).await)? {
                        match found {
                            Some(contact) => print!("{}", render::contact_card(&contact)),
                            None => println!("{}", render::no_contact()),
                        }
                    }
                }
                ContactCommand::ConnectUrl => {
                    println!("Open this URL in a browser to link HubSpot:");
                    println!("{}", api.hubspot_connect_url()?);
                }
            }
        }
    }

    Ok(())
}

fn require_session(store: &SessionStore) -> Result<Session> {
    store
        .load()
        .with_context(|| format!("failed to read {}", store.path().display()))?
        .context("not logged in; run `helpdesk login` first")
}

/// Print the setup hint for an unconfigured integration instead of failing.
fn or_setup_prompt<T>(result: Result<T, SdkError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(SdkError::NotConfigured { integration }) => {
            println!("{}", integration.setup_hint());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
