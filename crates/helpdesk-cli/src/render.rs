//! Plain-text rendering for the terminal.

use std::fmt::Write as _;

use helpdesk_models::{CrmContact, EnrichedTicket, Ticket, UserProfile};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const NO_CRM_DATA: &str = "No CRM data available";

/// One line per ticket: id, status and priority badges, subject, requester.
pub fn ticket_row(ticket: &Ticket) -> String {
    let status = helpdesk_models::status_label(ticket.status);
    let priority = helpdesk_models::priority_label(ticket.priority);
    format!(
        "#{:<6} [{}] [{}] {} ({})",
        ticket.id,
        status.badge(),
        priority.badge(),
        ticket.subject,
        ticket.requester_name()
    )
}

/// The full ticket view: header, requester, CRM card, body, thread.
pub fn ticket_detail(view: &EnrichedTicket) -> String {
    let ticket = &view.ticket;
    let mut out = String::new();

    let _ = writeln!(out, "#{} {}", ticket.id, ticket.subject);
    let _ = writeln!(
        out,
        "Status: {}   Priority: {}   Created: {}",
        view.status().text,
        view.priority().text,
        ticket.created_at.format(TIME_FORMAT)
    );
    let requester_email = ticket
        .correlation_email()
        .map(|email| format!(" <{email}>"))
        .unwrap_or_default();
    let _ = writeln!(out, "Requester: {}{requester_email}", ticket.requester_name());

    out.push_str("\n-- CRM --\n");
    match &view.contact {
        Some(contact) => out.push_str(&contact_card(contact)),
        None => {
            let _ = writeln!(out, "{NO_CRM_DATA}");
        }
    }

    out.push_str("\n-- Description --\n");
    let _ = writeln!(out, "{}", plain_text(ticket.body()));

    let _ = writeln!(out, "\n-- Conversation ({}) --", view.conversations.len());
    for entry in &view.conversations {
        let _ = writeln!(
            out,
            "[{}] {}:\n  {}",
            entry.created_at.format(TIME_FORMAT),
            entry.author(),
            plain_text(entry.content())
        );
    }
    out
}

/// Name, email, company and lifecycle stage of a contact.
pub fn contact_card(contact: &CrmContact) -> String {
    let name = contact.full_name();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Name: {}",
        if name.is_empty() { "(unnamed)" } else { &name }
    );
    if let Some(email) = &contact.properties.email {
        let _ = writeln!(out, "Email: {email}");
    }
    if let Some(phone) = &contact.properties.phone {
        let _ = writeln!(out, "Phone: {phone}");
    }
    let _ = writeln!(out, "Company: {}", contact.company_or_default());
    let _ = writeln!(out, "Lifecycle: {}", contact.lifecycle());
    out
}

pub fn contact_row(contact: &CrmContact) -> String {
    format!(
        "{:<10} {:<24} {:<32} {}",
        contact.id,
        contact.full_name(),
        contact.properties.email.as_deref().unwrap_or("-"),
        contact.lifecycle()
    )
}

pub fn no_contact() -> &'static str {
    NO_CRM_DATA
}

/// The profile with the API key already masked.
pub fn profile(profile: &UserProfile, masked_key: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "User:      {} ({})", profile.display_name(), profile.id);
    let _ = writeln!(out, "Email:     {}", profile.email);
    let _ = writeln!(
        out,
        "Freshdesk: {}",
        profile
            .freshdesk_domain
            .as_deref()
            .map_or_else(|| "(not set)".to_string(), |d| format!("{d}.freshdesk.com"))
    );
    let _ = writeln!(out, "API key:   {masked_key}");
    out
}

/// Show only the last four characters of a secret.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    match chars.len() {
        0 => "(not set)".to_string(),
        n if n <= 4 => "*".repeat(n),
        n => {
            let tail: String = chars[n - 4..].iter().collect();
            format!("{}{tail}", "*".repeat(n - 4))
        }
    }
}

/// Drop HTML tags, decode entities and collapse whitespace.
fn plain_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    html_escape::decode_html_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
