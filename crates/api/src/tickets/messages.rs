//! Notification message bodies for ticket lifecycle events.

use helpdesk_core::sla::BreachKind;
use helpdesk_core::ticket::TicketStatus;
use helpdesk_db::models::ticket::Ticket;

/// Longest response excerpt quoted in an update notification.
const EXCERPT_LEN: usize = 100;

pub fn creation_confirmation(ticket: &Ticket) -> String {
    format!(
        "Dear User,\n\n\
         Your ticket has been successfully created in the campus helpdesk.\n\n\
         Ticket ID: {}\n\
         Title: {}\n\n\
         You can track the status of your ticket by logging into the helpdesk portal.\n\n\
         Best regards,\n\
         Campus Helpdesk",
        ticket.reference, ticket.title
    )
}

pub fn assignment_notice(ticket: &Ticket) -> String {
    format!(
        "A ticket has been assigned to you:\n\n\
         Ticket ID: {}\n\
         Title: {}\n\
         Priority: {}\n\n\
         Please log in to the helpdesk to view and respond to this ticket.\n\n\
         Best regards,\n\
         Campus Helpdesk",
        ticket.reference, ticket.title, ticket.priority
    )
}

pub fn department_notice(ticket: &Ticket) -> String {
    format!(
        "A new ticket has been created in your department:\n\n\
         Ticket ID: {}\n\
         Title: {}\n\
         Priority: {}\n\n\
         Please log in to the helpdesk to view and respond to this ticket.\n\n\
         Best regards,\n\
         Campus Helpdesk",
        ticket.reference, ticket.title, ticket.priority
    )
}

pub fn response_notice(ticket: &Ticket, author: &str, message: &str) -> String {
    format!(
        "There has been an update to your ticket {}.\n\n\
         New response from {}: {}\n\n\
         You can view the full details by logging into the helpdesk portal.",
        ticket.reference,
        author,
        excerpt(message)
    )
}

pub fn status_notice(ticket: &Ticket, new_status: TicketStatus) -> String {
    format!(
        "There has been an update to your ticket {}.\n\n\
         Your ticket status has been updated to: {}\n\n\
         You can view the full details by logging into the helpdesk portal.",
        ticket.reference, new_status
    )
}

pub fn breach_alert(ticket: &Ticket, kind: BreachKind) -> String {
    let window = match kind {
        BreachKind::Response => "response time",
        BreachKind::Resolution => "resolution time",
    };
    format!(
        "Dear Manager,\n\n\
         The {window} SLA has been breached for ticket {}.\n\n\
         Ticket Title: {}\n\
         Priority: {}\n\
         Created: {}\n\n\
         Please take immediate action.\n\n\
         Best regards,\n\
         Campus Helpdesk",
        ticket.reference, ticket.title, ticket.priority, ticket.created_at
    )
}

pub fn reminder_text(reference: &str, elapsed_hours: f64) -> String {
    format!(
        "Ticket {reference} has been open for {} hours and requires attention.",
        elapsed_hours.floor() as i64
    )
}

pub fn reminder_email(message: &str) -> String {
    format!(
        "Dear Staff Member,\n\n\
         {message}\n\n\
         Please log in to the helpdesk to view and respond to this ticket.\n\n\
         Best regards,\n\
         Campus Helpdesk"
    )
}

/// First [`EXCERPT_LEN`] characters of a message, with an ellipsis when
/// truncated. Char-based so multi-byte input cannot split a code point.
fn excerpt(message: &str) -> String {
    if message.chars().count() <= EXCERPT_LEN {
        return message.to_string();
    }
    let cut: String = message.chars().take(EXCERPT_LEN).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_messages_are_not_truncated() {
        assert_eq!(excerpt("hello"), "hello");
    }

    #[test]
    fn long_messages_are_truncated_with_ellipsis() {
        let long = "x".repeat(150);
        let result = excerpt(&long);
        assert_eq!(result.chars().count(), 103);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let long = "é".repeat(150);
        let result = excerpt(&long);
        assert!(result.starts_with('é'));
        assert!(result.ends_with("..."));
    }
}
