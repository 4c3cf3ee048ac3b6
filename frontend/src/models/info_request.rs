//! Access-to-information requests filed by citizens.
//!
//! Requests carry no monetary value, so the list page shows counts only.

use super::{choice, display_date};
use crate::draft;
use crate::filter::{Facet, Filterable};
use crate::resource::{CellContent, Column, FieldKind, FormField, RecordId, Resource};
use crate::validation::{date, date_order, email, one_of, required, FieldErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

choice!(RequestChannel {
    Online => ("Online", "Online"),
    InPerson => ("Presencial", "Presencial"),
    Phone => ("Telefone", "Telefone"),
    Email => ("E-mail", "E-mail"),
});

choice!(RequestStatus {
    Pending => ("pending", "Pending"),
    InProgress => ("in_progress", "In progress"),
    Answered => ("answered", "Answered"),
    Denied => ("denied", "Denied"),
});

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InfoRequest {
    pub id: RecordId,
    pub protocol: String,
    pub requester_name: String,
    pub requester_email: String,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    pub channel: RequestChannel,
    pub request_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: RequestStatus,
}

draft!(InfoRequestDraft {
    protocol,
    requester_name,
    requester_email,
    subject,
    description,
    channel,
    request_date,
    due_date,
    status,
});

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InfoRequestPayload {
    pub protocol: String,
    pub requester_name: String,
    pub requester_email: String,
    pub subject: String,
    pub description: String,
    pub channel: RequestChannel,
    pub request_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: RequestStatus,
}

const FACETS: &[Facet] = &[
    Facet {
        key: "channel",
        label: "Channel",
    },
    Facet {
        key: "status",
        label: "Status",
    },
];

const FORM: &[FormField] = &[
    FormField::new("protocol", "Protocol", FieldKind::Text),
    FormField::new("requester_name", "Requester", FieldKind::Text),
    FormField::new("requester_email", "Requester email", FieldKind::Email),
    FormField::new("subject", "Subject", FieldKind::Text),
    FormField::new("description", "Description", FieldKind::TextArea),
    FormField::new("channel", "Channel", FieldKind::Select(RequestChannel::OPTIONS)),
    FormField::new("request_date", "Received on", FieldKind::Date),
    FormField::new("due_date", "Due on", FieldKind::Date),
    FormField::new("status", "Status", FieldKind::Select(RequestStatus::OPTIONS)),
];

impl Filterable for InfoRequest {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.protocol.as_str(),
            self.requester_name.as_str(),
            self.subject.as_str(),
        ]
    }

    fn facet_value(&self, key: &str) -> Option<String> {
        match key {
            "channel" => Some(self.channel.label().to_string()),
            "status" => Some(self.status.label().to_string()),
            _ => None,
        }
    }
}

impl Resource for InfoRequest {
    const PATH: &'static str = "information-requests";
    const TITLE: &'static str = "Information Requests";
    const SINGULAR: &'static str = "Request";

    type Draft = InfoRequestDraft;
    type Payload = InfoRequestPayload;

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> InfoRequestDraft {
        InfoRequestDraft {
            protocol: self.protocol.clone(),
            requester_name: self.requester_name.clone(),
            requester_email: self.requester_email.clone(),
            subject: self.subject.clone(),
            description: self.description.clone(),
            channel: self.channel.as_str().to_string(),
            request_date: self.request_date.to_string(),
            due_date: self.due_date.to_string(),
            status: self.status.as_str().to_string(),
        }
    }

    fn validate(draft: &InfoRequestDraft) -> Result<InfoRequestPayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        let protocol = required(&mut errors, "protocol", &draft.protocol);
        let requester_name = required(&mut errors, "requester_name", &draft.requester_name);
        let requester_email = email(&mut errors, "requester_email", &draft.requester_email);
        let subject = required(&mut errors, "subject", &draft.subject);
        let description = draft.description.trim().to_string();
        let channel = one_of::<RequestChannel>(&mut errors, "channel", &draft.channel);
        let request_date = date(&mut errors, "request_date", &draft.request_date);
        let due_date = date(&mut errors, "due_date", &draft.due_date);
        date_order(&mut errors, "due_date", request_date, due_date);
        let status = one_of::<RequestStatus>(&mut errors, "status", &draft.status);

        match (channel, request_date, due_date, status) {
            (Some(channel), Some(request_date), Some(due_date), Some(status))
                if errors.is_empty() =>
            {
                Ok(InfoRequestPayload {
                    protocol,
                    requester_name,
                    requester_email,
                    subject,
                    description,
                    channel,
                    request_date,
                    due_date,
                    status,
                })
            }
            _ => Err(errors),
        }
    }

    fn facets() -> &'static [Facet] {
        FACETS
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column {
                header: "Protocol",
                value: |r| CellContent::Text(r.protocol.clone()),
            },
            Column {
                header: "Requester",
                value: |r| CellContent::Text(r.requester_name.clone()),
            },
            Column {
                header: "Subject",
                value: |r| CellContent::Text(r.subject.clone()),
            },
            Column {
                header: "Channel",
                value: |r| CellContent::Badge(r.channel.label().to_string()),
            },
            Column {
                header: "Due",
                value: |r| CellContent::Text(display_date(&r.due_date)),
            },
            Column {
                header: "Status",
                value: |r| CellContent::Badge(r.status.label().to_string()),
            },
        ]
    }

    fn form_fields() -> &'static [FormField] {
        FORM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> InfoRequestDraft {
        InfoRequestDraft {
            protocol: "LAI-2024-0042".into(),
            requester_name: "Maria Souza".into(),
            requester_email: "maria@example.com".into(),
            subject: "Folha de pagamento".into(),
            description: String::new(),
            channel: "Online".into(),
            request_date: "2024-03-01".into(),
            due_date: "2024-03-21".into(),
            status: "pending".into(),
        }
    }

    #[test]
    fn description_is_optional() {
        assert!(InfoRequest::validate(&draft()).is_ok());
    }

    #[test]
    fn bad_email_and_reversed_deadline() {
        let errors = InfoRequest::validate(&InfoRequestDraft {
            requester_email: "maria.example.com".into(),
            due_date: "2024-02-01".into(),
            ..draft()
        })
        .unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["due_date", "requester_email"]
        );
    }

    #[test]
    fn has_no_amount() {
        let payload = InfoRequest::validate(&draft()).unwrap();
        let mut json = serde_json::to_value(payload).unwrap();
        json["id"] = 4.into();
        let request: InfoRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.amount(), None);
    }
}
