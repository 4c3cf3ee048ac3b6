use super::{choice, display_date, draft_amount};
use crate::draft;
use crate::filter::{Facet, Filterable};
use crate::resource::{CellContent, Column, FieldKind, FormField, RecordId, Resource};
use crate::validation::{date, one_of, positive_amount, required, FieldErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

choice!(
    /// Procurement modality, shared by bids and the contracts they produce.
    Modality {
        Auction => ("Pregão", "Pregão"),
        Competition => ("Concorrência", "Concorrência"),
        PriceTaking => ("Tomada de Preços", "Tomada de Preços"),
        Invitation => ("Convite", "Convite"),
        Waiver => ("Dispensa", "Dispensa"),
    }
);

choice!(BidStatus {
    Open => ("open", "Open"),
    InProgress => ("in_progress", "In progress"),
    Finished => ("finished", "Finished"),
    Cancelled => ("cancelled", "Cancelled"),
    Deserted => ("deserted", "Deserted"),
});

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: RecordId,
    pub number: String,
    pub object: String,
    pub modality: Modality,
    pub estimated_amount: f64,
    pub opening_date: NaiveDate,
    pub status: BidStatus,
}

draft!(BidDraft {
    number,
    object,
    modality,
    estimated_amount,
    opening_date,
    status,
});

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BidPayload {
    pub number: String,
    pub object: String,
    pub modality: Modality,
    pub estimated_amount: f64,
    pub opening_date: NaiveDate,
    pub status: BidStatus,
}

const FACETS: &[Facet] = &[
    Facet {
        key: "modality",
        label: "Modality",
    },
    Facet {
        key: "status",
        label: "Status",
    },
];

const FORM: &[FormField] = &[
    FormField::new("number", "Number", FieldKind::Text),
    FormField::new("object", "Object", FieldKind::TextArea),
    FormField::new("modality", "Modality", FieldKind::Select(Modality::OPTIONS)),
    FormField::new("estimated_amount", "Estimated amount", FieldKind::Number),
    FormField::new("opening_date", "Opening date", FieldKind::Date),
    FormField::new("status", "Status", FieldKind::Select(BidStatus::OPTIONS)),
];

impl Filterable for Bid {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.number.as_str(), self.object.as_str()]
    }

    fn facet_value(&self, key: &str) -> Option<String> {
        match key {
            "modality" => Some(self.modality.label().to_string()),
            "status" => Some(self.status.label().to_string()),
            _ => None,
        }
    }

    fn amount(&self) -> Option<f64> {
        Some(self.estimated_amount)
    }
}

impl Resource for Bid {
    const PATH: &'static str = "bids";
    const TITLE: &'static str = "Bids";
    const SINGULAR: &'static str = "Bid";
    const AMOUNT_LABEL: Option<&'static str> = Some("Estimated value");

    type Draft = BidDraft;
    type Payload = BidPayload;

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> BidDraft {
        BidDraft {
            number: self.number.clone(),
            object: self.object.clone(),
            modality: self.modality.as_str().to_string(),
            estimated_amount: draft_amount(self.estimated_amount),
            opening_date: self.opening_date.to_string(),
            status: self.status.as_str().to_string(),
        }
    }

    fn validate(draft: &BidDraft) -> Result<BidPayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        let number = required(&mut errors, "number", &draft.number);
        let object = required(&mut errors, "object", &draft.object);
        let modality = one_of::<Modality>(&mut errors, "modality", &draft.modality);
        let estimated_amount =
            positive_amount(&mut errors, "estimated_amount", &draft.estimated_amount);
        let opening_date = date(&mut errors, "opening_date", &draft.opening_date);
        let status = one_of::<BidStatus>(&mut errors, "status", &draft.status);

        match (modality, opening_date, status) {
            (Some(modality), Some(opening_date), Some(status)) if errors.is_empty() => {
                Ok(BidPayload {
                    number,
                    object,
                    modality,
                    estimated_amount,
                    opening_date,
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
                header: "Number",
                value: |b| CellContent::Text(b.number.clone()),
            },
            Column {
                header: "Object",
                value: |b| CellContent::Text(b.object.clone()),
            },
            Column {
                header: "Modality",
                value: |b| CellContent::Badge(b.modality.label().to_string()),
            },
            Column {
                header: "Opening",
                value: |b| CellContent::Text(display_date(&b.opening_date)),
            },
            Column {
                header: "Status",
                value: |b| CellContent::Badge(b.status.label().to_string()),
            },
            Column {
                header: "Estimated",
                value: |b| CellContent::Money(b.estimated_amount),
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

    #[test]
    fn status_labels_are_filter_values() {
        let bid: Bid = serde_json::from_str(
            r#"{"id": 9, "number": "PE 12/2024", "object": "Merenda escolar",
                "modality": "Pregão", "estimated_amount": 250000,
                "opening_date": "2024-07-01", "status": "in_progress"}"#,
        )
        .unwrap();
        assert_eq!(bid.facet_value("status").as_deref(), Some("In progress"));
        assert_eq!(bid.facet_value("modality").as_deref(), Some("Pregão"));
        assert_eq!(bid.amount(), Some(250000.0));
    }

    #[test]
    fn payload_uses_api_spelling() {
        let payload = Bid::validate(&BidDraft {
            number: "CC 3/2024".into(),
            object: "Pavimentação".into(),
            modality: "Concorrência".into(),
            estimated_amount: "1500000".into(),
            opening_date: "2024-08-15".into(),
            status: "In progress".into(),
        })
        .unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["opening_date"], "2024-08-15");
    }
}
