use super::{choice, display_date, draft_amount};
use crate::draft;
use crate::filter::{Facet, Filterable};
use crate::resource::{CellContent, Column, FieldKind, FormField, RecordId, Resource};
use crate::validation::{date, one_of, positive_amount, required, FieldErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

choice!(RevenueCategory {
    Tax => ("Tributária", "Tributária"),
    Transfers => ("Transferências", "Transferências"),
    Property => ("Patrimonial", "Patrimonial"),
    Services => ("Serviços", "Serviços"),
    Other => ("Outras", "Outras"),
});

choice!(RevenueStatus {
    Forecast => ("forecast", "Forecast"),
    Collected => ("collected", "Collected"),
    Cancelled => ("cancelled", "Cancelled"),
});

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    pub id: RecordId,
    pub description: String,
    #[serde(default)]
    pub source: String,
    pub category: RevenueCategory,
    pub amount: f64,
    pub date: NaiveDate,
    pub status: RevenueStatus,
}

draft!(RevenueDraft {
    description,
    source,
    category,
    amount,
    date,
    status,
});

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RevenuePayload {
    pub description: String,
    pub source: String,
    pub category: RevenueCategory,
    pub amount: f64,
    pub date: NaiveDate,
    pub status: RevenueStatus,
}

const FACETS: &[Facet] = &[
    Facet {
        key: "category",
        label: "Category",
    },
    Facet {
        key: "status",
        label: "Status",
    },
];

const FORM: &[FormField] = &[
    FormField::new("description", "Description", FieldKind::Text),
    FormField::new("source", "Source", FieldKind::Text),
    FormField::new("category", "Category", FieldKind::Select(RevenueCategory::OPTIONS)),
    FormField::new("amount", "Amount", FieldKind::Number),
    FormField::new("date", "Date", FieldKind::Date),
    FormField::new("status", "Status", FieldKind::Select(RevenueStatus::OPTIONS)),
];

impl Filterable for Revenue {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.description.as_str(), self.source.as_str()]
    }

    fn facet_value(&self, key: &str) -> Option<String> {
        match key {
            "category" => Some(self.category.label().to_string()),
            "status" => Some(self.status.label().to_string()),
            _ => None,
        }
    }

    fn amount(&self) -> Option<f64> {
        Some(self.amount)
    }
}

impl Resource for Revenue {
    const PATH: &'static str = "revenues";
    const TITLE: &'static str = "Revenues";
    const SINGULAR: &'static str = "Revenue";
    const AMOUNT_LABEL: Option<&'static str> = Some("Total revenue");

    type Draft = RevenueDraft;
    type Payload = RevenuePayload;

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> RevenueDraft {
        RevenueDraft {
            description: self.description.clone(),
            source: self.source.clone(),
            category: self.category.as_str().to_string(),
            amount: draft_amount(self.amount),
            date: self.date.to_string(),
            status: self.status.as_str().to_string(),
        }
    }

    fn validate(draft: &RevenueDraft) -> Result<RevenuePayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        let description = required(&mut errors, "description", &draft.description);
        let source = required(&mut errors, "source", &draft.source);
        let category = one_of::<RevenueCategory>(&mut errors, "category", &draft.category);
        let amount = positive_amount(&mut errors, "amount", &draft.amount);
        let date = date(&mut errors, "date", &draft.date);
        let status = one_of::<RevenueStatus>(&mut errors, "status", &draft.status);

        match (category, date, status) {
            (Some(category), Some(date), Some(status)) if errors.is_empty() => Ok(RevenuePayload {
                description,
                source,
                category,
                amount,
                date,
                status,
            }),
            _ => Err(errors),
        }
    }

    fn facets() -> &'static [Facet] {
        FACETS
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column {
                header: "Date",
                value: |r| CellContent::Text(display_date(&r.date)),
            },
            Column {
                header: "Description",
                value: |r| CellContent::Text(r.description.clone()),
            },
            Column {
                header: "Source",
                value: |r| CellContent::Text(r.source.clone()),
            },
            Column {
                header: "Category",
                value: |r| CellContent::Badge(r.category.label().to_string()),
            },
            Column {
                header: "Status",
                value: |r| CellContent::Badge(r.status.label().to_string()),
            },
            Column {
                header: "Amount",
                value: |r| CellContent::Money(r.amount),
            },
        ]
    }

    fn form_fields() -> &'static [FormField] {
        FORM
    }
}
