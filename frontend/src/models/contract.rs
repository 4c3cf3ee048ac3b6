use super::bid::Modality;
use super::{choice, display_date, draft_amount};
use crate::draft;
use crate::filter::{Facet, Filterable};
use crate::resource::{CellContent, Column, FieldKind, FormField, RecordId, Resource};
use crate::validation::{date, date_order, one_of, positive_amount, required, FieldErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

choice!(ContractStatus {
    Active => ("active", "Active"),
    Expired => ("expired", "Expired"),
    Cancelled => ("cancelled", "Cancelled"),
});

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: RecordId,
    pub number: String,
    pub supplier: String,
    pub object: String,
    pub modality: Modality,
    pub amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ContractStatus,
}

draft!(ContractDraft {
    number,
    supplier,
    object,
    modality,
    amount,
    start_date,
    end_date,
    status,
});

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContractPayload {
    pub number: String,
    pub supplier: String,
    pub object: String,
    pub modality: Modality,
    pub amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ContractStatus,
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
    FormField::new("supplier", "Supplier", FieldKind::Text),
    FormField::new("object", "Object", FieldKind::TextArea),
    FormField::new("modality", "Modality", FieldKind::Select(Modality::OPTIONS)),
    FormField::new("amount", "Amount", FieldKind::Number),
    FormField::new("start_date", "Start date", FieldKind::Date),
    FormField::new("end_date", "End date", FieldKind::Date),
    FormField::new("status", "Status", FieldKind::Select(ContractStatus::OPTIONS)),
];

impl Filterable for Contract {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.number.as_str(),
            self.supplier.as_str(),
            self.object.as_str(),
        ]
    }

    fn facet_value(&self, key: &str) -> Option<String> {
        match key {
            "modality" => Some(self.modality.label().to_string()),
            "status" => Some(self.status.label().to_string()),
            _ => None,
        }
    }

    fn amount(&self) -> Option<f64> {
        Some(self.amount)
    }
}

impl Resource for Contract {
    const PATH: &'static str = "contracts";
    const TITLE: &'static str = "Contracts";
    const SINGULAR: &'static str = "Contract";
    const AMOUNT_LABEL: Option<&'static str> = Some("Contracted value");

    type Draft = ContractDraft;
    type Payload = ContractPayload;

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> ContractDraft {
        ContractDraft {
            number: self.number.clone(),
            supplier: self.supplier.clone(),
            object: self.object.clone(),
            modality: self.modality.as_str().to_string(),
            amount: draft_amount(self.amount),
            start_date: self.start_date.to_string(),
            end_date: self.end_date.to_string(),
            status: self.status.as_str().to_string(),
        }
    }

    fn validate(draft: &ContractDraft) -> Result<ContractPayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        let number = required(&mut errors, "number", &draft.number);
        let supplier = required(&mut errors, "supplier", &draft.supplier);
        let object = required(&mut errors, "object", &draft.object);
        let modality = one_of::<Modality>(&mut errors, "modality", &draft.modality);
        let amount = positive_amount(&mut errors, "amount", &draft.amount);
        let start_date = date(&mut errors, "start_date", &draft.start_date);
        let end_date = date(&mut errors, "end_date", &draft.end_date);
        date_order(&mut errors, "end_date", start_date, end_date);
        let status = one_of::<ContractStatus>(&mut errors, "status", &draft.status);

        match (modality, start_date, end_date, status) {
            (Some(modality), Some(start_date), Some(end_date), Some(status))
                if errors.is_empty() =>
            {
                Ok(ContractPayload {
                    number,
                    supplier,
                    object,
                    modality,
                    amount,
                    start_date,
                    end_date,
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
                value: |c| CellContent::Text(c.number.clone()),
            },
            Column {
                header: "Supplier",
                value: |c| CellContent::Text(c.supplier.clone()),
            },
            Column {
                header: "Object",
                value: |c| CellContent::Text(c.object.clone()),
            },
            Column {
                header: "Term",
                value: |c| {
                    CellContent::Text(format!(
                        "{} – {}",
                        display_date(&c.start_date),
                        display_date(&c.end_date)
                    ))
                },
            },
            Column {
                header: "Status",
                value: |c| CellContent::Badge(c.status.label().to_string()),
            },
            Column {
                header: "Amount",
                value: |c| CellContent::Money(c.amount),
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

    fn draft() -> ContractDraft {
        ContractDraft {
            number: "045/2024".into(),
            supplier: "Construtora Horizonte".into(),
            object: "Reforma da UBS Centro".into(),
            modality: "Concorrência".into(),
            amount: "320000".into(),
            start_date: "2024-02-01".into(),
            end_date: "2025-01-31".into(),
            status: "active".into(),
        }
    }

    #[test]
    fn start_after_end_is_reported_on_end_date() {
        let errors = Contract::validate(&ContractDraft {
            start_date: "2024-09-01".into(),
            end_date: "2024-08-01".into(),
            ..draft()
        })
        .unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["end_date"]);
        assert_eq!(
            errors.get("end_date"),
            Some("End date must be on or after the start date.")
        );
    }

    #[test]
    fn reversed_term_never_reaches_submitting() {
        use crate::form::{FormPhase, FormState, SubmitRejected};

        let mut form = FormState::new(ContractDraft {
            start_date: "2024-09-01".into(),
            end_date: "2024-08-01".into(),
            ..draft()
        });
        assert_eq!(
            form.begin_submit(Contract::validate),
            Err(SubmitRejected::Invalid)
        );
        assert_eq!(form.phase(), FormPhase::Editing);
        assert!(form.errors().get("end_date").is_some());
    }

    #[test]
    fn valid_contract_builds_payload() {
        let payload = Contract::validate(&draft()).unwrap();
        assert_eq!(payload.modality, Modality::Competition);
        assert_eq!(payload.status, ContractStatus::Active);
        assert!(payload.start_date < payload.end_date);
    }

    #[test]
    fn search_covers_number_supplier_and_object() {
        let payload = Contract::validate(&draft()).unwrap();
        let mut json = serde_json::to_value(payload).unwrap();
        json["id"] = 1.into();
        let contract: Contract = serde_json::from_value(json).unwrap();

        let mut filters = crate::filter::FilterState::new();
        for term in ["045", "horizonte", "UBS"] {
            filters.set_search(term);
            assert_eq!(filters.apply(std::slice::from_ref(&contract)).len(), 1, "{term}");
        }
    }
}
