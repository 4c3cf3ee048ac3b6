use super::{choice, display_date, draft_amount};
use crate::draft;
use crate::filter::{Facet, Filterable};
use crate::resource::{CellContent, Column, FieldKind, FormField, RecordId, Resource};
use crate::validation::{date, one_of, positive_amount, required, FieldErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

choice!(ExpenseCategory {
    Health => ("Saúde", "Saúde"),
    Education => ("Educação", "Educação"),
    Infrastructure => ("Infraestrutura", "Infraestrutura"),
    Administration => ("Administração", "Administração"),
    SocialAssistance => ("Assistência Social", "Assistência Social"),
    Security => ("Segurança", "Segurança"),
});

choice!(ExpenseStatus {
    Committed => ("committed", "Committed"),
    Liquidated => ("liquidated", "Liquidated"),
    Paid => ("paid", "Paid"),
    Cancelled => ("cancelled", "Cancelled"),
});

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: RecordId,
    pub description: String,
    #[serde(default)]
    pub supplier: String,
    pub category: ExpenseCategory,
    pub amount: f64,
    pub date: NaiveDate,
    pub status: ExpenseStatus,
}

draft!(ExpenseDraft {
    description,
    supplier,
    category,
    amount,
    date,
    status,
});

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExpensePayload {
    pub description: String,
    pub supplier: String,
    pub category: ExpenseCategory,
    pub amount: f64,
    pub date: NaiveDate,
    pub status: ExpenseStatus,
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
    FormField::new("supplier", "Supplier", FieldKind::Text),
    FormField::new("category", "Category", FieldKind::Select(ExpenseCategory::OPTIONS)),
    FormField::new("amount", "Amount", FieldKind::Number),
    FormField::new("date", "Date", FieldKind::Date),
    FormField::new("status", "Status", FieldKind::Select(ExpenseStatus::OPTIONS)),
];

impl Filterable for Expense {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.description.as_str(), self.supplier.as_str()]
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

impl Resource for Expense {
    const PATH: &'static str = "expenses";
    const TITLE: &'static str = "Expenses";
    const SINGULAR: &'static str = "Expense";
    const AMOUNT_LABEL: Option<&'static str> = Some("Total spent");

    type Draft = ExpenseDraft;
    type Payload = ExpensePayload;

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            description: self.description.clone(),
            supplier: self.supplier.clone(),
            category: self.category.as_str().to_string(),
            amount: draft_amount(self.amount),
            date: self.date.to_string(),
            status: self.status.as_str().to_string(),
        }
    }

    fn validate(draft: &ExpenseDraft) -> Result<ExpensePayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        let description = required(&mut errors, "description", &draft.description);
        let supplier = required(&mut errors, "supplier", &draft.supplier);
        let category = one_of::<ExpenseCategory>(&mut errors, "category", &draft.category);
        let amount = positive_amount(&mut errors, "amount", &draft.amount);
        let date = date(&mut errors, "date", &draft.date);
        let status = one_of::<ExpenseStatus>(&mut errors, "status", &draft.status);

        match (category, date, status) {
            (Some(category), Some(date), Some(status)) if errors.is_empty() => Ok(ExpensePayload {
                description,
                supplier,
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
                value: |e| CellContent::Text(display_date(&e.date)),
            },
            Column {
                header: "Description",
                value: |e| CellContent::Text(e.description.clone()),
            },
            Column {
                header: "Supplier",
                value: |e| CellContent::Text(e.supplier.clone()),
            },
            Column {
                header: "Category",
                value: |e| CellContent::Badge(e.category.label().to_string()),
            },
            Column {
                header: "Status",
                value: |e| CellContent::Badge(e.status.label().to_string()),
            },
            Column {
                header: "Amount",
                value: |e| CellContent::Money(e.amount),
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
    use crate::filter::{Aggregates, FilterState};

    fn expense(id: RecordId, category: ExpenseCategory, amount: f64) -> Expense {
        Expense {
            id,
            description: format!("Despesa {id}"),
            supplier: "Fornecedor".into(),
            category,
            amount,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            status: ExpenseStatus::Paid,
        }
    }

    #[test]
    fn filtering_by_health_sums_its_amount() {
        let expenses = vec![
            expense(1, ExpenseCategory::Health, 100.0),
            expense(2, ExpenseCategory::Education, 50.0),
        ];
        let mut filters = FilterState::new();
        filters.select("category", "Saúde");

        let view = filters.apply(&expenses);
        assert_eq!(view.len(), 1);
        assert_eq!(Aggregates::compute(&view).sum, 100.0);
    }

    #[test]
    fn draft_round_trips_through_validation() {
        let record = expense(7, ExpenseCategory::Security, 1234.5);
        let payload = Expense::validate(&record.to_draft()).expect("valid");
        assert_eq!(payload.amount, 1234.5);
        assert_eq!(payload.category, ExpenseCategory::Security);
        assert_eq!(payload.date, record.date);
    }

    #[test]
    fn empty_draft_reports_every_field() {
        let errors = Expense::validate(&ExpenseDraft::default()).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            vec!["amount", "category", "date", "description", "status", "supplier"]
        );
    }

    #[test]
    fn decodes_api_record() {
        let json = r#"{"id": 3, "description": "Merenda", "category": "Educação",
                       "amount": 50.25, "date": "2024-02-01", "status": "liquidated"}"#;
        let record: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(record.supplier, "");
        assert_eq!(record.status, ExpenseStatus::Liquidated);
        assert_eq!(record.facet_value("status").as_deref(), Some("Liquidated"));
    }
}
