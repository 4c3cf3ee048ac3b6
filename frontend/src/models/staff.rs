use super::{choice, display_date, draft_amount};
use crate::draft;
use crate::filter::{Facet, Filterable};
use crate::resource::{CellContent, Column, FieldKind, FormField, RecordId, Resource};
use crate::validation::{date, one_of, positive_amount, required, FieldErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

choice!(Department {
    Health => ("Saúde", "Saúde"),
    Education => ("Educação", "Educação"),
    Administration => ("Administração", "Administração"),
    Finance => ("Finanças", "Finanças"),
    PublicWorks => ("Obras", "Obras"),
});

choice!(StaffStatus {
    Active => ("active", "Active"),
    OnLeave => ("on_leave", "On leave"),
    Terminated => ("terminated", "Terminated"),
});

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: RecordId,
    pub name: String,
    pub position: String,
    pub department: Department,
    pub salary: f64,
    pub admission_date: NaiveDate,
    pub status: StaffStatus,
}

draft!(StaffDraft {
    name,
    position,
    department,
    salary,
    admission_date,
    status,
});

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StaffPayload {
    pub name: String,
    pub position: String,
    pub department: Department,
    pub salary: f64,
    pub admission_date: NaiveDate,
    pub status: StaffStatus,
}

const FACETS: &[Facet] = &[
    Facet {
        key: "department",
        label: "Department",
    },
    Facet {
        key: "status",
        label: "Status",
    },
];

const FORM: &[FormField] = &[
    FormField::new("name", "Name", FieldKind::Text),
    FormField::new("position", "Position", FieldKind::Text),
    FormField::new("department", "Department", FieldKind::Select(Department::OPTIONS)),
    FormField::new("salary", "Gross salary", FieldKind::Number),
    FormField::new("admission_date", "Admission date", FieldKind::Date),
    FormField::new("status", "Status", FieldKind::Select(StaffStatus::OPTIONS)),
];

impl Filterable for StaffMember {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.position.as_str()]
    }

    fn facet_value(&self, key: &str) -> Option<String> {
        match key {
            "department" => Some(self.department.label().to_string()),
            "status" => Some(self.status.label().to_string()),
            _ => None,
        }
    }

    fn amount(&self) -> Option<f64> {
        Some(self.salary)
    }
}

impl Resource for StaffMember {
    const PATH: &'static str = "staff";
    const TITLE: &'static str = "Staff";
    const SINGULAR: &'static str = "Staff member";
    const AMOUNT_LABEL: Option<&'static str> = Some("Gross payroll");

    type Draft = StaffDraft;
    type Payload = StaffPayload;

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> StaffDraft {
        StaffDraft {
            name: self.name.clone(),
            position: self.position.clone(),
            department: self.department.as_str().to_string(),
            salary: draft_amount(self.salary),
            admission_date: self.admission_date.to_string(),
            status: self.status.as_str().to_string(),
        }
    }

    fn validate(draft: &StaffDraft) -> Result<StaffPayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required(&mut errors, "name", &draft.name);
        let position = required(&mut errors, "position", &draft.position);
        let department = one_of::<Department>(&mut errors, "department", &draft.department);
        let salary = positive_amount(&mut errors, "salary", &draft.salary);
        let admission_date = date(&mut errors, "admission_date", &draft.admission_date);
        let status = one_of::<StaffStatus>(&mut errors, "status", &draft.status);

        match (department, admission_date, status) {
            (Some(department), Some(admission_date), Some(status)) if errors.is_empty() => {
                Ok(StaffPayload {
                    name,
                    position,
                    department,
                    salary,
                    admission_date,
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
                header: "Name",
                value: |s| CellContent::Text(s.name.clone()),
            },
            Column {
                header: "Position",
                value: |s| CellContent::Text(s.position.clone()),
            },
            Column {
                header: "Department",
                value: |s| CellContent::Badge(s.department.label().to_string()),
            },
            Column {
                header: "Admission",
                value: |s| CellContent::Text(display_date(&s.admission_date)),
            },
            Column {
                header: "Status",
                value: |s| CellContent::Badge(s.status.label().to_string()),
            },
            Column {
                header: "Salary",
                value: |s| CellContent::Money(s.salary),
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
    use crate::filter::{distinct_values, Aggregates, FilterState};

    fn member(id: RecordId, department: Department, salary: f64) -> StaffMember {
        StaffMember {
            id,
            name: format!("Servidor {id}"),
            position: "Analista".into(),
            department,
            salary,
            admission_date: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            status: StaffStatus::Active,
        }
    }

    #[test]
    fn average_salary_of_department() {
        let staff = vec![
            member(1, Department::Health, 4000.0),
            member(2, Department::Health, 6000.0),
            member(3, Department::Finance, 9000.0),
        ];
        let mut filters = FilterState::new();
        filters.select("department", "Saúde");
        let stats = Aggregates::compute(&filters.apply(&staff));
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average, 5000.0);

        assert_eq!(distinct_values(&staff, "department"), vec!["Finanças", "Saúde"]);
    }
}
