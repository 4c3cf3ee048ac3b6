use super::choice;
use crate::draft;
use crate::filter::{Facet, Filterable};
use crate::resource::{CellContent, Column, FieldKind, FormField, RecordId, Resource};
use crate::validation::{email, one_of, required, FieldErrors};
use serde::{Deserialize, Serialize};

choice!(Role {
    Admin => ("admin", "Administrator"),
    Editor => ("editor", "Editor"),
    Viewer => ("viewer", "Viewer"),
});

choice!(UserStatus {
    Active => ("active", "Active"),
    Inactive => ("inactive", "Inactive"),
});

impl Role {
    /// Editors and admins maintain the published data.
    pub fn can_publish(&self) -> bool {
        matches!(self, Role::Admin | Role::Editor)
    }

    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Back-office account. Also the shape returned by `auth/me/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default = "default_status")]
    pub status: UserStatus,
}

fn default_status() -> UserStatus {
    UserStatus::Active
}

draft!(UserDraft {
    name,
    email,
    role,
    status,
});

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
}

const FACETS: &[Facet] = &[
    Facet {
        key: "role",
        label: "Role",
    },
    Facet {
        key: "status",
        label: "Status",
    },
];

const FORM: &[FormField] = &[
    FormField::new("name", "Name", FieldKind::Text),
    FormField::new("email", "Email", FieldKind::Email),
    FormField::new("role", "Role", FieldKind::Select(Role::OPTIONS)),
    FormField::new("status", "Status", FieldKind::Select(UserStatus::OPTIONS)),
];

impl Filterable for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    fn facet_value(&self, key: &str) -> Option<String> {
        match key {
            "role" => Some(self.role.label().to_string()),
            "status" => Some(self.status.label().to_string()),
            _ => None,
        }
    }
}

impl Resource for User {
    const PATH: &'static str = "users";
    const TITLE: &'static str = "Users";
    const SINGULAR: &'static str = "User";
    const ADMIN_ONLY: bool = true;

    type Draft = UserDraft;
    type Payload = UserPayload;

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> UserDraft {
        UserDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.as_str().to_string(),
            status: self.status.as_str().to_string(),
        }
    }

    fn validate(draft: &UserDraft) -> Result<UserPayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required(&mut errors, "name", &draft.name);
        let email = email(&mut errors, "email", &draft.email);
        let role = one_of::<Role>(&mut errors, "role", &draft.role);
        let status = one_of::<UserStatus>(&mut errors, "status", &draft.status);

        match (role, status) {
            (Some(role), Some(status)) if errors.is_empty() => Ok(UserPayload {
                name,
                email,
                role,
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
                header: "Name",
                value: |u| CellContent::Text(u.name.clone()),
            },
            Column {
                header: "Email",
                value: |u| CellContent::Text(u.email.clone()),
            },
            Column {
                header: "Role",
                value: |u| CellContent::Badge(u.role.label().to_string()),
            },
            Column {
                header: "Status",
                value: |u| CellContent::Badge(u.status.label().to_string()),
            },
        ]
    }

    fn form_fields() -> &'static [FormField] {
        FORM
    }
}
