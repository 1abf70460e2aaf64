//! Users list page.

use askama::Template;
use axum::{extract::State, response::Html};
use boutique_core::catalog::User;
use tracing::instrument;

use super::render;
use crate::components::data_table::{DataTableConfig, users_table_config};
use crate::db::UserRepository;
use crate::error::Result;
use crate::state::AppState;

/// User row for the table.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub joined: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_i32(),
            name: user.name.clone(),
            email: user.email.to_string(),
            is_admin: user.is_admin,
            joined: user.created_at.format("%b %d, %Y").to_string(),
        }
    }
}

/// Users list page template.
#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub current_path: &'static str,
    pub table: DataTableConfig,
    pub users: Vec<UserRow>,
}

/// Users list page handler.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    let users = UserRepository::new(state.pool()).list_all().await?;

    render(&UsersIndexTemplate {
        current_path: "/admin/users",
        table: users_table_config(),
        users: users.iter().map(UserRow::from).collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_core::{Email, UserId};
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_row_from_user() {
        let created = chrono::Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap();
        let user = User {
            id: UserId::new(4),
            name: "Grace".to_string(),
            email: Email::parse("grace@example.com").unwrap(),
            is_admin: false,
            created_at: created,
            updated_at: created,
        };

        let row = UserRow::from(&user);
        assert_eq!(row.id, 4);
        assert_eq!(row.email, "grace@example.com");
        assert_eq!(row.joined, "Mar 07, 2025");

        let html = UsersIndexTemplate {
            current_path: "/admin/users",
            table: users_table_config(),
            users: vec![row],
        }
        .render()
        .unwrap();
        assert!(html.contains("grace@example.com"));
    }
}
