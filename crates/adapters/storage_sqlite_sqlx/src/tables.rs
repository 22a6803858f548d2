//! Row mapping for every entity kind an entity service can load.

use std::str::FromStr;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use flowkit_domain::entity::Entity;
use flowkit_domain::group::{Group, GroupMember, GroupMemberStatus, GroupRole};
use flowkit_domain::person::{Person, PersonAlias};

/// An entity stored in its own table, keyed by a guid `id` column.
pub trait Table: Entity + Send + Unpin + 'static {
    const SELECT_BY_ID: &'static str;

    fn decode(row: &SqliteRow) -> Result<Self, sqlx::Error>;
}

/// Read a text column and parse it into a typed id.
pub(crate) fn id_column<T>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.try_get(column)?;
    T::from_str(&text).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

impl Table for Person {
    const SELECT_BY_ID: &'static str = "SELECT * FROM people WHERE id = ?";

    fn decode(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: id_column(row, "id")?,
            first_name: row.try_get("first_name")?,
            nick_name: row.try_get("nick_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
        })
    }
}

impl Table for PersonAlias {
    const SELECT_BY_ID: &'static str = "SELECT * FROM person_aliases WHERE id = ?";

    fn decode(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: id_column(row, "id")?,
            person_id: id_column(row, "person_id")?,
        })
    }
}

impl Table for Group {
    const SELECT_BY_ID: &'static str = "SELECT * FROM group_records WHERE id = ?";

    fn decode(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: id_column(row, "id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        })
    }
}

impl Table for GroupRole {
    const SELECT_BY_ID: &'static str = "SELECT * FROM group_roles WHERE id = ?";

    fn decode(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: id_column(row, "id")?,
            name: row.try_get("name")?,
        })
    }
}

impl Table for GroupMember {
    const SELECT_BY_ID: &'static str = "SELECT * FROM group_members WHERE id = ?";

    fn decode(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let code: i64 = row.try_get("status")?;
        let status = GroupMemberStatus::from_code(code).ok_or_else(|| {
            sqlx::Error::Decode(format!("unknown group member status code {code}").into())
        })?;
        Ok(Self {
            id: id_column(row, "id")?,
            group_id: id_column(row, "group_id")?,
            person_id: id_column(row, "person_id")?,
            role_id: id_column(row, "role_id")?,
            status,
        })
    }
}
