//! Context-bound entity services: one generic service per stored kind.

use std::future::Future;
use std::marker::PhantomData;

use uuid::Uuid;

use flowkit_app::ports::EntityService;
use flowkit_domain::error::FlowError;

use crate::context::SqliteContext;
use crate::error::StorageError;
use crate::tables::Table;

/// Loads entities of kind `E` through the connection it was built with.
pub struct SqliteService<E> {
    context: SqliteContext,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Table> SqliteService<E> {
    #[must_use]
    pub fn new(context: SqliteContext) -> Self {
        Self {
            context,
            _entity: PhantomData,
        }
    }
}

impl<E: Table> EntityService for SqliteService<E> {
    type Entity = E;

    fn get(&mut self, guid: Uuid) -> impl Future<Output = Result<Option<E>, FlowError>> + Send {
        async move {
            let row = sqlx::query(E::SELECT_BY_ID)
                .bind(guid.to_string())
                .fetch_optional(self.context.connection())
                .await
                .map_err(StorageError::from)?;

            let entity = row
                .as_ref()
                .map(E::decode)
                .transpose()
                .map_err(StorageError::from)?;
            Ok(entity)
        }
    }
}
